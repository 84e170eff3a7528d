//! Iterative mesh planarization
//!
//! Planarization is a two-step fixed-point iteration. At every iteration each
//! face is projected onto its own best-fit plane, giving every vertex one
//! candidate position per incident face. Every free vertex then moves to the
//! centroid of its candidates. The loop runs a fixed number of times; there is
//! no convergence test.

use crate::observer::IterationObserver;
use planarmesh_core::{
    best_fit_plane, centroid, project_points_to_plane, AttributeValue, Error, MeshAccessor,
    Point3d, Result,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

/// How the damping factor enters the vertex update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DampingMode {
    /// Vertices jump straight to the centroid; the damping factor is unused
    #[default]
    Ignore,
    /// `new = old + damping * (centroid - old)`
    Blend,
}

/// Configuration for the iterative planarizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanarizeConfig {
    /// Number of iterations to run
    pub max_iterations: usize,
    /// Damping factor, only used with [`DampingMode::Blend`]
    pub damping: f64,
    /// How `damping` is applied
    pub damping_mode: DampingMode,
    /// Project faces on the rayon thread pool
    pub parallel: bool,
}

impl Default for PlanarizeConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            damping: 1.0,
            damping_mode: DampingMode::Ignore,
            parallel: false,
        }
    }
}

impl PlanarizeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set number of iterations
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the damping factor and how it is applied
    pub fn with_damping(mut self, damping: f64, mode: DampingMode) -> Self {
        self.damping = damping;
        self.damping_mode = mode;
        self
    }

    /// Enable or disable parallel face projection
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.damping_mode == DampingMode::Blend && !(self.damping > 0.0 && self.damping <= 1.0) {
            return Err(Error::InvalidData(format!(
                "Blended damping must lie in (0, 1], got {}",
                self.damping
            )));
        }
        Ok(())
    }
}

/// A way of driving the faces of a mesh towards a target shape
pub trait PlanarizationStrategy<M: MeshAccessor> {
    /// Move the free vertices of `mesh` in place
    fn apply(
        &mut self,
        mesh: &mut M,
        fixed: &HashSet<M::VertexKey>,
        observer: Option<&mut dyn IterationObserver<M>>,
    ) -> Result<()>;
}

/// Native best-fit-plane projection with centroid averaging
#[derive(Debug, Clone, Default)]
pub struct IterativePlanarizer {
    config: PlanarizeConfig,
}

impl IterativePlanarizer {
    pub fn new(config: PlanarizeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlanarizeConfig {
        &self.config
    }
}

impl<M: MeshAccessor> PlanarizationStrategy<M> for IterativePlanarizer {
    fn apply(
        &mut self,
        mesh: &mut M,
        fixed: &HashSet<M::VertexKey>,
        observer: Option<&mut dyn IterationObserver<M>>,
    ) -> Result<()> {
        planarize(mesh, fixed, &self.config, observer)
    }
}

/// Planarize the faces of a mesh in place.
///
/// Runs exactly `config.max_iterations` iterations. Vertices in `fixed` never
/// move; keys in `fixed` that are not in the mesh are ignored. Vertices
/// without incident faces are left where they are. The observer, if any, is
/// validated before anything moves and then called after every iteration.
///
/// # Arguments
/// * `mesh` - Mesh whose vertex positions are updated
/// * `fixed` - Vertices that keep their position
/// * `config` - Iteration count, damping and parallelism
/// * `observer` - Optional per-iteration callback
///
/// # Errors
/// * [`Error::InvalidCallback`] if the observer fails validation.
/// * [`Error::InvalidData`] for an invalid damping configuration.
/// * [`Error::DegenerateInput`] if a face has no best-fit plane. Positions
///   written by earlier iterations are kept.
pub fn planarize<M: MeshAccessor>(
    mesh: &mut M,
    fixed: &HashSet<M::VertexKey>,
    config: &PlanarizeConfig,
    mut observer: Option<&mut dyn IterationObserver<M>>,
) -> Result<()> {
    config.validate()?;
    if let Some(observer) = observer.as_deref() {
        observer.validate()?;
    }

    let vertex_keys = mesh.vertex_keys();
    let index: HashMap<M::VertexKey, usize> = vertex_keys
        .iter()
        .enumerate()
        .map(|(i, &key)| (key, i))
        .collect();
    let faces = indexed_faces(mesh, &index)?;
    let movable: Vec<bool> = vertex_keys.iter().map(|key| !fixed.contains(key)).collect();

    debug!(
        vertices = vertex_keys.len(),
        faces = faces.len(),
        fixed = movable.iter().filter(|free| !**free).count(),
        max_iterations = config.max_iterations,
        damping_mode = ?config.damping_mode,
        parallel = config.parallel,
        "Planarizing mesh"
    );

    for k in 0..config.max_iterations {
        let positions = vertex_keys
            .iter()
            .map(|&key| mesh.vertex_position(key))
            .collect::<Result<Vec<_>>>()?;

        let projections = project_faces(&faces, &positions, config.parallel)?;

        // One bucket of candidate positions per vertex, rebuilt every iteration
        let mut buckets: Vec<Vec<Point3d>> = vec![Vec::new(); vertex_keys.len()];
        for ((_, corners), projected) in faces.iter().zip(projections) {
            for (&vertex, point) in corners.iter().zip(projected) {
                buckets[vertex].push(point);
            }
        }

        let mut max_displacement = 0.0f64;
        for (vertex, bucket) in buckets.iter().enumerate() {
            if !movable[vertex] || bucket.is_empty() {
                continue;
            }

            let old = positions[vertex];
            let target = centroid(bucket)?;
            let updated = match config.damping_mode {
                DampingMode::Ignore => target,
                DampingMode::Blend => old + (target - old) * config.damping,
            };

            max_displacement = max_displacement.max((updated - old).norm());
            mesh.set_vertex_position(vertex_keys[vertex], updated)?;
        }

        trace!(iteration = k, max_displacement, "Planarization iteration complete");

        if let Some(observer) = observer.as_deref_mut() {
            observer.on_iteration(mesh, k);
        }
    }

    Ok(())
}

/// Faces with their corners resolved to positions in the vertex key list
fn indexed_faces<M: MeshAccessor>(
    mesh: &M,
    index: &HashMap<M::VertexKey, usize>,
) -> Result<Vec<(M::FaceKey, Vec<usize>)>> {
    mesh.face_keys()
        .into_iter()
        .map(|face| -> Result<(M::FaceKey, Vec<usize>)> {
            let corners = mesh
                .face_vertices(face)?
                .into_iter()
                .map(|vertex| {
                    index.get(&vertex).copied().ok_or_else(|| {
                        Error::UnknownVertex(format!(
                            "Face {:?} references missing vertex {:?}",
                            face, vertex
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Ok((face, corners))
        })
        .collect()
}

/// Project every face onto its best-fit plane.
///
/// Faces are independent, so the parallel path only reads `positions`; the
/// caller consumes the result after every face has been projected.
fn project_faces<K>(
    faces: &[(K, Vec<usize>)],
    positions: &[Point3d],
    parallel: bool,
) -> Result<Vec<Vec<Point3d>>>
where
    K: std::fmt::Debug + Sync,
{
    let project = |(face, corners): &(K, Vec<usize>)| -> Result<Vec<Point3d>> {
        let points: Vec<Point3d> = corners.iter().map(|&vertex| positions[vertex]).collect();
        let plane = best_fit_plane(&points).map_err(|error| match error {
            Error::DegenerateInput(message) => {
                Error::DegenerateInput(format!("face {:?}: {}", face, message))
            }
            other => other,
        })?;
        Ok(project_points_to_plane(&points, &plane))
    };

    if parallel {
        faces.par_iter().map(project).collect()
    } else {
        faces.iter().map(project).collect()
    }
}

/// Vertices whose boolean attribute `name` is set, e.g. `"is_fixed"`
pub fn fixed_from_attribute<M: MeshAccessor>(mesh: &M, name: &str) -> HashSet<M::VertexKey> {
    mesh.vertex_keys()
        .into_iter()
        .filter(|&vertex| mesh.vertex_attribute(vertex, name) == Some(AttributeValue::Bool(true)))
        .collect()
}
