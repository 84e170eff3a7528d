//! Face circularization
//!
//! Circularization would map the corners of every face onto a best-fit circle
//! in the face's best-fit plane and then average the vertices, giving a mesh
//! with cyclic faces. It is declared here so callers can select it explicitly;
//! it currently always fails.

use crate::observer::IterationObserver;
use crate::planarize::{PlanarizationStrategy, PlanarizeConfig};
use planarmesh_core::{Error, MeshAccessor, Result};
use std::collections::HashSet;

/// Strategy handle for [`circularize`]
#[derive(Debug, Clone, Default)]
pub struct Circularizer {
    config: PlanarizeConfig,
}

impl Circularizer {
    pub fn new(config: PlanarizeConfig) -> Self {
        Self { config }
    }
}

impl<M: MeshAccessor> PlanarizationStrategy<M> for Circularizer {
    fn apply(
        &mut self,
        mesh: &mut M,
        fixed: &HashSet<M::VertexKey>,
        observer: Option<&mut dyn IterationObserver<M>>,
    ) -> Result<()> {
        circularize(mesh, fixed, &self.config, observer)
    }
}

/// Circularize the faces of a mesh.
///
/// # Errors
/// Always returns [`Error::NotImplemented`] without touching the mesh.
pub fn circularize<M: MeshAccessor>(
    _mesh: &mut M,
    _fixed: &HashSet<M::VertexKey>,
    _config: &PlanarizeConfig,
    _observer: Option<&mut dyn IterationObserver<M>>,
) -> Result<()> {
    Err(Error::NotImplemented(
        "Face circularization is not implemented".to_string(),
    ))
}
