//! Planarization delegated to an external constraint solver
//!
//! Physically based solvers (mass-spring, shape matching) can planarize a mesh
//! with their own convergence criteria. planarmesh does not ship one; it only
//! defines the contract and hands the mesh over.

use crate::observer::IterationObserver;
use crate::planarize::PlanarizationStrategy;
use planarmesh_core::{Error, MeshAccessor, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Settings forwarded to an external solver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalSolverConfig {
    /// Iteration budget for the solver
    pub max_iterations: usize,
    /// Solver damping. External solvers are less stable than the native
    /// iteration, hence the smaller default.
    pub damping: f64,
}

impl Default for ExternalSolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            damping: 0.1,
        }
    }
}

impl ExternalSolverConfig {
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }
}

/// An opaque solver that moves the free vertices of a mesh towards planar faces
pub trait ExternalSolver<M: MeshAccessor> {
    /// Name used in log output
    fn name(&self) -> &str;

    /// Planarize `mesh` in place, leaving `fixed` vertices where they are
    fn solve(
        &mut self,
        mesh: &mut M,
        fixed: &HashSet<M::VertexKey>,
        config: &ExternalSolverConfig,
    ) -> Result<()>;
}

/// Strategy adapter around an [`ExternalSolver`]
#[derive(Debug, Clone)]
pub struct ExternalPlanarizer<S> {
    solver: S,
    config: ExternalSolverConfig,
}

impl<S> ExternalPlanarizer<S> {
    pub fn new(solver: S, config: ExternalSolverConfig) -> Self {
        Self { solver, config }
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    pub fn into_solver(self) -> S {
        self.solver
    }
}

impl<M, S> PlanarizationStrategy<M> for ExternalPlanarizer<S>
where
    M: MeshAccessor,
    S: ExternalSolver<M>,
{
    fn apply(
        &mut self,
        mesh: &mut M,
        fixed: &HashSet<M::VertexKey>,
        observer: Option<&mut dyn IterationObserver<M>>,
    ) -> Result<()> {
        planarize_external(mesh, fixed, &mut self.solver, &self.config, observer)
    }
}

/// Planarize a mesh with an external solver.
///
/// The observer is validated like in [`planarize`](crate::planarize::planarize) but never
/// called: the solver iterates internally.
pub fn planarize_external<M, S>(
    mesh: &mut M,
    fixed: &HashSet<M::VertexKey>,
    solver: &mut S,
    config: &ExternalSolverConfig,
    observer: Option<&mut dyn IterationObserver<M>>,
) -> Result<()>
where
    M: MeshAccessor,
    S: ExternalSolver<M> + ?Sized,
{
    if let Some(observer) = observer.as_deref() {
        observer.validate()?;
    }

    if !config.damping.is_finite() || config.damping <= 0.0 {
        return Err(Error::InvalidData(format!(
            "Solver damping must be positive, got {}",
            config.damping
        )));
    }

    debug!(
        solver = solver.name(),
        fixed = fixed.len(),
        max_iterations = config.max_iterations,
        damping = config.damping,
        "Delegating planarization to external solver"
    );

    solver.solve(mesh, fixed, config)
}
