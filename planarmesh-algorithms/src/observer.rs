//! Per-iteration observers for iterative mesh algorithms

use crate::flatness::{flatness_summary, FlatnessSummary};
use planarmesh_core::{Error, MeshAccessor, Result};
use tracing::warn;

/// Receives the mesh after every completed iteration.
///
/// Observers only get shared access to the mesh. [`validate`](Self::validate)
/// is called once before the first iteration, before any vertex moves.
pub trait IterationObserver<M: MeshAccessor> {
    /// Called after iteration `iteration` (0-based) has updated all positions
    fn on_iteration(&mut self, mesh: &M, iteration: usize);

    /// Reject an observer that cannot be invoked
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

impl<M, F> IterationObserver<M> for F
where
    M: MeshAccessor,
    F: FnMut(&M, usize),
{
    fn on_iteration(&mut self, mesh: &M, iteration: usize) {
        self(mesh, iteration)
    }
}

/// Forwards every `stride`-th iteration (0, stride, 2 * stride, ...) to `inner`
#[derive(Debug, Clone)]
pub struct EveryNth<O> {
    stride: usize,
    inner: O,
}

impl<O> EveryNth<O> {
    pub fn new(stride: usize, inner: O) -> Self {
        Self { stride, inner }
    }

    pub fn inner(&self) -> &O {
        &self.inner
    }

    pub fn into_inner(self) -> O {
        self.inner
    }
}

impl<M, O> IterationObserver<M> for EveryNth<O>
where
    M: MeshAccessor,
    O: IterationObserver<M>,
{
    fn on_iteration(&mut self, mesh: &M, iteration: usize) {
        if self.stride != 0 && iteration % self.stride == 0 {
            self.inner.on_iteration(mesh, iteration);
        }
    }

    fn validate(&self) -> Result<()> {
        if self.stride == 0 {
            return Err(Error::InvalidCallback(
                "Observer stride must be at least 1".to_string(),
            ));
        }
        self.inner.validate()
    }
}

/// Records the flatness of the mesh after each iteration
#[derive(Debug, Clone, Default)]
pub struct FlatnessHistory {
    entries: Vec<(usize, FlatnessSummary)>,
}

impl FlatnessHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(iteration, summary)` pairs in the order they were recorded
    pub fn entries(&self) -> &[(usize, FlatnessSummary)] {
        &self.entries
    }

    /// Mean face flatness per recorded iteration
    pub fn means(&self) -> Vec<f64> {
        self.entries.iter().map(|(_, summary)| summary.mean).collect()
    }

    pub fn last(&self) -> Option<&FlatnessSummary> {
        self.entries.last().map(|(_, summary)| summary)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<M: MeshAccessor> IterationObserver<M> for FlatnessHistory {
    fn on_iteration(&mut self, mesh: &M, iteration: usize) {
        match flatness_summary(mesh) {
            Ok(summary) => self.entries.push((iteration, summary)),
            Err(error) => warn!(iteration, %error, "Could not measure mesh flatness"),
        }
    }
}
