//! # Traits - Abstractions over Execution Strategy
//!
//! The stepper's "compute every cell" operation is expressed as a
//! capability so the same simulation can run sequentially, across CPU
//! cores, or on a GPU.
//!
//! ## Key Traits
//!
//! - `ComputeBackend`: Advance a grid by one generation
//! - `GenerationObserver`: Receive each completed generation

use crate::config::LifeConfig;
use crate::error::LifeResult;
use crate::grid::Grid;

/// Compute backend trait - abstraction over sequential/CPU/GPU execution
///
/// A backend must have exactly the observable effect of
/// [`stepper::step`](crate::stepper::step): `write` holds generation N+1 of
/// `read` when `step` returns `Ok`, and `read` is unchanged. `step` returns
/// only after every execution unit has finished, which is the barrier
/// between generations.
///
/// On `Err` the contents of `write` are unspecified.
pub trait ComputeBackend: Send {
    /// Initialize the backend with configuration
    fn init(&mut self, config: &LifeConfig) -> LifeResult<()>;

    /// Compute generation N+1 of `read` into `write`
    fn step(&mut self, read: &Grid, write: &mut Grid) -> LifeResult<()>;

    /// Get statistics about work done so far
    fn stats(&self) -> BackendStats;

    /// Wait for outstanding device work (no-op for host backends)
    fn sync(&mut self) -> LifeResult<()> {
        Ok(())
    }

    /// Name of this backend (for logging)
    fn name(&self) -> &'static str;
}

/// Statistics from the compute backend
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BackendStats {
    /// Steps completed
    pub steps: u64,

    /// Cells computed across all steps
    pub cells_processed: u64,

    /// Time spent in the last step (microseconds)
    pub compute_time_us: u64,

    /// Bytes copied host -> device (GPU only)
    pub bytes_uploaded: u64,

    /// Bytes copied device -> host (GPU only)
    pub bytes_downloaded: u64,
}

/// Callback contract for each completed generation
///
/// Invoked synchronously after the step and buffer swap, before the next
/// step begins. `generation` is the number of completed steps.
pub trait GenerationObserver {
    fn on_generation(&mut self, generation: u64, grid: &Grid);
}

impl<F> GenerationObserver for F
where
    F: FnMut(u64, &Grid),
{
    fn on_generation(&mut self, generation: u64, grid: &Grid) {
        self(generation, grid)
    }
}
