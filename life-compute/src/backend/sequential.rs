//! # Sequential Backend
//!
//! Single-threaded reference. Every other backend must match it
//! byte for byte.

use std::time::Instant;

use life_core::config::LifeConfig;
use life_core::error::LifeResult;
use life_core::grid::Grid;
use life_core::stepper;
use life_core::traits::{BackendStats, ComputeBackend};

/// Reference backend iterating cells in row-major order
#[derive(Debug, Default)]
pub struct SequentialBackend {
    stats: BackendStats,
}

impl SequentialBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ComputeBackend for SequentialBackend {
    fn init(&mut self, _config: &LifeConfig) -> LifeResult<()> {
        Ok(())
    }

    fn step(&mut self, read: &Grid, write: &mut Grid) -> LifeResult<()> {
        let start = Instant::now();
        stepper::step(read, write)?;

        self.stats.steps += 1;
        self.stats.cells_processed += read.cell_count() as u64;
        self.stats.compute_time_us = start.elapsed().as_micros() as u64;
        Ok(())
    }

    fn stats(&self) -> BackendStats {
        self.stats.clone()
    }

    fn name(&self) -> &'static str {
        "Sequential"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use life_core::grid::Boundary;

    #[test]
    fn test_step_counts_cells() {
        let mut backend = SequentialBackend::new();
        let read = Grid::with_live_cells(6, 4, Boundary::Bounded, &[(1, 1), (1, 2), (2, 1), (2, 2)]).unwrap();
        let mut write = Grid::new(6, 4, Boundary::Bounded).unwrap();

        backend.step(&read, &mut write).unwrap();
        assert_eq!(write, read);

        let stats = backend.stats();
        assert_eq!(stats.steps, 1);
        assert_eq!(stats.cells_processed, 24);
    }

    #[test]
    fn test_failed_step_is_not_counted() {
        let mut backend = SequentialBackend::new();
        let read = Grid::new(4, 4, Boundary::Bounded).unwrap();
        let mut write = Grid::new(3, 4, Boundary::Bounded).unwrap();
        assert!(backend.step(&read, &mut write).is_err());
        assert_eq!(backend.stats().steps, 0);
    }
}
