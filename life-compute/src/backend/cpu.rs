//! # CPU Backend
//!
//! Parallel computation using Rayon.
//!
//! The write buffer is split into one chunk per row and the chunks are
//! handed to a dedicated Rayon pool. A unit reads anywhere in the read
//! buffer but writes only its own row, so units never contend. The
//! parallel iterator joins before `step` returns.
//!
//! This backend is ideal for:
//! - Boards up to a few million cells
//! - Systems without GPU support

use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use rayon::prelude::*;

use life_core::cell::Cell;
use life_core::config::LifeConfig;
use life_core::error::{LifeError, LifeResult};
use life_core::grid::Grid;
use life_core::stepper;
use life_core::traits::{BackendStats, ComputeBackend};

use super::panic_message;

/// CPU compute backend using Rayon
pub struct CpuBackend {
    /// Worker pool owned by this backend
    pool: rayon::ThreadPool,

    /// Requested thread count (0 = Rayon default)
    threads: usize,

    /// Statistics
    stats: BackendStats,
}

impl CpuBackend {
    /// Create a new CPU backend
    pub fn new(config: &LifeConfig) -> LifeResult<Self> {
        let threads = config.compute.cpu_threads;
        let pool = Self::build_pool(threads)?;
        tracing::debug!("CPU backend ready with {} threads", pool.current_num_threads());

        Ok(Self {
            pool,
            threads,
            stats: BackendStats::default(),
        })
    }

    fn build_pool(threads: usize) -> LifeResult<rayon::ThreadPool> {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("life-cpu-{}", i))
            .build()
            .map_err(|e| LifeError::backend(format!("Failed to start Rayon pool: {}", e)))
    }

    /// Worker threads in the pool
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run `unit` once per row of `write` on the pool
    ///
    /// A panicking unit aborts the step with `LifeError::Backend`.
    fn run_rows<F>(&self, read: &Grid, write: &mut Grid, unit: F) -> LifeResult<()>
    where
        F: Fn(&Grid, usize, &mut [Cell]) + Sync,
    {
        let width = read.width();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.pool.install(|| {
                write
                    .cells_mut()
                    .par_chunks_mut(width)
                    .enumerate()
                    .for_each(|(row, out)| unit(read, row, out));
            })
        }));

        if let Err(payload) = outcome {
            let msg = panic_message(payload.as_ref());
            tracing::error!("CPU step aborted: worker panicked: {}", msg);
            return Err(LifeError::backend(format!("CPU worker panicked: {}", msg)));
        }
        Ok(())
    }
}

impl ComputeBackend for CpuBackend {
    fn init(&mut self, config: &LifeConfig) -> LifeResult<()> {
        if config.compute.cpu_threads != self.threads {
            self.pool = Self::build_pool(config.compute.cpu_threads)?;
            self.threads = config.compute.cpu_threads;
        }
        Ok(())
    }

    fn step(&mut self, read: &Grid, write: &mut Grid) -> LifeResult<()> {
        read.check_same_shape(write)?;
        let start = Instant::now();

        self.run_rows(read, write, stepper::step_row)?;

        self.stats.steps += 1;
        self.stats.cells_processed += read.cell_count() as u64;
        self.stats.compute_time_us = start.elapsed().as_micros() as u64;
        Ok(())
    }

    fn stats(&self) -> BackendStats {
        self.stats.clone()
    }

    fn name(&self) -> &'static str {
        "CPU (Rayon)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::SequentialBackend;
    use life_core::grid::Boundary;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_cpu_backend_creation() {
        let config = LifeConfig::default();
        let backend = CpuBackend::new(&config);
        assert!(backend.is_ok());
    }

    #[test]
    fn test_explicit_thread_count() {
        let mut config = LifeConfig::default();
        config.compute.cpu_threads = 3;
        let mut backend = CpuBackend::new(&config).unwrap();
        assert_eq!(backend.threads(), 3);

        config.compute.cpu_threads = 2;
        backend.init(&config).unwrap();
        assert_eq!(backend.threads(), 2);
    }

    #[test]
    fn test_matches_sequential() {
        let mut config = LifeConfig::default();
        config.compute.cpu_threads = 4;
        let mut cpu = CpuBackend::new(&config).unwrap();
        let mut seq = SequentialBackend::new();

        for boundary in [Boundary::Bounded, Boundary::Toroidal] {
            let mut read = Grid::new(37, 23, boundary).unwrap();
            read.fill_random(&mut StdRng::seed_from_u64(99), 0.4).unwrap();

            let mut a = Grid::new(37, 23, boundary).unwrap();
            let mut b = Grid::new(37, 23, boundary).unwrap();
            seq.step(&read, &mut a).unwrap();
            cpu.step(&read, &mut b).unwrap();
            assert_eq!(a.as_bytes(), b.as_bytes());
        }
    }

    #[test]
    fn test_worker_panic_is_backend_error() {
        let mut cpu = CpuBackend::new(&LifeConfig::default()).unwrap();
        let read = Grid::with_live_cells(6, 6, Boundary::Bounded, &[(2, 1), (2, 2), (2, 3)]).unwrap();
        let mut write = Grid::new(6, 6, Boundary::Bounded).unwrap();

        let result = cpu.run_rows(&read, &mut write, |read, row, out| {
            if row == 3 {
                panic!("row {} unit failed", row);
            }
            stepper::step_row(read, row, out);
        });
        match result {
            Err(LifeError::Backend(msg)) => assert!(msg.contains("row 3 unit failed"), "{}", msg),
            other => panic!("expected backend error, got {:?}", other),
        }
        assert_eq!(cpu.stats().steps, 0);

        // The pool survives and the next step succeeds
        cpu.step(&read, &mut write).unwrap();
        assert_eq!(write.live_cells().collect::<Vec<_>>(), vec![(1, 2), (2, 2), (3, 2)]);
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let mut cpu = CpuBackend::new(&LifeConfig::default()).unwrap();
        let read = Grid::new(8, 8, Boundary::Bounded).unwrap();
        let mut write = Grid::new(8, 9, Boundary::Bounded).unwrap();
        assert!(matches!(cpu.step(&read, &mut write), Err(LifeError::ShapeMismatch { .. })));
    }
}
