//! Property-based equivalence of the execution backends.
//!
//! The sequential backend is the reference; the Rayon backend (and the GPU
//! backend, when an adapter is present) must produce byte-identical grids
//! for any input.

use life_compute::{CpuBackend, GpuBackend, SequentialBackend};
use life_core::{Boundary, ComputeBackend, Grid, LifeConfig};
use proptest::prelude::*;

fn arb_boundary() -> impl Strategy<Value = Boundary> {
    prop_oneof![Just(Boundary::Bounded), Just(Boundary::Toroidal)]
}

/// Random grid between 3x3 and 40x40 with arbitrary cell contents
fn arb_grid() -> impl Strategy<Value = Grid> {
    (3usize..40, 3usize..40, arb_boundary()).prop_flat_map(|(w, h, boundary)| {
        proptest::collection::vec(any::<bool>(), w * h).prop_map(move |alive| {
            let live: Vec<(usize, usize)> = alive
                .iter()
                .enumerate()
                .filter(|(_, a)| **a)
                .map(|(i, _)| (i / w, i % w))
                .collect();
            Grid::with_live_cells(w, h, boundary, &live).unwrap()
        })
    })
}

fn cpu_backend() -> CpuBackend {
    let mut config = LifeConfig::default();
    config.compute.cpu_threads = 4;
    CpuBackend::new(&config).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Rayon rows produce exactly the sequential result
    #[test]
    fn prop_cpu_matches_sequential(read in arb_grid()) {
        let (w, h) = read.dimensions();
        let mut expected = Grid::new(w, h, read.boundary()).unwrap();
        let mut actual = Grid::new(w, h, read.boundary()).unwrap();

        SequentialBackend::new().step(&read, &mut expected).unwrap();
        cpu_backend().step(&read, &mut actual).unwrap();

        prop_assert_eq!(expected.as_bytes(), actual.as_bytes());
    }

    /// Several generations in a row stay in lockstep
    #[test]
    fn prop_cpu_matches_sequential_over_generations(start in arb_grid(), generations in 1usize..12) {
        let (w, h) = start.dimensions();
        let mut seq = SequentialBackend::new();
        let mut cpu = cpu_backend();

        let mut a = [start.clone(), Grid::new(w, h, start.boundary()).unwrap()];
        let mut b = [start, Grid::new(w, h, a[0].boundary()).unwrap()];
        let mut front = 0;
        for _ in 0..generations {
            let (ra, wa) = split(&mut a, front);
            seq.step(ra, wa).unwrap();
            let (rb, wb) = split(&mut b, front);
            cpu.step(rb, wb).unwrap();
            front = 1 - front;
            prop_assert_eq!(a[front].as_bytes(), b[front].as_bytes());
        }
    }

    /// Nothing is born on an empty board
    #[test]
    fn prop_empty_stays_empty(w in 1usize..30, h in 1usize..30) {
        let read = Grid::new(w, h, Boundary::Bounded).unwrap();
        let mut write = read.clone();
        cpu_backend().step(&read, &mut write).unwrap();
        prop_assert!(write.is_extinct());
    }
}

fn split(pair: &mut [Grid; 2], front: usize) -> (&Grid, &mut Grid) {
    let (first, second) = pair.split_at_mut(1);
    if front == 0 {
        (&first[0], &mut second[0])
    } else {
        (&second[0], &mut first[0])
    }
}

#[test]
fn gpu_matches_sequential_when_available() {
    let Ok(mut gpu) = GpuBackend::new(&LifeConfig::default()) else {
        println!("GPU not available, skipping");
        return;
    };

    let mut read = Grid::new(100, 70, Boundary::Toroidal).unwrap();
    for (row, col) in (0..7000).filter(|i| i % 3 == 0 || i % 7 == 0).map(|i| (i / 100, i % 100)) {
        read.set(row, col, life_core::Cell::Alive).unwrap();
    }

    let mut expected = Grid::new(100, 70, Boundary::Toroidal).unwrap();
    let mut actual = Grid::new(100, 70, Boundary::Toroidal).unwrap();
    SequentialBackend::new().step(&read, &mut expected).unwrap();
    gpu.step(&read, &mut actual).unwrap();
    assert_eq!(expected.as_bytes(), actual.as_bytes());
}
