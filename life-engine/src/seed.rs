//! # Seeding
//!
//! How generation 0 is produced: a random fill, a reproducible random
//! fill, an explicit list of live coordinates, or a named pattern from
//! the built-in library.

use rand::rngs::StdRng;
use rand::SeedableRng;

use life_core::error::{LifeError, LifeResult};
use life_core::grid::Grid;
use life_core::patterns::Pattern;
use life_core::Cell;

/// Initial pattern for a simulation run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Seed {
    /// Each cell alive with the configured density, from the thread RNG
    #[default]
    Random,

    /// Same as `Random` but reproducible from a fixed seed
    Rng(u64),

    /// Exactly these `(row, col)` cells alive, everything else dead
    Pattern(Vec<(usize, usize)>),

    /// A library pattern with its top-left corner at `(row, col)`
    Named { name: String, row: usize, col: usize },
}

impl Seed {
    pub fn pattern(cells: impl IntoIterator<Item = (usize, usize)>) -> Self {
        Seed::Pattern(cells.into_iter().collect())
    }

    pub fn named(name: impl Into<String>, row: usize, col: usize) -> Self {
        Seed::Named {
            name: name.into(),
            row,
            col,
        }
    }

    /// Write this seed into `grid`, replacing its contents.
    ///
    /// Coordinates are checked before anything is written, so on `Err` the
    /// grid is untouched.
    pub fn apply(&self, grid: &mut Grid, density: f64) -> LifeResult<()> {
        match self {
            Seed::Random => grid.fill_random(&mut rand::thread_rng(), density),
            Seed::Rng(seed) => grid.fill_random(&mut StdRng::seed_from_u64(*seed), density),
            Seed::Pattern(cells) => write_cells(grid, cells),
            Seed::Named { name, row, col } => {
                let pattern = Pattern::by_name(name)?;
                let cells = pattern.cells_at(*row, *col).ok_or(LifeError::Index {
                    row: *row,
                    col: *col,
                    width: grid.width(),
                    height: grid.height(),
                })?;
                write_cells(grid, &cells)
            }
        }
    }
}

fn write_cells(grid: &mut Grid, cells: &[(usize, usize)]) -> LifeResult<()> {
    let mut indices = Vec::with_capacity(cells.len());
    for &(row, col) in cells {
        let idx = grid.index(row, col).ok_or(LifeError::Index {
            row,
            col,
            width: grid.width(),
            height: grid.height(),
        })?;
        indices.push(idx);
    }

    grid.clear();
    let out = grid.cells_mut();
    for idx in indices {
        out[idx] = Cell::Alive;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use life_core::Boundary;

    fn grid(width: usize, height: usize) -> Grid {
        Grid::new(width, height, Boundary::Bounded).unwrap()
    }

    #[test]
    fn test_pattern_replaces_contents() {
        let mut g = grid(5, 5);
        g.fill_random(&mut StdRng::seed_from_u64(1), 1.0).unwrap();

        Seed::pattern([(0, 0), (4, 4)]).apply(&mut g, 0.5).unwrap();
        assert_eq!(g.live_cells().collect::<Vec<_>>(), vec![(0, 0), (4, 4)]);
    }

    #[test]
    fn test_out_of_range_leaves_grid_untouched() {
        let mut g = grid(4, 4);
        Seed::pattern([(1, 1)]).apply(&mut g, 0.5).unwrap();
        let before = g.clone();

        let err = Seed::pattern([(0, 0), (4, 0)]).apply(&mut g, 0.5).unwrap_err();
        assert!(matches!(err, LifeError::Index { row: 4, col: 0, .. }));
        assert_eq!(g, before);
    }

    #[test]
    fn test_rng_seed_is_reproducible() {
        let mut a = grid(16, 16);
        let mut b = grid(16, 16);
        Seed::Rng(7).apply(&mut a, 0.5).unwrap();
        Seed::Rng(7).apply(&mut b, 0.5).unwrap();
        assert_eq!(a, b);
        assert!(a.population() > 0);
    }

    #[test]
    fn test_density_extremes() {
        let mut g = grid(8, 8);
        Seed::Random.apply(&mut g, 0.0).unwrap();
        assert!(g.is_extinct());

        Seed::Random.apply(&mut g, 1.0).unwrap();
        assert_eq!(g.population(), 64);
    }

    #[test]
    fn test_named_pattern() {
        let mut g = grid(6, 6);
        Seed::named("block", 2, 3).apply(&mut g, 0.5).unwrap();
        assert_eq!(
            g.live_cells().collect::<Vec<_>>(),
            vec![(2, 3), (2, 4), (3, 3), (3, 4)]
        );

        let err = Seed::named("unicorn", 0, 0).apply(&mut g, 0.5).unwrap_err();
        assert!(matches!(err, LifeError::Config(_)));
    }

    #[test]
    fn test_named_pattern_offset_overflow() {
        let mut g = grid(5, 5);
        Seed::named("block", 0, 0).apply(&mut g, 0.5).unwrap();
        let before = g.clone();

        let err = Seed::named("glider", usize::MAX, 0).apply(&mut g, 0.5).unwrap_err();
        assert!(matches!(
            err,
            LifeError::Index { row: usize::MAX, col: 0, width: 5, height: 5 }
        ));
        assert_eq!(g, before);
    }

    #[test]
    fn test_nan_density_rejected() {
        let mut g = grid(4, 4);
        for seed in [Seed::Random, Seed::Rng(1)] {
            let err = seed.apply(&mut g, f64::NAN).unwrap_err();
            assert!(matches!(err, LifeError::Config(_)));
        }
        assert!(g.is_extinct());
    }
}
