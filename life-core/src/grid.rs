//! # Grid - Fixed-Size Cell Buffer
//!
//! A `width × height` array of cells in row-major order, together with the
//! boundary policy used when counting neighbours of edge cells.
//!
//! ## Boundary Policy
//!
//! - **Bounded** (default): positions outside `[0, height) × [0, width)` are dead.
//! - **Toroidal**: indices wrap modulo the grid dimensions. Needs at least
//!   3 rows and 3 columns so that no wrapped neighbour lands on the cell
//!   itself or on another neighbour.
//!
//! Coordinates are always `(row, col)`.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::error::{LifeError, LifeResult};

/// Minimum extent of each axis on a toroidal grid
pub const MIN_TOROIDAL_EXTENT: usize = 3;

/// Moore neighbourhood offsets as `(d_row, d_col)`
pub const MOORE_OFFSETS: [(isize, isize); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1),           (0, 1),
    (1, -1),  (1, 0),  (1, 1),
];

/// How neighbour lookups treat positions past the edge
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
    /// Outside cells are dead
    #[default]
    Bounded,
    /// Edges wrap around
    Toroidal,
}

impl Boundary {
    /// Value passed to the GPU kernel
    pub const fn to_u32(self) -> u32 {
        match self {
            Boundary::Bounded => 0,
            Boundary::Toroidal => 1,
        }
    }
}

impl std::str::FromStr for Boundary {
    type Err = LifeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bounded" => Ok(Boundary::Bounded),
            "toroidal" | "torus" | "wrap" => Ok(Boundary::Toroidal),
            other => Err(LifeError::config(format!("unknown boundary policy '{}'", other))),
        }
    }
}

/// Fixed-dimension 2D cell buffer
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    width: usize,
    height: usize,
    boundary: Boundary,
    cells: Vec<Cell>,
}

impl Grid {
    /// Check that a grid of this shape can exist, returning its cell count
    pub fn check_dimensions(width: usize, height: usize, boundary: Boundary) -> LifeResult<usize> {
        if width == 0 || height == 0 {
            return Err(LifeError::config(format!(
                "grid dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        let len = width.checked_mul(height).ok_or_else(|| {
            LifeError::config(format!("grid {}x{} overflows addressable memory", width, height))
        })?;
        if boundary == Boundary::Toroidal
            && (width < MIN_TOROIDAL_EXTENT || height < MIN_TOROIDAL_EXTENT)
        {
            return Err(LifeError::config(format!(
                "toroidal grid needs at least {0}x{0} cells, got {1}x{2}",
                MIN_TOROIDAL_EXTENT, width, height
            )));
        }
        Ok(len)
    }

    /// Create an all-dead grid
    pub fn new(width: usize, height: usize, boundary: Boundary) -> LifeResult<Self> {
        let len = Self::check_dimensions(width, height, boundary)?;
        Ok(Self {
            width,
            height,
            boundary,
            cells: vec![Cell::Dead; len],
        })
    }

    /// Create a grid with exactly the given `(row, col)` cells alive
    pub fn with_live_cells(
        width: usize,
        height: usize,
        boundary: Boundary,
        live: &[(usize, usize)],
    ) -> LifeResult<Self> {
        let mut grid = Self::new(width, height, boundary)?;
        for &(row, col) in live {
            grid.set(row, col, Cell::Alive)?;
        }
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    /// `(width, height)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Total number of cells (`width * height`)
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Row-major index of an in-range coordinate
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.height && col < self.width).then(|| row * self.width + col)
    }

    fn checked_index(&self, row: usize, col: usize) -> LifeResult<usize> {
        self.index(row, col).ok_or(LifeError::Index {
            row,
            col,
            width: self.width,
            height: self.height,
        })
    }

    pub fn get(&self, row: usize, col: usize) -> LifeResult<Cell> {
        let idx = self.checked_index(row, col)?;
        Ok(self.cells[idx])
    }

    pub fn set(&mut self, row: usize, col: usize, cell: Cell) -> LifeResult<()> {
        let idx = self.checked_index(row, col)?;
        self.cells[idx] = cell;
        Ok(())
    }

    /// Resolve the neighbour of `(row, col)` at offset `(d_row, d_col)`
    ///
    /// Returns `None` when the position falls off a bounded grid.
    #[inline]
    fn neighbor_index(&self, row: usize, col: usize, d_row: isize, d_col: isize) -> Option<usize> {
        let (h, w) = (self.height as isize, self.width as isize);
        let (r, c) = (row as isize + d_row, col as isize + d_col);
        match self.boundary {
            Boundary::Bounded => {
                if r < 0 || r >= h || c < 0 || c >= w {
                    None
                } else {
                    Some(r as usize * self.width + c as usize)
                }
            }
            Boundary::Toroidal => {
                let r = r.rem_euclid(h) as usize;
                let c = c.rem_euclid(w) as usize;
                Some(r * self.width + c)
            }
        }
    }

    /// Count live cells in the Moore neighbourhood of `(row, col)`
    ///
    /// Never looks at the cell itself.
    pub fn live_neighbors(&self, row: usize, col: usize) -> LifeResult<u8> {
        self.checked_index(row, col)?;
        Ok(self.count_neighbors(row, col))
    }

    /// Unchecked neighbour count for the stepper's inner loop
    #[inline]
    pub(crate) fn count_neighbors(&self, row: usize, col: usize) -> u8 {
        debug_assert!(row < self.height && col < self.width);
        MOORE_OFFSETS
            .iter()
            .filter_map(|&(dr, dc)| self.neighbor_index(row, col, dr, dc))
            .filter(|&idx| self.cells[idx].is_alive())
            .count() as u8
    }

    /// Number of live cells
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|c| c.is_alive()).count()
    }

    /// True when no cell is alive
    pub fn is_extinct(&self) -> bool {
        !self.cells.iter().any(|c| c.is_alive())
    }

    /// Kill every cell
    pub fn clear(&mut self) {
        self.cells.fill(Cell::Dead);
    }

    /// Coordinates of all live cells, row-major
    pub fn live_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_alive())
            .map(move |(i, _)| (i / width, i % width))
    }

    /// One row of cells
    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        (row < self.height).then(|| &self.cells[row * self.width..(row + 1) * self.width])
    }

    /// Row-major cell storage
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Mutable row-major storage; the length is fixed
    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// One byte per cell, `0` dead and `1` alive
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.cells)
    }

    /// Randomize every cell, alive with probability `density`
    ///
    /// Finite densities are clamped to `[0, 1]`; NaN is a `Config` error
    /// and leaves the grid untouched.
    pub fn fill_random<R: Rng>(&mut self, rng: &mut R, density: f64) -> LifeResult<()> {
        if density.is_nan() {
            return Err(LifeError::config("seed density must be a number, got NaN"));
        }
        let density = density.clamp(0.0, 1.0);
        for cell in self.cells.iter_mut() {
            *cell = Cell::from(rng.gen_bool(density));
        }
        Ok(())
    }

    /// Same dimensions and boundary policy
    pub fn same_shape(&self, other: &Grid) -> bool {
        self.width == other.width && self.height == other.height && self.boundary == other.boundary
    }

    /// Error unless `other` can pair with `self` as a double buffer
    pub fn check_same_shape(&self, other: &Grid) -> LifeResult<()> {
        if self.same_shape(other) {
            Ok(())
        } else {
            Err(LifeError::ShapeMismatch {
                read_width: self.width,
                read_height: self.height,
                write_width: other.width,
                write_height: other.height,
            })
        }
    }
}
