//! # Generation Stepper
//!
//! Advances a whole grid by one generation, reading only from the
//! current buffer and writing only into the next one. Every cell of
//! generation N+1 is derived from generation N alone; updating in place
//! would let already-written cells leak into their neighbours' counts.
//!
//! `next_cell` and `step_row` are the units of work the backends
//! distribute. `step` is the sequential reference.

use crate::cell::Cell;
use crate::error::LifeResult;
use crate::grid::Grid;
use crate::rule::next_state;

/// Generation N+1 state of the cell at `(row, col)` in `read`
#[inline]
pub fn next_cell(read: &Grid, row: usize, col: usize) -> Cell {
    let current = read.cells()[row * read.width() + col];
    next_state(current, read.count_neighbors(row, col))
}

/// Compute one full row of the next generation into `out`
///
/// `out` must be exactly one row long.
#[inline]
pub fn step_row(read: &Grid, row: usize, out: &mut [Cell]) {
    debug_assert_eq!(out.len(), read.width());
    for (col, cell) in out.iter_mut().enumerate() {
        *cell = next_cell(read, row, col);
    }
}

/// Advance `read` by one generation into `write`
///
/// Both grids must share dimensions and boundary policy. `write` is fully
/// overwritten; `read` is never modified.
pub fn step(read: &Grid, write: &mut Grid) -> LifeResult<()> {
    read.check_same_shape(write)?;
    let width = read.width();
    for (row, out) in write.cells_mut().chunks_mut(width).enumerate() {
        step_row(read, row, out);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LifeError;
    use crate::grid::Boundary;

    fn grid(w: usize, h: usize, live: &[(usize, usize)]) -> Grid {
        Grid::with_live_cells(w, h, Boundary::Bounded, live).unwrap()
    }

    #[test]
    fn test_blinker_oscillates() {
        let horizontal = grid(5, 5, &[(2, 1), (2, 2), (2, 3)]);
        let vertical = grid(5, 5, &[(1, 2), (2, 2), (3, 2)]);

        let mut next = Grid::new(5, 5, Boundary::Bounded).unwrap();
        step(&horizontal, &mut next).unwrap();
        assert_eq!(next, vertical);

        let mut back = Grid::new(5, 5, Boundary::Bounded).unwrap();
        step(&next, &mut back).unwrap();
        assert_eq!(back, horizontal);
    }

    #[test]
    fn test_read_buffer_untouched() {
        let read = grid(5, 5, &[(2, 1), (2, 2), (2, 3)]);
        let before = read.clone();
        let mut write = Grid::new(5, 5, Boundary::Bounded).unwrap();
        step(&read, &mut write).unwrap();
        assert_eq!(read, before);
    }

    #[test]
    fn test_write_buffer_fully_overwritten() {
        let read = grid(4, 4, &[]);
        let mut write = grid(4, 4, &[(0, 0), (1, 1), (3, 3)]);
        step(&read, &mut write).unwrap();
        assert!(write.is_extinct());
    }

    #[test]
    fn test_in_place_update_would_differ() {
        // A row-major in-place pass sees already-updated cells and breaks
        // the blinker; the double-buffered step does not.
        let read = grid(5, 5, &[(2, 1), (2, 2), (2, 3)]);
        let mut naive = read.clone();
        for row in 0..5 {
            for col in 0..5 {
                let cell = next_cell(&naive, row, col);
                naive.set(row, col, cell).unwrap();
            }
        }
        let mut write = Grid::new(5, 5, Boundary::Bounded).unwrap();
        step(&read, &mut write).unwrap();
        assert_ne!(naive, write);
    }

    #[test]
    fn test_shape_mismatch() {
        let read = grid(4, 4, &[]);
        let mut write = grid(5, 4, &[]);
        assert!(matches!(step(&read, &mut write), Err(LifeError::ShapeMismatch { .. })));

        let mut torus = Grid::new(4, 4, Boundary::Toroidal).unwrap();
        assert!(step(&read, &mut torus).is_err());
    }

    #[test]
    fn test_toroidal_blinker_across_edge() {
        // Horizontal blinker wrapping the left/right edge
        let read = Grid::with_live_cells(5, 5, Boundary::Toroidal, &[(2, 4), (2, 0), (2, 1)]).unwrap();
        let mut write = Grid::new(5, 5, Boundary::Toroidal).unwrap();
        step(&read, &mut write).unwrap();
        let expected = Grid::with_live_cells(5, 5, Boundary::Toroidal, &[(1, 0), (2, 0), (3, 0)]).unwrap();
        assert_eq!(write, expected);
    }
}
