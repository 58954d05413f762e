//! # Transition Rule
//!
//! Conway's B3/S23: a live cell survives with two or three live
//! neighbours, a dead cell is born with exactly three. Everything else
//! is dead in the next generation.
//!
//! Pure and stateless, so any number of execution units may call it at
//! once. The GPU kernel in `life-compute` encodes the same table.

use crate::cell::Cell;

/// Next state of a cell given its current state and live-neighbour count
#[inline]
pub const fn next_state(current: Cell, live_neighbors: u8) -> Cell {
    match (current, live_neighbors) {
        (Cell::Alive, 2) | (Cell::Alive, 3) => Cell::Alive, // survival
        (Cell::Dead, 3) => Cell::Alive,                     // birth
        _ => Cell::Dead,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Cell::{Alive, Dead};

    #[test]
    fn test_alive_transitions() {
        assert_eq!(next_state(Alive, 0), Dead);
        assert_eq!(next_state(Alive, 1), Dead);
        assert_eq!(next_state(Alive, 2), Alive);
        assert_eq!(next_state(Alive, 3), Alive);
        assert_eq!(next_state(Alive, 4), Dead);
        assert_eq!(next_state(Alive, 5), Dead);
        assert_eq!(next_state(Alive, 6), Dead);
        assert_eq!(next_state(Alive, 7), Dead);
        assert_eq!(next_state(Alive, 8), Dead);
    }

    #[test]
    fn test_dead_transitions() {
        assert_eq!(next_state(Dead, 0), Dead);
        assert_eq!(next_state(Dead, 1), Dead);
        assert_eq!(next_state(Dead, 2), Dead);
        assert_eq!(next_state(Dead, 3), Alive);
        assert_eq!(next_state(Dead, 4), Dead);
        assert_eq!(next_state(Dead, 5), Dead);
        assert_eq!(next_state(Dead, 6), Dead);
        assert_eq!(next_state(Dead, 7), Dead);
        assert_eq!(next_state(Dead, 8), Dead);
    }
}
