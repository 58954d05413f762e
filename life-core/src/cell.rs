//! # Cell - The Unit of Life
//!
//! A cell has no identity beyond its `(row, col)` position in a grid.
//! It is either alive or dead.
//!
//! ## Memory Layout
//!
//! `Cell` is `#[repr(u8)]` so a grid's storage can be viewed as one byte
//! per cell. The GPU backend widens this to `u32` on upload since WGSL
//! storage buffers have no byte type.

use bytemuck::NoUninit;
use serde::{Deserialize, Serialize};

/// Binary cell state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, NoUninit)]
#[repr(u8)]
pub enum Cell {
    #[default]
    Dead = 0,
    Alive = 1,
}

impl Cell {
    pub const fn is_alive(self) -> bool {
        matches!(self, Cell::Alive)
    }

    pub const fn is_dead(self) -> bool {
        matches!(self, Cell::Dead)
    }

    /// Raw value as stored in GPU buffers
    pub const fn to_u32(self) -> u32 {
        self as u32
    }

    /// Any non-zero word reads as alive
    pub const fn from_u32(value: u32) -> Self {
        if value != 0 {
            Cell::Alive
        } else {
            Cell::Dead
        }
    }
}

impl From<bool> for Cell {
    fn from(alive: bool) -> Self {
        if alive {
            Cell::Alive
        } else {
            Cell::Dead
        }
    }
}

impl From<Cell> for bool {
    fn from(cell: Cell) -> Self {
        cell.is_alive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_size() {
        assert_eq!(std::mem::size_of::<Cell>(), 1);
    }

    #[test]
    fn test_cell_default_is_dead() {
        assert_eq!(Cell::default(), Cell::Dead);
    }

    #[test]
    fn test_u32_conversion() {
        assert_eq!(Cell::Alive.to_u32(), 1);
        assert_eq!(Cell::Dead.to_u32(), 0);
        assert_eq!(Cell::from_u32(7), Cell::Alive);
        assert_eq!(Cell::from_u32(0), Cell::Dead);
    }

    #[test]
    fn test_bool_conversion() {
        assert_eq!(Cell::from(true), Cell::Alive);
        assert!(!bool::from(Cell::Dead));
    }
}
