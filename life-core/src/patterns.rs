//! Built-in seed patterns, anchored at `(0, 0)` as `(row, col)`.

use crate::error::{LifeError, LifeResult};

/// A named set of live cells
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pattern {
    pub name: &'static str,
    pub cells: &'static [(usize, usize)],
}

pub const BLOCK: Pattern = Pattern {
    name: "Block",
    cells: &[(0, 0), (0, 1), (1, 0), (1, 1)],
};

pub const BEEHIVE: Pattern = Pattern {
    name: "Beehive",
    cells: &[(0, 1), (0, 2), (1, 0), (1, 3), (2, 1), (2, 2)],
};

pub const BLINKER: Pattern = Pattern {
    name: "Blinker",
    cells: &[(0, 0), (0, 1), (0, 2)],
};

pub const TOAD: Pattern = Pattern {
    name: "Toad",
    cells: &[(0, 1), (0, 2), (0, 3), (1, 0), (1, 1), (1, 2)],
};

pub const BEACON: Pattern = Pattern {
    name: "Beacon",
    cells: &[(0, 0), (0, 1), (1, 0), (1, 1), (2, 2), (2, 3), (3, 2), (3, 3)],
};

pub const GLIDER: Pattern = Pattern {
    name: "Glider",
    cells: &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)],
};

pub const R_PENTOMINO: Pattern = Pattern {
    name: "R-pentomino",
    cells: &[(0, 1), (0, 2), (1, 0), (1, 1), (2, 1)],
};

pub const PATTERNS: &[Pattern] = &[BLOCK, BEEHIVE, BLINKER, TOAD, BEACON, GLIDER, R_PENTOMINO];

impl Pattern {
    /// Look up a built-in pattern by case-insensitive name
    pub fn by_name(name: &str) -> LifeResult<&'static Pattern> {
        PATTERNS
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| LifeError::config(format!("unknown pattern '{}'", name)))
    }

    /// `(rows, cols)` spanned by the pattern
    pub fn bounds(&self) -> (usize, usize) {
        let rows = self.cells.iter().map(|&(r, _)| r + 1).max().unwrap_or(0);
        let cols = self.cells.iter().map(|&(_, c)| c + 1).max().unwrap_or(0);
        (rows, cols)
    }

    /// Cells shifted so the pattern's origin sits at `(row, col)`
    ///
    /// `None` when a shifted coordinate would overflow `usize`.
    pub fn cells_at(&self, row: usize, col: usize) -> Option<Vec<(usize, usize)>> {
        self.cells
            .iter()
            .map(|&(r, c)| Some((r.checked_add(row)?, c.checked_add(col)?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(Pattern::by_name("glider").unwrap(), &GLIDER);
        assert_eq!(Pattern::by_name("R-PENTOMINO").unwrap(), &R_PENTOMINO);
        assert!(Pattern::by_name("spaceship").is_err());
    }

    #[test]
    fn test_bounds() {
        assert_eq!(BLOCK.bounds(), (2, 2));
        assert_eq!(BLINKER.bounds(), (1, 3));
        assert_eq!(BEACON.bounds(), (4, 4));
    }

    #[test]
    fn test_offset() {
        assert_eq!(BLOCK.cells_at(3, 5).unwrap(), vec![(3, 5), (3, 6), (4, 5), (4, 6)]);
    }

    #[test]
    fn test_offset_overflow() {
        assert_eq!(GLIDER.cells_at(usize::MAX, 0), None);
        assert_eq!(BLINKER.cells_at(0, usize::MAX - 1), None);
        // The blinker's last column is exactly usize::MAX
        assert!(BLINKER.cells_at(0, usize::MAX - 2).is_some());
    }

    #[test]
    fn test_patterns_anchored_at_origin() {
        for pattern in PATTERNS {
            assert!(pattern.cells.iter().any(|&(r, _)| r == 0), "{} not anchored", pattern.name);
            assert!(pattern.cells.iter().any(|&(_, c)| c == 0), "{} not anchored", pattern.name);
        }
    }
}
