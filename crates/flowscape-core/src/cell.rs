//! Grid cell identity.

use std::fmt;

/// Identity of one grid cell: `(row, col)`, zero-based.
///
/// Cells are plain value types used as keys throughout the pipeline:
/// layer addressing, location lookup, and carrier provenance/route
/// records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    /// Zero-based row index.
    pub row: u32,
    /// Zero-based column index.
    pub col: u32,
}

impl Cell {
    /// Construct a cell from row and column indices.
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Flat row-major index within a grid of `cols` columns.
    pub fn index(&self, cols: u32) -> usize {
        self.row as usize * cols as usize + self.col as usize
    }

    /// Inverse of [`index`](Self::index).
    pub fn from_index(index: usize, cols: u32) -> Self {
        Self {
            row: (index / cols as usize) as u32,
            col: (index % cols as usize) as u32,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn index_is_row_major() {
        assert_eq!(Cell::new(0, 0).index(4), 0);
        assert_eq!(Cell::new(0, 3).index(4), 3);
        assert_eq!(Cell::new(2, 1).index(4), 9);
    }

    proptest! {
        #[test]
        fn index_round_trips(row in 0u32..100, col in 0u32..100, extra in 1u32..100) {
            let cols = col + extra;
            let cell = Cell::new(row, col);
            prop_assert_eq!(Cell::from_index(cell.index(cols), cols), cell);
        }
    }
}
