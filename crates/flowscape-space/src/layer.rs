//! The rectangular [`Layer`] grid.

use crate::error::SpaceError;
use flowscape_core::{Cell, RandVar};

/// A layer of probabilistic cell values at a single resolution.
pub type RvLayer = Layer<RandVar>;

/// A rectangular `rows × cols` grid of cell values, addressed by
/// [`Cell`] in row-major order.
///
/// Input and working layers hold [`RandVar`]s; emitted result layers
/// hold plain `f64` aggregates. All layers participating in one run
/// must share identical dimensions; alignment is a precondition
/// checked at the entry boundary, not a recoverable runtime error.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer<T> {
    rows: u32,
    cols: u32,
    cells: Vec<T>,
}

impl<T> Layer<T> {
    /// Build a layer from a row-major flat vector.
    ///
    /// Fails with [`SpaceError::EmptyLayer`] on a zero dimension or
    /// [`SpaceError::CellCountMismatch`] when the vector length is not
    /// `rows * cols`.
    pub fn from_cells(rows: u32, cols: u32, cells: Vec<T>) -> Result<Self, SpaceError> {
        if rows == 0 || cols == 0 {
            return Err(SpaceError::EmptyLayer);
        }
        let expected = rows as usize * cols as usize;
        if cells.len() != expected {
            return Err(SpaceError::CellCountMismatch {
                expected,
                found: cells.len(),
            });
        }
        Ok(Self { rows, cols, cells })
    }

    /// Number of rows.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// `(rows, cols)` pair.
    pub fn dims(&self) -> (u32, u32) {
        (self.rows, self.cols)
    }

    /// Total cell count.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Borrow the value at `cell`, or `None` out of bounds.
    pub fn get(&self, cell: Cell) -> Option<&T> {
        self.in_bounds(cell).then(|| &self.cells[cell.index(self.cols)])
    }

    /// Mutably borrow the value at `cell`, or `None` out of bounds.
    pub fn get_mut(&mut self, cell: Cell) -> Option<&mut T> {
        self.in_bounds(cell)
            .then(|| &mut self.cells[cell.index(self.cols)])
    }

    /// Replace the value at `cell`. Out-of-bounds writes are ignored.
    pub fn set(&mut self, cell: Cell, value: T) {
        if let Some(slot) = self.get_mut(cell) {
            *slot = value;
        }
    }

    /// `true` when `cell` lies within the grid.
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    /// `true` when `other` has identical dimensions.
    pub fn aligned_with<U>(&self, other: &Layer<U>) -> bool {
        self.dims() == other.dims()
    }

    /// Iterate over `(cell, value)` pairs in row-major order.
    pub fn iter_cells(&self) -> impl Iterator<Item = (Cell, &T)> {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, v)| (Cell::from_index(i, cols), v))
    }

    /// Map every cell value, preserving dimensions.
    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> Layer<U> {
        Layer {
            rows: self.rows,
            cols: self.cols,
            cells: self.cells.iter().map(f).collect(),
        }
    }

    /// The raw row-major cell vector.
    pub fn cells(&self) -> &[T] {
        &self.cells
    }
}

impl<T: Clone> Layer<T> {
    /// Build a layer with every cell set to `value`.
    pub fn filled(rows: u32, cols: u32, value: T) -> Result<Self, SpaceError> {
        if rows == 0 || cols == 0 {
            return Err(SpaceError::EmptyLayer);
        }
        Ok(Self {
            rows,
            cols,
            cells: vec![value; rows as usize * cols as usize],
        })
    }

    /// Build a layer from nested rows. Every row must have the same
    /// length.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, SpaceError> {
        let nrows = rows.len() as u32;
        let ncols = rows.first().map(|r| r.len() as u32).unwrap_or(0);
        if nrows == 0 || ncols == 0 {
            return Err(SpaceError::EmptyLayer);
        }
        let mut cells = Vec::with_capacity(nrows as usize * ncols as usize);
        for row in rows {
            if row.len() as u32 != ncols {
                return Err(SpaceError::CellCountMismatch {
                    expected: ncols as usize,
                    found: row.len(),
                });
            }
            cells.extend(row);
        }
        Ok(Self {
            rows: nrows,
            cols: ncols,
            cells,
        })
    }
}

impl RvLayer {
    /// Sum of all cell means. Handy for conservation assertions.
    pub fn total_mean(&self) -> f64 {
        self.cells.iter().map(RandVar::mean).sum()
    }
}
