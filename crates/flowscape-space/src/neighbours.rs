//! Clipped 8-connected neighbourhood computation.

use flowscape_core::Cell;
use smallvec::SmallVec;

/// All 8 offsets: N, S, W, E, NW, NE, SW, SE.
const OFFSETS_8: [(i64, i64); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// The 8-connected neighbours of `cell` in a `rows × cols` grid.
///
/// Pure and deterministic: interior cells have 8 neighbours, edge
/// cells 5, corners 3. Offsets falling outside the grid are clipped;
/// there is no wraparound. Returns an empty set when `cell` itself is
/// out of bounds.
pub fn neighbours_of(rows: u32, cols: u32, cell: Cell) -> SmallVec<[Cell; 8]> {
    let mut result = SmallVec::new();
    if cell.row >= rows || cell.col >= cols {
        return result;
    }
    for (dr, dc) in OFFSETS_8 {
        let nr = cell.row as i64 + dr;
        let nc = cell.col as i64 + dc;
        if (0..rows as i64).contains(&nr) && (0..cols as i64).contains(&nc) {
            result.push(Cell::new(nr as u32, nc as u32));
        }
    }
    result
}
