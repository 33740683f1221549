//! Multi-resolution resampling and thresholding.
//!
//! Preprocessing runs every input layer down to a working resolution
//! before propagation and lifts result layers back to native
//! resolution afterwards. The two-step order is load-bearing:
//! resample first, then threshold — thresholding first would let
//! sub-threshold noise bias the block aggregates.

use crate::error::SpaceError;
use crate::layer::{Layer, RvLayer};
use flowscape_core::{Cell, RandVar};

/// Reserved layer name identifying a directional-flow grid.
///
/// Layers under this name hold D8 compass codes (1–8, N through NW
/// clockwise) and are downsampled with [`downsample_directions`]
/// instead of expected-value averaging.
pub const FLOW_DIRECTIONS_LAYER: &str = "flow-directions";

fn check_factor(factor: f64) -> Result<(), SpaceError> {
    if !factor.is_finite() || factor < 1.0 {
        return Err(SpaceError::InvalidFactor { factor });
    }
    Ok(())
}

/// Working-grid dimensions for a native `rows × cols` grid:
/// `floor(rows/factor) × floor(cols/factor)`.
///
/// Fails when the factor is invalid or large enough to floor a
/// dimension to zero.
pub fn working_dims(rows: u32, cols: u32, factor: f64) -> Result<(u32, u32), SpaceError> {
    check_factor(factor)?;
    let wrows = (rows as f64 / factor).floor() as u32;
    let wcols = (cols as f64 / factor).floor() as u32;
    if wrows == 0 || wcols == 0 {
        return Err(SpaceError::EmptyLayer);
    }
    Ok((wrows, wcols))
}

/// Which working cell a native cell contributes to. `None` when the
/// native cell falls in the floor-division remainder strip.
fn block_of(cell: Cell, factor: f64, wrows: u32, wcols: u32) -> Option<Cell> {
    let wr = (cell.row as f64 / factor).floor() as u32;
    let wc = (cell.col as f64 / factor).floor() as u32;
    (wr < wrows && wc < wcols).then(|| Cell::new(wr, wc))
}

/// Downsample a layer to working resolution by expected-value
/// averaging: each working cell is the [`RandVar::average`] of the
/// native cells mapping into it.
pub fn downsample(layer: &RvLayer, factor: f64, max_states: usize) -> Result<RvLayer, SpaceError> {
    let (wrows, wcols) = working_dims(layer.rows(), layer.cols(), factor)?;
    let mut groups: Vec<Vec<RandVar>> = vec![Vec::new(); wrows as usize * wcols as usize];
    for (cell, value) in layer.iter_cells() {
        if let Some(block) = block_of(cell, factor, wrows, wcols) {
            groups[block.index(wcols)].push(value.clone());
        }
    }
    let cells = groups
        .into_iter()
        .map(|group| RandVar::average(&group, max_states))
        .collect();
    Layer::from_cells(wrows, wcols, cells)
}

/// D8 compass code for a unit-vector resultant, or 0 for a null one.
fn encode_d8(east: f64, north: f64) -> u8 {
    if east.hypot(north) < 1e-9 {
        return 0;
    }
    let bearing = east.atan2(north).to_degrees().rem_euclid(360.0);
    ((bearing / 45.0).round() as u8 % 8) + 1
}

/// Unit vector `(east, north)` for a D8 compass code. Codes outside
/// 1–8 carry no direction.
fn decode_d8(code: u8) -> Option<(f64, f64)> {
    if !(1..=8).contains(&code) {
        return None;
    }
    let bearing = ((code - 1) as f64 * 45.0).to_radians();
    Some((bearing.sin(), bearing.cos()))
}

/// Downsample a directional-flow layer to working resolution.
///
/// Each native cell's mean is read as a D8 compass code; the block's
/// direction is the code nearest the bearing of the summed unit
/// vectors. Cells without a valid code contribute nothing, and a null
/// resultant yields code 0 (no flow). Result cells are degenerate
/// distributions.
pub fn downsample_directions(layer: &RvLayer, factor: f64) -> Result<RvLayer, SpaceError> {
    let (wrows, wcols) = working_dims(layer.rows(), layer.cols(), factor)?;
    let mut sums: Vec<(f64, f64)> = vec![(0.0, 0.0); wrows as usize * wcols as usize];
    for (cell, value) in layer.iter_cells() {
        if let Some(block) = block_of(cell, factor, wrows, wcols) {
            let code = value.mean().round();
            if (0.0..=255.0).contains(&code) {
                if let Some((east, north)) = decode_d8(code as u8) {
                    let slot = &mut sums[block.index(wcols)];
                    slot.0 += east;
                    slot.1 += north;
                }
            }
        }
    }
    let cells = sums
        .into_iter()
        .map(|(east, north)| RandVar::scalar(encode_d8(east, north) as f64))
        .collect();
    Layer::from_cells(wrows, wcols, cells)
}

/// Replace every cell whose mean falls below `threshold` with the
/// zero distribution. Idempotent; suppresses propagation noise.
pub fn threshold(layer: &RvLayer, threshold: f64) -> RvLayer {
    layer.map(|value| {
        if value.mean() < threshold {
            RandVar::zero()
        } else {
            value.clone()
        }
    })
}

/// An all-zero working-resolution layer, synthesized in place of an
/// absent optional input.
pub fn zero_layer(rows: u32, cols: u32) -> Result<RvLayer, SpaceError> {
    Layer::filled(rows, cols, RandVar::zero())
}

/// Resample a working-resolution layer back up to native `rows × cols`.
///
/// Each native cell takes the value of the working cell its block maps
/// to, clamped so the floor-division remainder strip reuses the last
/// working row/column. The output dimensions are exactly the native
/// ones.
pub fn upsample<T: Clone>(
    layer: &Layer<T>,
    factor: f64,
    rows: u32,
    cols: u32,
) -> Result<Layer<T>, SpaceError> {
    check_factor(factor)?;
    if rows == 0 || cols == 0 {
        return Err(SpaceError::EmptyLayer);
    }
    let wrows = layer.rows();
    let wcols = layer.cols();
    let mut cells = Vec::with_capacity(rows as usize * cols as usize);
    for r in 0..rows {
        let wr = ((r as f64 / factor).floor() as u32).min(wrows - 1);
        for c in 0..cols {
            let wc = ((c as f64 / factor).floor() as u32).min(wcols - 1);
            let value = layer
                .get(Cell::new(wr, wc))
                .expect("clamped index in bounds")
                .clone();
            cells.push(value);
        }
    }
    Layer::from_cells(rows, cols, cells)
}
