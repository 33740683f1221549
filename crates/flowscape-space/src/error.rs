//! Error types for layer construction and resampling.

use std::error::Error;
use std::fmt;

/// Errors from layer construction and resampling.
///
/// `PartialEq` only: `InvalidFactor` carries the offending `f64`.
#[derive(Clone, Debug, PartialEq)]
pub enum SpaceError {
    /// A layer was constructed with zero rows or zero columns.
    EmptyLayer,
    /// Two layers that must be aligned have different dimensions.
    DimensionMismatch {
        /// Dimensions of the reference layer.
        expected: (u32, u32),
        /// Dimensions of the offending layer.
        found: (u32, u32),
    },
    /// The flat cell vector does not match `rows * cols`.
    CellCountMismatch {
        /// Expected cell count.
        expected: usize,
        /// Supplied cell count.
        found: usize,
    },
    /// A resampling factor was NaN, infinite, or below 1.
    InvalidFactor {
        /// The offending factor.
        factor: f64,
    },
}

impl fmt::Display for SpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLayer => write!(f, "layer must have at least one row and column"),
            Self::DimensionMismatch { expected, found } => write!(
                f,
                "layer dimensions {}x{} do not match {}x{}",
                found.0, found.1, expected.0, expected.1
            ),
            Self::CellCountMismatch { expected, found } => {
                write!(f, "expected {expected} cells, got {found}")
            }
            Self::InvalidFactor { factor } => {
                write!(f, "downscaling factor must be finite and >= 1, got {factor}")
            }
        }
    }
}

impl Error for SpaceError {}
