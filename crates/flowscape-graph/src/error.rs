//! Error types for location graph construction.

use std::error::Error;
use std::fmt;

/// Errors from [`LocationGraph::build`](crate::LocationGraph::build).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphError {
    /// An input layer's dimensions differ from the source layer's.
    ///
    /// Grid alignment is a precondition of the whole run; this is
    /// surfaced before any Location is constructed.
    LayerMismatch {
        /// Name of the misaligned layer.
        layer: String,
        /// Dimensions of the source layer.
        expected: (u32, u32),
        /// Dimensions of the offending layer.
        found: (u32, u32),
    },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LayerMismatch {
                layer,
                expected,
                found,
            } => write!(
                f,
                "layer '{layer}' is {}x{}, expected {}x{}",
                found.0, found.1, expected.0, expected.1
            ),
        }
    }
}

impl Error for GraphError {}
