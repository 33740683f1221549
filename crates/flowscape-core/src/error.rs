//! Error types shared across the Flowscape workspace.

use crate::Cell;
use std::error::Error;
use std::fmt;

/// Errors from a flow model's propagation pass.
///
/// Returned by `FlowModel::propagate()` and wrapped by the dispatcher.
#[derive(Clone, Debug, PartialEq)]
pub enum ModelError {
    /// The model's traversal failed.
    ExecutionFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
    /// A carrier was produced with an actual weight exceeding its
    /// possible weight.
    InvalidWeight {
        /// The cell where the invalid carrier was deposited.
        cell: Cell,
    },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExecutionFailed { reason } => write!(f, "execution failed: {reason}"),
            Self::InvalidWeight { cell } => {
                write!(f, "carrier at {cell} has actual weight above possible weight")
            }
        }
    }
}

impl Error for ModelError {}
