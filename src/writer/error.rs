//! History writer error types.

use crate::delta::DeltaError;
use std::fmt;
use thiserror::Error;

/// Direction of a history step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Undo,
    Redo,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undo => f.write_str("undo"),
            Self::Redo => f.write_str("redo"),
        }
    }
}

/// Errors returned by history-tracked writes.
///
/// A failed operation commits nothing: state, stacks and availability flags
/// are exactly as they were before the call.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// The diff engine could not produce deltas for a mutation
    #[error("Failed to compute delta for mutation: {0}")]
    DeltaComputation(#[source] DeltaError),

    /// A stored delta could not be applied to the current state
    #[error("Failed to apply {direction} delta: {source}")]
    DeltaApplication {
        direction: Direction,
        #[source]
        source: DeltaError,
    },

    /// A partial state could not be merged into the current one
    #[error("Partial state could not be merged: {0}")]
    InvalidPartial(#[source] DeltaError),
}
