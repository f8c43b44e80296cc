//! Delta error types.

use thiserror::Error;

/// Errors raised while computing or applying a delta
#[derive(Debug, Error)]
pub enum DeltaError {
    /// State could not be converted into its diffable form
    #[error("Failed to encode state: {0}")]
    Encode(#[source] serde_json::Error),

    /// Patched value could not be converted back into the state type
    #[error("Failed to decode patched state: {0}")]
    Decode(#[source] serde_json::Error),

    /// A patch operation targets a location that does not exist
    #[error("Path '{path}' does not exist in the target state")]
    PathNotFound { path: String },

    /// An array operation targets an index past the end of the array
    #[error("Index {index} out of bounds at '{path}' (len: {len})")]
    IndexOutOfBounds {
        path: String,
        index: usize,
        len: usize,
    },

    /// A path walks through a value that is neither an object nor an array
    #[error("Value at '{path}' is not an object or array")]
    NotAContainer { path: String },

    #[error("Cannot remove the root of the state")]
    RootRemoval,

    /// State decodes from its encoded form to a different value
    #[error("State does not survive its own encoding")]
    LossyEncoding,

    /// Failure reported by a custom diff engine
    #[error("Diff engine failed: {0}")]
    Engine(String),
}
