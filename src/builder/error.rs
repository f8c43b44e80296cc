//! Build errors for history writers and their configuration.

use thiserror::Error;

/// Errors that can occur when building a history writer.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("History depth must be at least 1. Use .unbounded() for no limit")]
    ZeroDepth,

    #[error("Invalid history configuration: {0}")]
    InvalidConfig(#[source] serde_json::Error),
}
