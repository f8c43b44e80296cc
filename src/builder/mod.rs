//! Builder API for history writers.
//!
//! This module provides a fluent builder that wires an initial state, a
//! diff engine and a [`HistoryConfig`] into a ready-to-use writer backed by
//! a [`Store`].

pub mod config;
pub mod error;

pub use config::HistoryConfig;
pub use error::BuildError;

use crate::core::State;
use crate::delta::{DiffEngine, JsonDiffEngine};
use crate::store::{Store, Tracked};
use crate::writer::HistoryWriter;

/// Builder for constructing history writers with a fluent API.
///
/// # Example
///
/// ```rust
/// use rewind::builder::{BuildError, HistoryBuilder};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// struct Canvas {
///     strokes: Vec<(i32, i32)>,
/// }
///
/// let history = HistoryBuilder::new()
///     .initial(Canvas { strokes: Vec::new() })
///     .max_depth(50)
///     .build()
///     .unwrap();
/// assert_eq!(history.config().max_depth, Some(50));
///
/// let missing = HistoryBuilder::<Canvas>::new().build();
/// assert!(matches!(missing, Err(BuildError::MissingInitialState)));
/// ```
pub struct HistoryBuilder<T, E = JsonDiffEngine> {
    initial: Option<T>,
    engine: E,
    config: HistoryConfig,
}

impl<T: State> HistoryBuilder<T, JsonDiffEngine> {
    /// Create a new builder using the JSON diff engine.
    pub fn new() -> Self {
        Self {
            initial: None,
            engine: JsonDiffEngine,
            config: HistoryConfig::default(),
        }
    }
}

impl<T: State> Default for HistoryBuilder<T, JsonDiffEngine> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: State, E: DiffEngine<T>> HistoryBuilder<T, E> {
    /// Set the initial state (required).
    pub fn initial(mut self, state: T) -> Self {
        self.initial = Some(state);
        self
    }

    /// Use a different diff engine.
    pub fn engine<E2: DiffEngine<T>>(self, engine: E2) -> HistoryBuilder<T, E2> {
        HistoryBuilder {
            initial: self.initial,
            engine,
            config: self.config,
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: HistoryConfig) -> Self {
        self.config = config;
        self
    }

    /// Keep at most `depth` undo entries.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = Some(depth);
        self
    }

    /// Keep every undo entry (the default).
    pub fn unbounded(mut self) -> Self {
        self.config.max_depth = None;
        self
    }

    /// Build the writer.
    /// Returns an error if the initial state is missing or the configuration is invalid.
    pub fn build(self) -> Result<HistoryWriter<T, E, Store<Tracked<T, E::Delta>>>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;
        self.config.validate()?;

        let store = Store::new(Tracked::new(initial));
        Ok(HistoryWriter::with_parts(store, self.engine, self.config))
    }
}
