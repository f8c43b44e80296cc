//! Rewind: delta-based undo/redo for mutable application state
//!
//! Rewind wraps the write path of a state container and records each
//! mutate-in-place update as a pair of deltas (forward and inverse) rather
//! than as a full snapshot. Undo and redo replay those deltas.
//!
//! # Core Concepts
//!
//! - **Actions**: updates are either mutations of a draft, which are
//!   recorded, or replacement values, which are committed without history
//! - **Deltas**: a `DiffEngine` turns a mutation into invertible deltas;
//!   the bundled engine emits path-keyed JSON patches
//! - **Timeline**: two stacks of history entries with linear-history
//!   semantics: any new recorded mutation discards the redo stack
//!
//! # Example
//!
//! ```rust
//! use rewind::builder::HistoryBuilder;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
//! struct Counter {
//!     count: i64,
//! }
//!
//! let mut history = HistoryBuilder::new()
//!     .initial(Counter { count: 0 })
//!     .build()
//!     .unwrap();
//!
//! history.mutate(|c| c.count += 1).unwrap();
//! history.set(Counter { count: 10 }); // not recorded
//! assert_eq!(history.undo_len(), 1);
//!
//! history.undo().unwrap();
//! assert_eq!(history.state().count, 0);
//! assert!(history.can_redo());
//! ```

pub mod builder;
pub mod core;
pub mod delta;
pub mod store;
pub mod sync;
pub mod writer;

// Re-export commonly used types
pub use builder::{BuildError, HistoryBuilder, HistoryConfig};
pub use self::core::{HistoryEntry, SetAction, State, Timeline, UpdateKind};
pub use delta::{DeltaError, DiffEngine, JsonDiffEngine, Patch};
pub use store::{StateContainer, Store, Tracked};
pub use sync::SharedWriter;
pub use writer::{Direction, HistoryError, HistoryWriter, JsonHistory};
