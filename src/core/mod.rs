//! Core history types and logic.
//!
//! This module contains the pieces that do not depend on a container or a
//! diff engine:
//! - Application state bounds via the `State` trait
//! - Update actions and the classifier for untagged producers
//! - The immutable undo/redo timeline

mod action;
mod classify;
mod history;
mod state;

pub use action::{MutateFn, ReplaceFn, SetAction};
pub use classify::{classify, UpdateKind};
pub use history::{HistoryEntry, Timeline};
pub use state::State;
