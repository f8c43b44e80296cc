//! Bounds shared by every application state tracked by a history writer.
//!
//! The writer never inspects the state itself. It only needs to clone it,
//! compare it, and hand it to a diff engine, which for the bundled JSON
//! engine means serializing it.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for application states whose transitions can be recorded.
///
/// Implemented automatically for every type meeting the bounds.
///
/// # Required Traits
///
/// - `Clone`: the writer drafts mutations against a copy of the state
/// - `PartialEq`: structural equality is what undo guarantees
/// - `Debug`: states must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: the JSON diff engine works on the serialized form
/// - `Send` + `Sync`: writers may be shared behind a lock
///
/// # Example
///
/// ```rust
/// use rewind::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
/// struct Counter {
///     count: i64,
/// }
///
/// fn assert_state<S: State>() {}
/// assert_state::<Counter>();
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
}

impl<T> State for T where
    T: Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
}
