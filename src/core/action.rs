//! Update actions accepted by a history writer.

use super::classify::{classify, UpdateKind};
use super::state::State;
use serde_json::Value;
use std::fmt;

/// Boxed mutate-in-place update.
pub type MutateFn<T> = Box<dyn FnOnce(&mut T)>;

/// Boxed replacement update.
pub type ReplaceFn<T> = Box<dyn FnOnce(&T) -> T>;

/// An update to the application state.
///
/// Only [`SetAction::Mutate`] records history. Every other variant commits
/// directly and leaves the undo and redo stacks untouched.
///
/// # Example
///
/// ```rust
/// use rewind::core::{SetAction, UpdateKind};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
/// struct Counter {
///     count: i64,
/// }
///
/// let increment = SetAction::mutate(|c: &mut Counter| c.count += 1);
/// assert_eq!(increment.kind(), UpdateKind::MutateInPlace);
///
/// let reset = SetAction::value(Counter { count: 0 });
/// assert_eq!(reset.kind(), UpdateKind::Replacement);
/// ```
pub enum SetAction<T> {
    /// Complete next state.
    Value(T),

    /// Partial next state, merged into the top-level fields of the current one.
    Partial(Value),

    /// Function computing the next state from the current one.
    Replace(ReplaceFn<T>),

    /// Function mutating a draft of the current state.
    Mutate(MutateFn<T>),
}

impl<T> SetAction<T> {
    /// Replace the state with `state`.
    pub fn value(state: T) -> Self {
        Self::Value(state)
    }

    /// Merge `fields` into the state, or replace it when written with `replace`.
    pub fn partial(fields: Value) -> Self {
        Self::Partial(fields)
    }

    /// Replace the state with a value computed from the current one.
    pub fn replace<F>(f: F) -> Self
    where
        F: FnOnce(&T) -> T + 'static,
    {
        Self::Replace(Box::new(f))
    }

    /// Mutate a draft of the state; the change is recorded in history.
    pub fn mutate<F>(f: F) -> Self
    where
        F: FnOnce(&mut T) + 'static,
    {
        Self::Mutate(Box::new(f))
    }

    /// How this action is committed. Tagged actions never need a trial run.
    pub fn kind(&self) -> UpdateKind {
        match self {
            Self::Mutate(_) => UpdateKind::MutateInPlace,
            Self::Value(_) | Self::Partial(_) | Self::Replace(_) => UpdateKind::Replacement,
        }
    }
}

impl<T: State + Default + 'static> SetAction<T> {
    /// Build an action from an untagged producer.
    ///
    /// A producer either mutates its argument and returns `None`, or returns
    /// a replacement value. Which form it uses is decided by [`classify`],
    /// which runs it once against `T::default()`. The producer is then run
    /// again for real, so it must be free of side effects beyond its
    /// argument and return value.
    ///
    /// A producer classified as mutate-in-place that nevertheless returns a
    /// value on the real state has that value recorded as the new state. A
    /// producer classified as a replacement that returns `None` on the real
    /// state commits its mutated copy without recording history.
    ///
    /// A producer that panics on the trial value is classified as a
    /// replacement. The panic hook still reports that panic, and under
    /// `panic = "abort"` the process aborts; see [`classify`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use rewind::core::{SetAction, UpdateKind};
    ///
    /// let push = SetAction::producer(|items: &mut Vec<i32>| {
    ///     items.push(1);
    ///     None
    /// });
    /// assert_eq!(push.kind(), UpdateKind::MutateInPlace);
    ///
    /// let clear = SetAction::producer(|_: &mut Vec<i32>| Some(Vec::new()));
    /// assert_eq!(clear.kind(), UpdateKind::Replacement);
    /// ```
    pub fn producer<F>(f: F) -> Self
    where
        F: Fn(&mut T) -> Option<T> + 'static,
    {
        match classify(&f) {
            UpdateKind::MutateInPlace => Self::mutate(move |draft: &mut T| {
                if let Some(next) = f(draft) {
                    *draft = next;
                }
            }),
            UpdateKind::Replacement => Self::replace(move |current: &T| {
                let mut draft = current.clone();
                f(&mut draft).unwrap_or(draft)
            }),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for SetAction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(state) => f.debug_tuple("Value").field(state).finish(),
            Self::Partial(fields) => f.debug_tuple("Partial").field(fields).finish(),
            Self::Replace(_) => f.write_str("Replace(..)"),
            Self::Mutate(_) => f.write_str("Mutate(..)"),
        }
    }
}
