//! Delta computation and application.
//!
//! A [`DiffEngine`] turns a mutation of a draft into a pair of deltas (forward
//! and inverse) and later replays either of them against a state. The writer
//! treats deltas as opaque values; only the engine interprets them.
//!
//! The bundled [`JsonDiffEngine`] works on the `serde_json` form of any
//! serializable state and produces path-keyed [`Patch`] deltas.

pub mod error;
mod json;
mod patch;

pub use error::DeltaError;
pub use json::{merge_partial, JsonDiffEngine};
pub use patch::{Path, PathSegment, Patch, PatchOp};

use std::fmt::Debug;

/// Computes and applies invertible deltas for states of type `T`.
///
/// Implementations must guarantee that for
/// `(next, forward, inverse) = diff_with_delta(state, mutator)`:
///
/// - `next` equals `state` with `mutator` applied
/// - `apply_delta(state, forward)` equals `next`
/// - `apply_delta(next, inverse)` equals `state`
pub trait DiffEngine<T> {
    /// Opaque description of one change.
    type Delta: Clone + Debug + Send + Sync;

    /// Run `mutator` against a draft of `state`, returning the resulting
    /// state with its forward and inverse deltas.
    fn diff_with_delta<F>(
        &self,
        state: &T,
        mutator: F,
    ) -> Result<(T, Self::Delta, Self::Delta), DeltaError>
    where
        F: FnOnce(&mut T);

    /// Apply a delta to `state`, returning the new state.
    fn apply_delta(&self, state: &T, delta: &Self::Delta) -> Result<T, DeltaError>;
}
