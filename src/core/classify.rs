//! Classification of untagged update functions.
//!
//! An untagged producer communicates its effect either by mutating its
//! argument (returning `None`) or by returning a replacement value. The
//! classifier tells the two apart by running the producer once against a
//! throwaway default value.

use std::panic::{self, AssertUnwindSafe};

/// How an update is committed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpdateKind {
    /// Effect expressed by mutating a draft. Recorded in history.
    MutateInPlace,

    /// Effect expressed as a next-state value. Committed without history.
    Replacement,
}

/// Classify a producer by probing it against `T::default()`.
///
/// - returns `None` on the trial value: [`UpdateKind::MutateInPlace`]
/// - returns `Some(_)` on the trial value: [`UpdateKind::Replacement`]
/// - panics on the trial value: [`UpdateKind::Replacement`]
///
/// A panicking trial is never reported to the caller; the update falls back
/// to a replacement so it is still applied rather than dropped. Producers
/// that mutate nothing and return `None` are no-op mutations and classify
/// as [`UpdateKind::MutateInPlace`].
///
/// The trial runs the producer for real, so any side effect it has beyond
/// its argument happens once more than the caller may expect. Prefer the
/// tagged constructors on [`SetAction`](crate::core::SetAction).
///
/// # Panics
///
/// A panicking trial is caught with `catch_unwind`, but the global panic
/// hook still runs first, so the default hook prints the panic message to
/// stderr even though classification succeeds. Builds with
/// `panic = "abort"` cannot catch it at all and abort instead.
///
/// # Example
///
/// ```rust
/// use rewind::core::{classify, UpdateKind};
///
/// let increment = |n: &mut i64| {
///     *n += 1;
///     None
/// };
/// assert_eq!(classify(&increment), UpdateKind::MutateInPlace);
///
/// let reset = |_: &mut i64| Some(0);
/// assert_eq!(classify(&reset), UpdateKind::Replacement);
/// ```
pub fn classify<T, F>(producer: &F) -> UpdateKind
where
    T: Default,
    F: Fn(&mut T) -> Option<T>,
{
    let mut trial = T::default();
    match panic::catch_unwind(AssertUnwindSafe(|| producer(&mut trial))) {
        Ok(None) => UpdateKind::MutateInPlace,
        Ok(Some(_)) => UpdateKind::Replacement,
        Err(_) => {
            tracing::debug!("producer panicked on trial value, treating as replacement");
            UpdateKind::Replacement
        }
    }
}
