//! Lock-guarded writer for hosts that write from several threads.
//!
//! [`HistoryWriter`] assumes one caller at a time. [`SharedWriter`] keeps
//! that assumption by holding a mutex across the whole read, diff and
//! commit sequence of every operation.

use crate::core::{SetAction, State};
use crate::delta::DiffEngine;
use crate::store::{StateContainer, Tracked};
use crate::writer::{HistoryError, HistoryWriter};
use parking_lot::Mutex;
use std::sync::Arc;

/// Cloneable handle to a writer shared between threads.
///
/// # Example
///
/// ```rust
/// use rewind::builder::HistoryBuilder;
/// use rewind::sync::SharedWriter;
/// use std::thread;
///
/// let writer = HistoryBuilder::new().initial(0i64).build().unwrap();
/// let shared = SharedWriter::new(writer);
///
/// let handles: Vec<_> = (0..4)
///     .map(|_| {
///         let shared = shared.clone();
///         thread::spawn(move || shared.mutate(|n| *n += 1).unwrap())
///     })
///     .collect();
/// for handle in handles {
///     handle.join().unwrap();
/// }
///
/// assert_eq!(shared.state(), 4);
/// assert_eq!(shared.read(|snapshot| snapshot.undo_history().len()), 4);
/// ```
pub struct SharedWriter<T, E, C> {
    inner: Arc<Mutex<HistoryWriter<T, E, C>>>,
}

impl<T, E, C> Clone for SharedWriter<T, E, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, E, C> SharedWriter<T, E, C>
where
    T: State,
    E: DiffEngine<T>,
    C: StateContainer<Tracked<T, E::Delta>>,
{
    /// Share `writer` behind a mutex.
    pub fn new(writer: HistoryWriter<T, E, C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(writer)),
        }
    }

    /// See [`HistoryWriter::write`].
    pub fn write(&self, action: SetAction<T>, replace: bool) -> Result<(), HistoryError> {
        self.inner.lock().write(action, replace)
    }

    /// See [`HistoryWriter::mutate`].
    pub fn mutate<F>(&self, f: F) -> Result<(), HistoryError>
    where
        F: FnOnce(&mut T),
    {
        self.inner.lock().mutate(f)
    }

    /// See [`HistoryWriter::set`].
    pub fn set(&self, state: T) {
        self.inner.lock().set(state);
    }

    /// See [`HistoryWriter::undo`].
    pub fn undo(&self) -> Result<bool, HistoryError> {
        self.inner.lock().undo()
    }

    /// See [`HistoryWriter::redo`].
    pub fn redo(&self) -> Result<bool, HistoryError> {
        self.inner.lock().redo()
    }

    /// See [`HistoryWriter::clear_history`].
    pub fn clear_history(&self) -> bool {
        self.inner.lock().clear_history()
    }

    /// Copy of the current application state.
    pub fn state(&self) -> T {
        self.inner.lock().state().clone()
    }

    /// Inspect the current snapshot while holding the lock.
    pub fn read<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&Tracked<T, E::Delta>) -> R,
    {
        f(self.inner.lock().snapshot())
    }

    /// Whether an undo would do anything.
    pub fn can_undo(&self) -> bool {
        self.inner.lock().can_undo()
    }

    /// Whether a redo would do anything.
    pub fn can_redo(&self) -> bool {
        self.inner.lock().can_redo()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::HistoryBuilder;
    use crate::delta::{JsonDiffEngine, Patch};
    use crate::store::Store;
    use serde::{Deserialize, Serialize};
    use std::thread;

    #[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
    struct Ledger {
        entries: Vec<u32>,
        total: u64,
    }

    type SharedLedger = SharedWriter<Ledger, JsonDiffEngine, Store<Tracked<Ledger, Patch>>>;

    fn shared_ledger() -> SharedLedger {
        SharedWriter::new(HistoryBuilder::new().initial(Ledger::default()).build().unwrap())
    }

    #[test]
    fn concurrent_mutations_are_all_recorded() {
        let shared = shared_ledger();

        let handles: Vec<_> = (0..8u32)
            .map(|worker| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for step in 0..25u32 {
                        let amount = worker * 100 + step;
                        shared
                            .mutate(move |l| {
                                l.entries.push(amount);
                                l.total += u64::from(amount);
                            })
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let state = shared.state();
        assert_eq!(state.entries.len(), 200);
        assert_eq!(state.total, state.entries.iter().map(|&n| u64::from(n)).sum::<u64>());
        assert_eq!(shared.read(|s| s.undo_history().len()), 200);

        while shared.undo().unwrap() {}
        assert_eq!(shared.state(), Ledger::default());
        assert!(!shared.can_undo());
        assert!(shared.can_redo());
    }

    #[test]
    fn concurrent_undo_and_redo_stay_consistent() {
        let shared = shared_ledger();
        for amount in 0..10 {
            shared.mutate(move |l| l.entries.push(amount)).unwrap();
        }

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for _ in 0..20 {
                        if i % 2 == 0 {
                            shared.undo().unwrap();
                        } else {
                            shared.redo().unwrap();
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        shared.read(|snapshot| {
            let undo = snapshot.undo_history().len();
            let redo = snapshot.redo_history().len();
            assert_eq!(undo + redo, 10);
            assert_eq!(snapshot.state().entries.len(), undo);
            assert_eq!(snapshot.can_undo(), undo > 0);
            assert_eq!(snapshot.can_redo(), redo > 0);
        });
    }

    #[test]
    fn replacement_through_shared_handle_skips_history() {
        let shared = shared_ledger();
        shared.mutate(|l| l.total = 5).unwrap();
        shared.set(Ledger::default());
        shared
            .write(SetAction::partial(serde_json::json!({ "total": 9 })), false)
            .unwrap();

        assert_eq!(shared.state().total, 9);
        assert_eq!(shared.read(|s| s.undo_history().len()), 1);
        assert!(shared.clear_history());
        assert!(!shared.can_undo());
        assert!(!shared.redo().unwrap());
    }
}
