//! History-tracked writer around a state container.
//!
//! Every write goes through [`HistoryWriter`]. Mutate-in-place updates are
//! diffed into a forward/inverse delta pair that is pushed onto the undo
//! stack; every other update is committed as is. Undo and redo replay the
//! stored deltas and move entries between the two stacks.
//!
//! Each successful call commits exactly once to the container, so
//! subscribers never observe an intermediate state. A failing call commits
//! nothing.

mod error;

pub use error::{Direction, HistoryError};

use crate::builder::HistoryConfig;
use crate::core::{HistoryEntry, SetAction, State};
use crate::delta::{merge_partial, DeltaError, DiffEngine, JsonDiffEngine, Patch};
use crate::store::{StateContainer, Store, SubscriptionId, Tracked};
use serde_json::Value;
use std::marker::PhantomData;

/// Writer using the bundled JSON diff engine and [`Store`].
pub type JsonHistory<T> = HistoryWriter<T, JsonDiffEngine, Store<Tracked<T, Patch>>>;

/// Undo/redo decorator for a state container's write path.
///
/// # Example
///
/// ```rust
/// use rewind::builder::HistoryBuilder;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// struct Counter {
///     count: i64,
/// }
///
/// let mut history = HistoryBuilder::new()
///     .initial(Counter { count: 0 })
///     .build()
///     .unwrap();
///
/// history.mutate(|c| c.count += 1).unwrap();
/// history.mutate(|c| c.count += 1).unwrap();
/// assert_eq!(history.state().count, 2);
///
/// history.undo().unwrap();
/// assert_eq!(history.state().count, 1);
///
/// history.redo().unwrap();
/// assert_eq!(history.state().count, 2);
/// ```
#[derive(Debug)]
pub struct HistoryWriter<T, E, C> {
    container: C,
    engine: E,
    config: HistoryConfig,
    _state: PhantomData<fn() -> T>,
}

impl<T, E, C> HistoryWriter<T, E, C>
where
    T: State,
    E: DiffEngine<T>,
    C: StateContainer<Tracked<T, E::Delta>>,
{
    /// Assemble a writer from a container, a diff engine and a config.
    ///
    /// The container's current snapshot, including any history it already
    /// carries, becomes the starting point.
    pub fn with_parts(container: C, engine: E, config: HistoryConfig) -> Self {
        Self {
            container,
            engine,
            config,
            _state: PhantomData,
        }
    }

    /// Current application state.
    pub fn state(&self) -> &T {
        self.container.get().state()
    }

    /// Current state with its history.
    pub fn snapshot(&self) -> &Tracked<T, E::Delta> {
        self.container.get()
    }

    /// Wrapped container.
    pub fn container(&self) -> &C {
        &self.container
    }

    /// Diff engine computing and applying deltas.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Configuration the writer was built with.
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Whether an undo would do anything.
    pub fn can_undo(&self) -> bool {
        self.snapshot().can_undo()
    }

    /// Whether a redo would do anything.
    pub fn can_redo(&self) -> bool {
        self.snapshot().can_redo()
    }

    /// Number of recorded updates that can be undone.
    pub fn undo_len(&self) -> usize {
        self.snapshot().timeline().undo_len()
    }

    /// Number of undone updates that can be redone.
    pub fn redo_len(&self) -> usize {
        self.snapshot().timeline().redo_len()
    }

    /// Unwrap the container, keeping its current snapshot.
    pub fn into_container(self) -> C {
        self.container
    }

    /// Apply an update.
    ///
    /// [`SetAction::Mutate`] is recorded in history and clears the redo
    /// stack. Every other action commits directly and leaves both stacks
    /// untouched. `replace` only affects [`SetAction::Partial`]: when set,
    /// the partial must describe a complete state instead of being merged.
    pub fn write(&mut self, action: SetAction<T>, replace: bool) -> Result<(), HistoryError> {
        match action {
            SetAction::Value(next) => self.commit_untracked(next),
            SetAction::Partial(fields) => {
                let next = merge_partial(self.state(), fields, replace)
                    .map_err(HistoryError::InvalidPartial)?;
                self.commit_untracked(next);
            }
            SetAction::Replace(f) => {
                let next = f(self.state());
                self.commit_untracked(next);
            }
            SetAction::Mutate(f) => self.commit_tracked(f)?,
        }
        Ok(())
    }

    /// Mutate a draft of the current state and record the change.
    pub fn mutate<F>(&mut self, f: F) -> Result<(), HistoryError>
    where
        F: FnOnce(&mut T),
    {
        self.commit_tracked(f)
    }

    /// Replace the state with a value computed from it, without history.
    pub fn replace_with<F>(&mut self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        let next = f(self.state());
        self.commit_untracked(next);
    }

    /// Replace the state, without history.
    pub fn set(&mut self, state: T) {
        self.commit_untracked(state);
    }

    /// Merge top-level fields into the state, without history.
    pub fn merge(&mut self, fields: Value) -> Result<(), HistoryError> {
        self.write(SetAction::Partial(fields), false)
    }

    /// Revert the most recent recorded update.
    ///
    /// Returns `Ok(false)` without touching anything when there is nothing
    /// to undo.
    pub fn undo(&mut self) -> Result<bool, HistoryError> {
        let current = self.container.get();
        let timeline = current.timeline();
        let Some((entry, moved)) = timeline.last_undo().zip(timeline.step_back()) else {
            tracing::trace!("undo requested with empty undo stack");
            return Ok(false);
        };

        let next = self
            .engine
            .apply_delta(current.state(), entry.inverse())
            .map_err(|source| step_failed(Direction::Undo, entry, source))?;
        let entry_id = entry.id();

        self.container.set(Tracked::from_parts(next, moved));
        tracing::debug!(
            entry_id = %entry_id,
            undo_len = self.undo_len(),
            redo_len = self.redo_len(),
            "undid recorded mutation"
        );
        Ok(true)
    }

    /// Replay the most recently undone update.
    ///
    /// Returns `Ok(false)` without touching anything when there is nothing
    /// to redo.
    pub fn redo(&mut self) -> Result<bool, HistoryError> {
        let current = self.container.get();
        let timeline = current.timeline();
        let Some((entry, moved)) = timeline.last_redo().zip(timeline.step_forward()) else {
            tracing::trace!("redo requested with empty redo stack");
            return Ok(false);
        };

        let next = self
            .engine
            .apply_delta(current.state(), entry.forward())
            .map_err(|source| step_failed(Direction::Redo, entry, source))?;
        let entry_id = entry.id();

        self.container.set(Tracked::from_parts(next, moved));
        tracing::debug!(
            entry_id = %entry_id,
            undo_len = self.undo_len(),
            redo_len = self.redo_len(),
            "redid recorded mutation"
        );
        Ok(true)
    }

    /// Drop both stacks, keeping the current state.
    ///
    /// Returns `false` without committing when there was no history.
    pub fn clear_history(&mut self) -> bool {
        let current = self.container.get();
        if !current.can_undo() && !current.can_redo() {
            return false;
        }
        let state = current.state().clone();
        self.container.set(Tracked::new(state));
        tracing::debug!("cleared undo and redo history");
        true
    }

    fn commit_tracked<F>(&mut self, mutator: F) -> Result<(), HistoryError>
    where
        F: FnOnce(&mut T),
    {
        let current = self.container.get();
        let (next, forward, inverse) = self
            .engine
            .diff_with_delta(current.state(), mutator)
            .map_err(|source| {
                tracing::warn!(error = %source, "failed to compute delta for mutation");
                HistoryError::DeltaComputation(source)
            })?;

        let entry = HistoryEntry::new(forward, inverse);
        let entry_id = entry.id();
        let redo_cleared = current.timeline().redo_len();
        let timeline = current.timeline().record(entry, self.config.max_depth);
        let evicted = (current.timeline().undo_len() + 1).saturating_sub(timeline.undo_len());

        self.container.set(Tracked::from_parts(next, timeline));
        tracing::debug!(
            entry_id = %entry_id,
            undo_len = self.undo_len(),
            redo_cleared,
            evicted,
            "recorded mutation"
        );
        Ok(())
    }

    fn commit_untracked(&mut self, next: T) {
        let timeline = self.container.get().timeline().clone();
        self.container.set(Tracked::from_parts(next, timeline));
        tracing::trace!("committed replacement without history");
    }
}

impl<T, E> HistoryWriter<T, E, Store<Tracked<T, <E as DiffEngine<T>>::Delta>>>
where
    T: State,
    E: DiffEngine<T>,
{
    /// Register a listener called once per committed change.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&Tracked<T, E::Delta>, &Tracked<T, E::Delta>) + Send + Sync + 'static,
    {
        self.container.subscribe(listener)
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.container.unsubscribe(id)
    }
}

fn step_failed<D>(direction: Direction, entry: &HistoryEntry<D>, source: DeltaError) -> HistoryError {
    tracing::warn!(
        %direction,
        entry_id = %entry.id(),
        error = %source,
        "failed to apply stored delta"
    );
    HistoryError::DeltaApplication { direction, source }
}
