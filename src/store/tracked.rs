//! Snapshot of application state together with its history.

use crate::core::{HistoryEntry, Timeline};
use serde::{Deserialize, Serialize};

/// Application state as seen by container subscribers.
///
/// The domain state sits beside the undo/redo bookkeeping instead of inside
/// it, so a diff engine only ever sees the domain state. The availability
/// flags are computed from the stacks and cannot drift from them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tracked<T, D> {
    state: T,
    timeline: Timeline<D>,
}

impl<T, D> Tracked<T, D> {
    /// Wrap an initial state with an empty history.
    pub fn new(state: T) -> Self {
        Self {
            state,
            timeline: Timeline::new(),
        }
    }

    /// Pair a state with an existing timeline.
    pub(crate) fn from_parts(state: T, timeline: Timeline<D>) -> Self {
        Self { state, timeline }
    }

    /// Domain state.
    pub fn state(&self) -> &T {
        &self.state
    }

    /// Unwrap the domain state, dropping its history.
    pub fn into_state(self) -> T {
        self.state
    }

    /// Undo/redo history of the state.
    pub fn timeline(&self) -> &Timeline<D> {
        &self.timeline
    }

    /// Recorded updates, oldest first.
    pub fn undo_history(&self) -> Vec<&HistoryEntry<D>> {
        self.timeline.undo_entries()
    }

    /// Undone updates; the last one is redone first.
    pub fn redo_history(&self) -> Vec<&HistoryEntry<D>> {
        self.timeline.redo_entries()
    }

    /// Whether an undo would do anything.
    pub fn can_undo(&self) -> bool {
        self.timeline.can_undo()
    }

    /// Whether a redo would do anything.
    pub fn can_redo(&self) -> bool {
        self.timeline.can_redo()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_snapshot_has_no_history() {
        let tracked: Tracked<u32, String> = Tracked::new(7);
        assert_eq!(*tracked.state(), 7);
        assert!(tracked.undo_history().is_empty());
        assert!(tracked.redo_history().is_empty());
        assert!(!tracked.can_undo());
        assert!(!tracked.can_redo());
    }

    #[test]
    fn flags_follow_timeline() {
        let timeline = Timeline::new()
            .record(HistoryEntry::new(1, -1), None)
            .record(HistoryEntry::new(2, -2), None)
            .step_back()
            .unwrap();
        let tracked = Tracked::from_parts("state", timeline);

        assert!(tracked.can_undo());
        assert!(tracked.can_redo());
        assert_eq!(tracked.undo_history().len(), 1);
        assert_eq!(tracked.redo_history().len(), 1);
        assert_eq!(tracked.into_state(), "state");
    }
}
