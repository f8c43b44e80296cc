//! End-to-end walkthroughs of a counter store mixing recorded and
//! unrecorded updates.

use rewind::{HistoryBuilder, HistoryError, JsonHistory, SetAction, UpdateKind};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
struct Counter {
    count: i64,
}

struct CounterApp {
    history: JsonHistory<Counter>,
}

impl CounterApp {
    fn new() -> Self {
        Self {
            history: HistoryBuilder::new().initial(Counter::default()).build().unwrap(),
        }
    }

    fn increment(&mut self) {
        self.history.mutate(|c| c.count += 1).unwrap();
    }

    fn decrement(&mut self) {
        self.history.mutate(|c| c.count -= 1).unwrap();
    }

    fn increment_without_history(&mut self) {
        self.history.replace_with(|c| Counter { count: c.count + 1 });
    }

    fn reset_without_history(&mut self) {
        self.history.merge(json!({ "count": 0 })).unwrap();
    }

    fn count(&self) -> i64 {
        self.history.state().count
    }

    /// Count, undo length, redo length, can undo, can redo.
    fn observe(&self) -> (i64, usize, usize, bool, bool) {
        (
            self.count(),
            self.history.undo_len(),
            self.history.redo_len(),
            self.history.can_undo(),
            self.history.can_redo(),
        )
    }
}

#[test]
fn scenario_a_increments_undo_back_to_start() {
    let mut app = CounterApp::new();
    assert_eq!(app.observe(), (0, 0, 0, false, false));

    app.increment();
    assert_eq!(app.observe(), (1, 1, 0, true, false));
    app.increment();
    assert_eq!(app.observe(), (2, 2, 0, true, false));

    assert!(app.history.undo().unwrap());
    assert_eq!(app.observe(), (1, 1, 1, true, true));
    assert!(app.history.undo().unwrap());
    assert_eq!(app.observe(), (0, 0, 2, false, true));

    let before = app.history.snapshot().clone();
    assert!(!app.history.undo().unwrap());
    assert_eq!(app.observe(), (0, 0, 2, false, true));
    assert_eq!(app.history.snapshot(), &before);
}

#[test]
fn scenario_b_redo_then_new_increment_clears_redo() {
    let mut app = CounterApp::new();

    app.increment();
    assert_eq!(app.observe(), (1, 1, 0, true, false));

    assert!(app.history.undo().unwrap());
    assert_eq!(app.observe(), (0, 0, 1, false, true));

    assert!(app.history.redo().unwrap());
    assert_eq!(app.observe(), (1, 1, 0, true, false));

    app.increment();
    assert_eq!(app.observe(), (2, 2, 0, true, false));
    assert!(app.history.snapshot().redo_history().is_empty());
    assert!(!app.history.redo().unwrap());
    assert_eq!(app.count(), 2);
}

#[test]
fn redo_replays_undone_increment() {
    let mut app = CounterApp::new();
    app.increment();
    app.increment();
    assert_eq!(app.count(), 2);
    assert_eq!(app.history.undo_len(), 2);

    assert!(app.history.undo().unwrap());
    assert_eq!(app.count(), 1);
    assert!(app.history.can_undo());
    assert!(app.history.can_redo());

    assert!(app.history.redo().unwrap());
    assert_eq!(app.count(), 2);
    assert!(!app.history.can_redo());
}

#[test]
fn unrecorded_increment_is_skipped_by_undo() {
    let mut app = CounterApp::new();
    app.increment();
    app.increment_without_history();
    assert_eq!(app.count(), 2);
    assert_eq!(app.history.undo_len(), 1);

    assert!(app.history.undo().unwrap());
    assert_eq!(app.count(), 1);
    assert!(!app.history.can_undo());
}

#[test]
fn scenario_c_reset_keeps_history_and_undo_replays_inverse_delta() {
    let mut app = CounterApp::new();
    app.increment();
    app.increment();
    app.increment();

    app.reset_without_history();
    assert_eq!(app.count(), 0);
    assert_eq!(app.history.undo_len(), 3);

    // The inverse of the last increment sets `count` back to its recorded
    // previous value regardless of what the reset wrote.
    assert!(app.history.undo().unwrap());
    assert_eq!(app.count(), 2);
}

#[test]
fn mutation_after_undo_discards_redo() {
    let mut app = CounterApp::new();
    app.increment();
    app.increment();
    app.history.undo().unwrap();
    assert!(app.history.can_redo());

    app.decrement();
    assert_eq!(app.count(), 0);
    assert!(!app.history.can_redo());
    assert!(!app.history.redo().unwrap());
    assert_eq!(app.count(), 0);
}

#[test]
fn untagged_producers_are_classified_by_trial_run() {
    let mut app = CounterApp::new();

    let increment = SetAction::producer(|c: &mut Counter| {
        c.count += 1;
        None
    });
    assert_eq!(increment.kind(), UpdateKind::MutateInPlace);
    app.history.write(increment, false).unwrap();

    let jump = SetAction::producer(|c: &mut Counter| Some(Counter { count: c.count + 10 }));
    assert_eq!(jump.kind(), UpdateKind::Replacement);
    app.history.write(jump, false).unwrap();

    assert_eq!(app.count(), 11);
    assert_eq!(app.history.undo_len(), 1);

    // Undo restores the value recorded before the increment.
    app.history.undo().unwrap();
    assert_eq!(app.count(), 0);
}

#[test]
fn full_replacement_through_partial_requires_complete_state() {
    let mut app = CounterApp::new();
    app.increment();

    app.history
        .write(SetAction::partial(json!({ "count": 42 })), true)
        .unwrap();
    assert_eq!(app.count(), 42);

    let err = app
        .history
        .write(SetAction::partial(json!({ "total": 1 })), true)
        .unwrap_err();
    assert!(matches!(err, HistoryError::InvalidPartial(_)));
    assert_eq!(app.count(), 42);
    assert_eq!(app.history.undo_len(), 1);
}
