//! Undo/redo timeline of recorded deltas.
//!
//! The timeline is immutable: every operation returns a new timeline and
//! leaves the receiver untouched. Callers can therefore compute the next
//! timeline, attempt the fallible delta step, and only commit both together.
//!
//! Both stacks are persistent linked lists of shared entries. A new timeline
//! shares every node it did not change with the one it was derived from, so
//! carrying history over, recording, undoing and redoing are all O(1)
//! regardless of how long the history is.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// One committed mutate-in-place update.
///
/// Holds the forward delta produced by the diff engine together with the
/// inverse that exactly reverses it. Entries are never modified after they
/// are created; undo and redo move them between the two stacks.
///
/// # Example
///
/// ```rust
/// use rewind::core::HistoryEntry;
///
/// let entry = HistoryEntry::new("count += 1", "count -= 1");
/// assert_eq!(entry.forward(), &"count += 1");
/// assert_eq!(entry.inverse(), &"count -= 1");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry<D> {
    id: Uuid,
    recorded_at: DateTime<Utc>,
    forward: D,
    inverse: D,
}

impl<D> HistoryEntry<D> {
    /// Create an entry stamped with a fresh id and the current time.
    pub fn new(forward: D, inverse: D) -> Self {
        Self {
            id: Uuid::new_v4(),
            recorded_at: Utc::now(),
            forward,
            inverse,
        }
    }

    /// Identity of the entry, stable across moves between stacks.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// When the update was committed.
    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    /// Delta that replays the update.
    pub fn forward(&self) -> &D {
        &self.forward
    }

    /// Delta that reverts the update.
    pub fn inverse(&self) -> &D {
        &self.inverse
    }
}


struct Node<D> {
    entry: Arc<HistoryEntry<D>>,
    below: Option<Arc<Node<D>>>,
}

/// Persistent stack of shared entries.
///
/// Only the top `len` nodes are visible. Eviction lowers `len` first and
/// drops the hidden nodes once they outnumber the visible ones, which keeps
/// eviction amortized O(1).
struct Stack<D> {
    top: Option<Arc<Node<D>>>,
    len: usize,
    depth: usize,
}

impl<D> Stack<D> {
    fn new() -> Self {
        Self {
            top: None,
            len: 0,
            depth: 0,
        }
    }

    fn from_oldest_first(entries: impl IntoIterator<Item = Arc<HistoryEntry<D>>>) -> Self {
        entries
            .into_iter()
            .fold(Self::new(), |stack, entry| stack.push(entry))
    }

    fn push(&self, entry: Arc<HistoryEntry<D>>) -> Self {
        Self {
            top: Some(Arc::new(Node {
                entry,
                below: self.top.clone(),
            })),
            len: self.len + 1,
            depth: self.depth + 1,
        }
    }

    fn pop(&self) -> Option<(Arc<HistoryEntry<D>>, Self)> {
        if self.len == 0 {
            return None;
        }
        let node = self.top.as_ref()?;
        let rest = Self {
            top: node.below.clone(),
            len: self.len - 1,
            depth: self.depth - 1,
        };
        Some((Arc::clone(&node.entry), rest))
    }

    fn peek(&self) -> Option<&HistoryEntry<D>> {
        self.iter().next()
    }

    fn truncated(self, max: usize) -> Self {
        let len = self.len.min(max);
        if self.depth > max.saturating_mul(2) {
            let mut kept: Vec<_> = self.iter_shared().take(len).cloned().collect();
            kept.reverse();
            return Self::from_oldest_first(kept);
        }
        Self {
            top: self.top.clone(),
            len,
            depth: self.depth,
        }
    }

    /// Visible entries, most recent first.
    fn iter(&self) -> impl Iterator<Item = &HistoryEntry<D>> {
        self.iter_shared().map(|entry| &**entry)
    }

    fn iter_shared(&self) -> impl Iterator<Item = &Arc<HistoryEntry<D>>> {
        let mut next = self.top.as_deref();
        let mut remaining = self.len;
        std::iter::from_fn(move || {
            if remaining == 0 {
                return None;
            }
            let node = next?;
            remaining -= 1;
            next = node.below.as_deref();
            Some(&node.entry)
        })
    }

    fn oldest_first(&self) -> Vec<&HistoryEntry<D>> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.reverse();
        entries
    }
}

impl<D> Clone for Stack<D> {
    fn clone(&self) -> Self {
        Self {
            top: self.top.clone(),
            len: self.len,
            depth: self.depth,
        }
    }
}

// Unlink iteratively; the default recursive drop overflows on long histories.
impl<D> Drop for Stack<D> {
    fn drop(&mut self) {
        let mut next = self.top.take();
        while let Some(node) = next {
            match Arc::try_unwrap(node) {
                Ok(mut node) => next = node.below.take(),
                Err(_) => break,
            }
        }
    }
}

impl<D: PartialEq> PartialEq for Stack<D> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<D: fmt::Debug> fmt::Debug for Stack<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.oldest_first()).finish()
    }
}

impl<D: Serialize> Serialize for Stack<D> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.oldest_first())
    }
}

impl<'de, D: Deserialize<'de>> Deserialize<'de> for Stack<D> {
    fn deserialize<De: Deserializer<'de>>(deserializer: De) -> Result<Self, De::Error> {
        let entries = Vec::<HistoryEntry<D>>::deserialize(deserializer)?;
        Ok(Self::from_oldest_first(entries.into_iter().map(Arc::new)))
    }
}

/// Linear history as a pair of stacks.
///
/// The most recent committed update is on top of `undo`; the most recently
/// undone one is on top of `redo`. Cloning a timeline is O(1).
///
/// # Example
///
/// ```rust
/// use rewind::core::{HistoryEntry, Timeline};
///
/// let timeline = Timeline::new()
///     .record(HistoryEntry::new("a", "undo a"), None)
///     .record(HistoryEntry::new("b", "undo b"), None);
/// assert_eq!(timeline.undo_len(), 2);
///
/// let timeline = timeline.step_back().unwrap();
/// assert_eq!(timeline.undo_len(), 1);
/// assert_eq!(timeline.redo_len(), 1);
/// assert_eq!(timeline.last_redo().unwrap().forward(), &"b");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Timeline<D> {
    undo: Stack<D>,
    redo: Stack<D>,
}

impl<D> Default for Timeline<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Timeline<D> {
    /// Create a timeline with both stacks empty.
    pub fn new() -> Self {
        Self {
            undo: Stack::new(),
            redo: Stack::new(),
        }
    }

    /// Entries that can be undone, oldest first.
    pub fn undo_entries(&self) -> Vec<&HistoryEntry<D>> {
        self.undo.oldest_first()
    }

    /// Entries that can be redone, oldest undo first.
    pub fn redo_entries(&self) -> Vec<&HistoryEntry<D>> {
        self.redo.oldest_first()
    }

    /// Number of entries that can be undone.
    pub fn undo_len(&self) -> usize {
        self.undo.len
    }

    /// Number of entries that can be redone.
    pub fn redo_len(&self) -> usize {
        self.redo.len
    }

    /// Whether an undo would do anything.
    pub fn can_undo(&self) -> bool {
        self.undo.len > 0
    }

    /// Whether a redo would do anything.
    pub fn can_redo(&self) -> bool {
        self.redo.len > 0
    }

    /// Entry the next undo would revert.
    pub fn last_undo(&self) -> Option<&HistoryEntry<D>> {
        self.undo.peek()
    }

    /// Entry the next redo would replay.
    pub fn last_redo(&self) -> Option<&HistoryEntry<D>> {
        self.redo.peek()
    }

    /// Record a new entry, returning a new timeline.
    ///
    /// The redo stack is always cleared: recording after an undo discards
    /// the undone branch. With `max_depth` set, the oldest undo entries
    /// beyond the bound are evicted.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rewind::core::{HistoryEntry, Timeline};
    ///
    /// let timeline = Timeline::new()
    ///     .record(HistoryEntry::new(1, -1), Some(2))
    ///     .record(HistoryEntry::new(2, -2), Some(2))
    ///     .record(HistoryEntry::new(3, -3), Some(2));
    ///
    /// let kept: Vec<_> = timeline.undo_entries().iter().map(|e| *e.forward()).collect();
    /// assert_eq!(kept, vec![2, 3]);
    /// ```
    pub fn record(&self, entry: HistoryEntry<D>, max_depth: Option<usize>) -> Self {
        let undo = self.undo.push(Arc::new(entry));
        Self {
            undo: match max_depth {
                Some(max) => undo.truncated(max),
                None => undo,
            },
            redo: Stack::new(),
        }
    }

    /// Move the most recent undo entry onto the redo stack.
    ///
    /// Returns `None` when there is nothing to undo.
    pub fn step_back(&self) -> Option<Self> {
        let (entry, undo) = self.undo.pop()?;
        Some(Self {
            undo,
            redo: self.redo.push(entry),
        })
    }

    /// Move the most recent redo entry back onto the undo stack.
    ///
    /// Returns `None` when there is nothing to redo.
    pub fn step_forward(&self) -> Option<Self> {
        let (entry, redo) = self.redo.pop()?;
        Some(Self {
            undo: self.undo.push(entry),
            redo,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;

    fn entry(n: i32) -> HistoryEntry<i32> {
        HistoryEntry::new(n, -n)
    }

    fn forwards(entries: Vec<&HistoryEntry<i32>>) -> Vec<i32> {
        entries.iter().map(|e| *e.forward()).collect()
    }

    fn timeline_of(len: i32, max_depth: Option<usize>) -> Timeline<i32> {
        (1..=len).fold(Timeline::new(), |timeline, n| timeline.record(entry(n), max_depth))
    }

    #[test]
    fn new_timeline_is_empty() {
        let timeline: Timeline<i32> = Timeline::new();
        assert_eq!(timeline.undo_len(), 0);
        assert_eq!(timeline.redo_len(), 0);
        assert!(!timeline.can_undo());
        assert!(!timeline.can_redo());
        assert!(timeline.last_undo().is_none());
        assert!(timeline.last_redo().is_none());
    }

    #[test]
    fn record_is_immutable() {
        let timeline = Timeline::new();
        let recorded = timeline.record(entry(1), None);

        assert_eq!(timeline.undo_len(), 0);
        assert_eq!(recorded.undo_len(), 1);
    }

    #[test]
    fn record_clears_redo() {
        let timeline = timeline_of(2, None).step_back().unwrap();
        assert!(timeline.can_redo());

        let timeline = timeline.record(entry(3), None);
        assert_eq!(forwards(timeline.undo_entries()), vec![1, 3]);
        assert!(!timeline.can_redo());
    }

    #[test]
    fn step_back_moves_entry_without_copying() {
        let timeline = Timeline::new().record(entry(1), None);
        let id = timeline.last_undo().unwrap().id();

        let timeline = timeline.step_back().unwrap();
        assert!(timeline.undo_entries().is_empty());
        assert_eq!(timeline.last_redo().unwrap().id(), id);

        let timeline = timeline.step_forward().unwrap();
        assert!(timeline.redo_entries().is_empty());
        assert_eq!(timeline.last_undo().unwrap().id(), id);
    }

    #[test]
    fn derived_timelines_share_entries() {
        let timeline = timeline_of(1_000, None);
        let top = timeline.last_undo().unwrap();

        let carried = timeline.clone();
        assert!(ptr::eq(carried.last_undo().unwrap(), top));

        let undone = timeline.step_back().unwrap();
        assert!(ptr::eq(undone.last_redo().unwrap(), top));

        let redone = undone.step_forward().unwrap();
        assert!(ptr::eq(redone.last_undo().unwrap(), top));

        let below = undone.last_undo().unwrap();
        let recorded = undone.record(entry(0), None).step_back().unwrap();
        assert!(ptr::eq(recorded.last_undo().unwrap(), below));
    }

    #[test]
    fn stepping_on_empty_stacks_returns_none() {
        let timeline: Timeline<i32> = Timeline::new();
        assert!(timeline.step_back().is_none());
        assert!(timeline.step_forward().is_none());
    }

    #[test]
    fn redo_order_is_last_in_first_out() {
        let timeline = timeline_of(3, None)
            .step_back()
            .unwrap()
            .step_back()
            .unwrap();

        assert_eq!(forwards(timeline.undo_entries()), vec![1]);
        assert_eq!(forwards(timeline.redo_entries()), vec![3, 2]);
        assert_eq!(*timeline.last_redo().unwrap().forward(), 2);
    }

    #[test]
    fn max_depth_evicts_oldest() {
        let mut timeline = Timeline::new();
        for n in 1..=5 {
            timeline = timeline.record(entry(n), Some(3));
            assert!(timeline.undo_len() <= 3);
        }
        assert_eq!(forwards(timeline.undo_entries()), vec![3, 4, 5]);
    }

    #[test]
    fn evicted_entries_stay_hidden_across_steps() {
        let timeline = timeline_of(50, Some(4));
        assert_eq!(forwards(timeline.undo_entries()), vec![47, 48, 49, 50]);

        let mut drained = timeline.clone();
        while let Some(next) = drained.step_back() {
            drained = next;
        }
        assert_eq!(drained.undo_len(), 0);
        assert!(drained.last_undo().is_none());
        assert_eq!(forwards(drained.redo_entries()), vec![50, 49, 48, 47]);

        let replayed = drained.step_forward().unwrap();
        assert_eq!(forwards(replayed.undo_entries()), vec![47]);
    }

    #[test]
    fn long_history_drops_without_overflow() {
        let timeline = timeline_of(200_000, None);
        assert_eq!(timeline.undo_len(), 200_000);
        drop(timeline);
    }

    #[test]
    fn entries_get_distinct_ids() {
        let a = entry(1);
        let b = entry(1);
        assert_ne!(a.id(), b.id());
        assert!(b.recorded_at() >= a.recorded_at());
    }

    #[test]
    fn timeline_serializes_correctly() {
        let timeline = timeline_of(3, Some(2)).step_back().unwrap();

        let json = serde_json::to_value(&timeline).unwrap();
        assert_eq!(json["undo"].as_array().unwrap().len(), 1);
        assert_eq!(json["redo"].as_array().unwrap().len(), 1);

        let deserialized: Timeline<i32> = serde_json::from_value(json).unwrap();
        assert_eq!(timeline, deserialized);
    }
}
