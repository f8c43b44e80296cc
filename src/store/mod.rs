//! State containers.
//!
//! A [`StateContainer`] holds the current value and applies transitions to
//! it. The history writer only needs to read the current value and replace
//! it; [`Store`] is the bundled container and adds change subscriptions.

mod tracked;

pub use tracked::Tracked;

use std::fmt;

/// Holder of a single mutable value.
pub trait StateContainer<S> {
    /// Current value.
    fn get(&self) -> &S;

    /// Replace the current value.
    ///
    /// The transition must be applied, and any observers notified, before
    /// this returns.
    fn set(&mut self, next: S);
}

/// Change listener, called with the previous and the next value.
pub type Listener<S> = Box<dyn Fn(&S, &S) + Send + Sync>;

/// Handle returned by [`Store::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Container that notifies subscribers on every `set`.
///
/// # Example
///
/// ```rust
/// use rewind::store::{StateContainer, Store};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let changes = Arc::new(AtomicUsize::new(0));
/// let seen = Arc::clone(&changes);
///
/// let mut store = Store::new(1);
/// store.subscribe(move |_, _| {
///     seen.fetch_add(1, Ordering::SeqCst);
/// });
///
/// store.set(2);
/// assert_eq!(*store.get(), 2);
/// assert_eq!(changes.load(Ordering::SeqCst), 1);
/// ```
pub struct Store<S> {
    current: S,
    listeners: Vec<(SubscriptionId, Listener<S>)>,
    next_id: u64,
}

impl<S> Store<S> {
    /// Create a store holding `initial`, with no listeners.
    pub fn new(initial: S) -> Self {
        Self {
            current: initial,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Register a listener for every subsequent change.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&S, &S) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<S> StateContainer<S> for Store<S> {
    fn get(&self) -> &S {
        &self.current
    }

    fn set(&mut self, next: S) {
        let previous = std::mem::replace(&mut self.current, next);
        for (_, listener) in &self.listeners {
            listener(&previous, &self.current);
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for Store<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("current", &self.current)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recording_listener(log: &Arc<Mutex<Vec<(i32, i32)>>>) -> impl Fn(&i32, &i32) + Send + Sync {
        let log = Arc::clone(log);
        move |previous: &i32, next: &i32| log.lock().unwrap().push((*previous, *next))
    }

    #[test]
    fn set_replaces_value() {
        let mut store = Store::new(1);
        store.set(5);
        assert_eq!(*store.get(), 5);
    }

    #[test]
    fn listeners_see_previous_and_next() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut store = Store::new(1);
        store.subscribe(recording_listener(&log));

        store.set(2);
        store.set(3);

        assert_eq!(*log.lock().unwrap(), vec![(1, 2), (2, 3)]);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut store = Store::new(0);
        let id = store.subscribe(recording_listener(&log));
        store.subscribe(|_, _| {});
        assert_eq!(store.listener_count(), 2);

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        assert_eq!(store.listener_count(), 1);

        store.set(1);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn subscription_ids_are_unique() {
        let mut store = Store::new(());
        let a = store.subscribe(|_, _| {});
        let b = store.subscribe(|_, _| {});
        assert_ne!(a, b);
    }
}
