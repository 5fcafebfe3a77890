//! Listener registry.
//!
//! An ordered collection of listeners with fan-out. The opaque user-data
//! pointer of classic callback APIs becomes state captured by the closure,
//! so a listener is identified by its `Arc` allocation.

use std::sync::Arc;

/// A registered callback. Context travels inside the closure.
pub type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Ordered registry of listeners for one kind of state snapshot.
pub struct Notifier<T> {
    entries: Vec<Listener<T>>,
}

impl<T> Default for Notifier<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> Notifier<T> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a listener.
    ///
    /// No uniqueness is enforced: the same listener may be added more than
    /// once and will then be invoked once per entry.
    pub fn add(&mut self, listener: Listener<T>) {
        self.entries.push(listener);
    }

    /// Removes every entry holding the same listener.
    ///
    /// Removing a listener that was never added is a no-op.
    pub fn remove(&mut self, listener: &Listener<T>) {
        self.entries.retain(|entry| !Arc::ptr_eq(entry, listener));
    }

    /// Invokes every listener in registration order.
    ///
    /// Iterates over a snapshot of the registry, so a listener that adds or
    /// removes entries while being notified cannot affect the in-flight
    /// iteration.
    pub fn notify(&self, value: &T) {
        for listener in self.snapshot() {
            listener(value);
        }
    }

    /// Clones the current entries.
    ///
    /// Callers that must release a lock before fan-out take a snapshot
    /// first and invoke the listeners themselves.
    pub fn snapshot(&self) -> Vec<Listener<T>> {
        self.entries.clone()
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no listeners are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn counting_listener(log: &Arc<Mutex<Vec<u32>>>, tag: u32) -> Listener<u32> {
        let log = Arc::clone(log);
        Arc::new(move |value: &u32| log.lock().push(tag * 1000 + value))
    }

    #[test]
    fn test_notify_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut notifier = Notifier::new();
        notifier.add(counting_listener(&log, 1));
        notifier.add(counting_listener(&log, 2));

        notifier.notify(&7);
        assert_eq!(*log.lock(), vec![1007, 2007]);
    }

    #[test]
    fn test_duplicate_registration_fires_twice() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut notifier = Notifier::new();
        let listener = counting_listener(&log, 1);
        notifier.add(Arc::clone(&listener));
        notifier.add(Arc::clone(&listener));
        assert_eq!(notifier.len(), 2);

        notifier.notify(&1);
        assert_eq!(log.lock().len(), 2);

        // One remove drops both entries of the same listener.
        notifier.remove(&listener);
        assert!(notifier.is_empty());
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut notifier = Notifier::new();
        notifier.add(counting_listener(&log, 1));

        let stranger = counting_listener(&log, 9);
        notifier.remove(&stranger);
        assert_eq!(notifier.len(), 1);
    }

    #[test]
    fn test_snapshot_isolated_from_later_mutation() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut notifier = Notifier::new();
        let listener = counting_listener(&log, 1);
        notifier.add(Arc::clone(&listener));

        let snapshot = notifier.snapshot();
        notifier.remove(&listener);
        assert!(notifier.is_empty());

        // The snapshot taken before the removal still fires.
        for l in &snapshot {
            l(&3);
        }
        assert_eq!(*log.lock(), vec![1003]);
    }
}
