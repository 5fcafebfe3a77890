//! Behavioral tests for the data-usage counter.
//!
//! Everything runs against the in-memory store backend, plus small doubles
//! for the failure paths (unreachable store, per-key read/write errors).

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;

use cellbar_core::{CounterSnapshot, TrafficProfile};
use cellbar_monitor::{CounterListener, DataCounter};
use cellbar_store::{
    ChangeHandler, MemoryStore, SettingsStore, StoreConnector, StoreError, WatchId, connector,
    keys,
};

// ============================================================================
// Helpers
// ============================================================================

type Recorded = Arc<Mutex<Vec<CounterSnapshot>>>;

fn recorder() -> (CounterListener, Recorded) {
    let seen: Recorded = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let listener: CounterListener = Arc::new(move |snapshot: &CounterSnapshot| {
        sink.lock().push(snapshot.clone());
    });
    (listener, seen)
}

fn last(seen: &Recorded) -> CounterSnapshot {
    seen.lock().last().cloned().expect("no snapshot delivered")
}

/// Connector standing in for an unreachable settings store.
struct DownConnector;

impl StoreConnector for DownConnector {
    fn connect(&self) -> Result<Arc<dyn SettingsStore>, StoreError> {
        Err(StoreError::Unavailable("store daemon not running".into()))
    }
}

/// Store wrapper that fails selected keys and records write attempts.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    fail_reads: HashSet<String>,
    fail_writes: HashSet<String>,
    write_attempts: Mutex<Vec<String>>,
}

impl FlakyStore {
    fn fail_read(mut self, key: &str) -> Self {
        self.fail_reads.insert(key.to_owned());
        self
    }

    fn fail_write(mut self, key: &str) -> Self {
        self.fail_writes.insert(key.to_owned());
        self
    }

    fn note_write(&self, key: &str) -> Result<(), StoreError> {
        self.write_attempts.lock().push(key.to_owned());
        if self.fail_writes.contains(key) {
            return Err(StoreError::Write {
                key: key.to_owned(),
                reason: "injected".into(),
            });
        }
        Ok(())
    }
}

impl SettingsStore for FlakyStore {
    fn get_string(&self, key: &str) -> Result<Option<String>, StoreError> {
        if self.fail_reads.contains(key) {
            return Err(StoreError::Read {
                key: key.to_owned(),
                reason: "injected".into(),
            });
        }
        self.inner.get_string(key)
    }

    fn set_string(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.note_write(key)?;
        self.inner.set_string(key, value)
    }

    fn get_bool(&self, key: &str) -> Result<bool, StoreError> {
        if self.fail_reads.contains(key) {
            return Err(StoreError::Read {
                key: key.to_owned(),
                reason: "injected".into(),
            });
        }
        self.inner.get_bool(key)
    }

    fn set_bool(&self, key: &str, value: bool) -> Result<(), StoreError> {
        self.note_write(key)?;
        self.inner.set_bool(key, value)
    }

    fn unset(&self, key: &str) -> Result<(), StoreError> {
        self.note_write(key)?;
        self.inner.unset(key)
    }

    fn add_watch_dir(&self, dir: &str) -> Result<(), StoreError> {
        self.inner.add_watch_dir(dir)
    }

    fn remove_watch_dir(&self, dir: &str) -> Result<(), StoreError> {
        self.inner.remove_watch_dir(dir)
    }

    fn subscribe(&self, dir: &str, handler: ChangeHandler) -> Result<WatchId, StoreError> {
        self.inner.subscribe(dir, handler)
    }

    fn unsubscribe(&self, id: WatchId) {
        self.inner.unsubscribe(id);
    }
}

// ============================================================================
// Registration & Initial Snapshot
// ============================================================================

#[test]
fn registration_delivers_persisted_values_immediately() {
    let store = MemoryStore::shared();
    let k = keys::home();
    store.set_string(k.rx_bytes, "4096").unwrap();
    store.set_string(k.tx_bytes, "1024").unwrap();
    store.set_string(k.reset_time, "1700000000").unwrap();
    store.set_string(k.warning_limit, "500").unwrap();
    store.set_bool(k.notification_enabled, true).unwrap();

    let counter = DataCounter::new(connector(store));
    let (listener, seen) = recorder();
    assert!(counter.register(listener, TrafficProfile::Home));

    let events = seen.lock();
    assert_eq!(events.len(), 1, "exactly one initial notification");
    let snap = &events[0];
    assert_eq!(snap.rx_bytes, 4096);
    assert_eq!(snap.tx_bytes, 1024);
    assert_eq!(snap.reset_time.unwrap().timestamp(), 1_700_000_000);
    assert_eq!(snap.warning_limit.as_deref(), Some("500"));
    assert!(snap.notification_enabled);
}

#[test]
fn empty_store_yields_default_snapshot() {
    let store = MemoryStore::shared();
    let counter = DataCounter::new(connector(store));
    let (listener, seen) = recorder();
    assert!(counter.register(listener, TrafficProfile::Home));

    assert_eq!(last(&seen), CounterSnapshot::default());
}

#[test]
fn every_registration_rebroadcasts_to_all_listeners() {
    let store = MemoryStore::shared();
    let counter = DataCounter::new(connector(store));

    let (first, first_seen) = recorder();
    let (second, second_seen) = recorder();
    assert!(counter.register(first, TrafficProfile::Home));
    assert!(counter.register(second, TrafficProfile::Home));

    assert_eq!(first_seen.lock().len(), 2);
    assert_eq!(second_seen.lock().len(), 1);
}

#[test]
fn malformed_stored_counter_loads_as_zero() {
    let store = MemoryStore::shared();
    store
        .set_string(keys::home().tx_bytes, "not a number")
        .unwrap();

    let counter = DataCounter::new(connector(store));
    let (listener, seen) = recorder();
    assert!(counter.register(listener, TrafficProfile::Home));
    assert_eq!(last(&seen).tx_bytes, 0);
}

// ============================================================================
// Subscriber Bookkeeping
// ============================================================================

#[test]
fn store_subscription_released_exactly_once() {
    let store = MemoryStore::shared();
    let counter = DataCounter::new(connector(store.clone()));

    let (first, _) = recorder();
    let (second, _) = recorder();
    assert!(counter.register(Arc::clone(&first), TrafficProfile::Home));
    assert!(counter.register(Arc::clone(&second), TrafficProfile::Home));
    assert_eq!(store.watch_count(), 1);

    // Unregistering a listener that was never added changes nothing.
    let (stranger, _) = recorder();
    counter.unregister(&stranger);
    assert_eq!(store.watch_count(), 1);

    counter.unregister(&first);
    assert_eq!(store.watch_count(), 1);

    counter.unregister(&second);
    assert_eq!(store.watch_count(), 0);
    assert_eq!(store.watched_dir_count(), 0);

    // Repeating the unregistration stays a no-op.
    counter.unregister(&second);
    assert_eq!(store.watch_count(), 0);
}

#[test]
fn profile_is_fixed_by_first_activation() {
    let store = MemoryStore::shared();
    store.set_string(keys::home().rx_bytes, "1").unwrap();
    store.set_string(keys::roaming().rx_bytes, "2").unwrap();

    let counter = DataCounter::new(connector(store));
    let (first, _) = recorder();
    assert!(counter.register(first, TrafficProfile::Home));

    // The counter is already active; the roaming request is ignored.
    let (second, second_seen) = recorder();
    assert!(counter.register(second, TrafficProfile::Roaming));
    assert_eq!(last(&second_seen).rx_bytes, 1);
}

// ============================================================================
// Store Change Mirroring
// ============================================================================

#[test]
fn rx_change_updates_only_rx() {
    let store = MemoryStore::shared();
    let k = keys::home();
    store.set_string(k.tx_bytes, "55").unwrap();
    store.set_bool(k.notification_enabled, true).unwrap();

    let counter = DataCounter::new(connector(store.clone()));
    let (listener, seen) = recorder();
    assert!(counter.register(listener, TrafficProfile::Home));
    let before = last(&seen);

    store.set_string(k.rx_bytes, "12345").unwrap();

    let after = last(&seen);
    assert_eq!(after.rx_bytes, 12345);
    assert_eq!(after.tx_bytes, before.tx_bytes);
    assert_eq!(after.reset_time, before.reset_time);
    assert_eq!(after.notification_enabled, before.notification_enabled);
    assert_eq!(after.warning_limit, before.warning_limit);
}

#[test]
fn roaming_tx_change_is_applied() {
    let store = MemoryStore::shared();
    let counter = DataCounter::new(connector(store.clone()));
    let (listener, seen) = recorder();
    assert!(counter.register(listener, TrafficProfile::Roaming));

    store.set_string(keys::roaming().tx_bytes, "777").unwrap();
    assert_eq!(last(&seen).tx_bytes, 777);
}

#[test]
fn changed_warning_limit_is_reencoded_from_digits() {
    let store = MemoryStore::shared();
    let counter = DataCounter::new(connector(store.clone()));
    let (listener, seen) = recorder();
    assert!(counter.register(listener, TrafficProfile::Home));

    store
        .set_string(keys::home().warning_limit, "070 megabytes")
        .unwrap();
    assert_eq!(last(&seen).warning_limit.as_deref(), Some("70"));

    store.set_string(keys::home().warning_limit, "garbage").unwrap();
    assert_eq!(last(&seen).warning_limit.as_deref(), Some("0"));
}

#[test]
fn notification_flag_follows_bool_events_only() {
    let store = MemoryStore::shared();
    let counter = DataCounter::new(connector(store.clone()));
    let (listener, seen) = recorder();
    assert!(counter.register(listener, TrafficProfile::Home));

    store.set_bool(keys::home().notification_enabled, true).unwrap();
    assert!(last(&seen).notification_enabled);

    // A non-boolean value for the flag key reads as disabled.
    store
        .set_string(keys::home().notification_enabled, "yes")
        .unwrap();
    assert!(!last(&seen).notification_enabled);
}

#[test]
fn unrelated_key_under_directory_still_broadcasts() {
    let store = MemoryStore::shared();
    let counter = DataCounter::new(connector(store.clone()));
    let (listener, seen) = recorder();
    assert!(counter.register(listener, TrafficProfile::Home));
    let before = last(&seen);
    let delivered = seen.lock().len();

    store.set_string(keys::home().notify_period, "123").unwrap();

    assert_eq!(seen.lock().len(), delivered + 1);
    assert_eq!(last(&seen), before);
}

// ============================================================================
// Save
// ============================================================================

#[test]
fn save_derives_notify_period_from_limit() {
    let store = MemoryStore::shared();
    let counter = DataCounter::new(connector(store.clone()));
    let k = keys::home();

    counter.save(true, Some("500"));
    assert!(store.get_bool(k.notification_enabled).unwrap());
    assert_eq!(
        store.get_string(k.warning_limit).unwrap().as_deref(),
        Some("500")
    );
    assert_eq!(
        store.get_string(k.notify_period).unwrap().as_deref(),
        Some("500000000")
    );

    counter.save(false, Some("500"));
    assert!(!store.get_bool(k.notification_enabled).unwrap());
    assert_eq!(
        store.get_string(k.notify_period).unwrap().as_deref(),
        Some("0")
    );
}

#[test]
fn save_write_failure_does_not_abort_siblings() {
    let k = keys::home();
    let flaky = Arc::new(FlakyStore::default().fail_write(k.warning_limit));
    let counter = DataCounter::new(connector(flaky.clone()));

    counter.save(true, Some("9"));

    // The failed warning-limit write was attempted, and both siblings
    // still went through.
    let attempts = flaky.write_attempts.lock().clone();
    assert_eq!(
        attempts,
        vec![
            k.notification_enabled.to_owned(),
            k.warning_limit.to_owned(),
            k.notify_period.to_owned(),
        ]
    );
    assert!(flaky.inner.get_bool(k.notification_enabled).unwrap());
    assert_eq!(
        flaky.inner.get_string(k.notify_period).unwrap().as_deref(),
        Some("9000000")
    );
}

// ============================================================================
// Reset
// ============================================================================

#[test]
fn reset_then_fresh_register_reads_back_clean_state() {
    let store = MemoryStore::shared();
    let k = keys::home();
    store.set_string(k.rx_bytes, "900").unwrap();
    store.set_string(k.tx_bytes, "800").unwrap();

    let counter = DataCounter::new(connector(store.clone()));
    let (listener, _) = recorder();
    assert!(counter.register(Arc::clone(&listener), TrafficProfile::Home));

    let before = Utc::now().timestamp();
    counter.reset();
    let after = Utc::now().timestamp();

    let (fresh, fresh_seen) = recorder();
    assert!(counter.register(fresh, TrafficProfile::Home));
    let snap = last(&fresh_seen);
    assert_eq!(snap.rx_bytes, 0);
    assert_eq!(snap.tx_bytes, 0);
    let reset_ts = snap.reset_time.unwrap().timestamp();
    assert!(reset_ts >= before && reset_ts <= after);
}

#[test]
fn reset_tears_down_even_with_listeners_registered() {
    let store = MemoryStore::shared();
    let counter = DataCounter::new(connector(store.clone()));
    let (listener, seen) = recorder();
    assert!(counter.register(Arc::clone(&listener), TrafficProfile::Home));
    assert_eq!(store.watch_count(), 1);

    counter.reset();
    assert_eq!(store.watch_count(), 0);

    // Store changes are no longer observed while idle.
    let delivered = seen.lock().len();
    store.set_string(keys::home().rx_bytes, "31337").unwrap();
    assert_eq!(seen.lock().len(), delivered);

    // The surviving listener resumes when the counter is used again.
    let (second, _) = recorder();
    assert!(counter.register(second, TrafficProfile::Home));
    assert_eq!(store.watch_count(), 1);
    assert_eq!(last(&seen).rx_bytes, 31337);
}

#[test]
fn reset_unsets_counters_and_notification_marker() {
    let k = keys::home();
    let flaky = Arc::new(FlakyStore::default().fail_write(k.reset_time));
    flaky.inner.set_string(k.rx_bytes, "12").unwrap();
    flaky.inner.set_string(k.tx_bytes, "34").unwrap();
    flaky
        .inner
        .set_string(k.last_notification, "1700000000")
        .unwrap();

    let counter = DataCounter::new(connector(flaky.clone()));
    counter.reset();

    // The reset-time write failed, but every unset still ran.
    assert_eq!(flaky.inner.get_string(k.rx_bytes).unwrap(), None);
    assert_eq!(flaky.inner.get_string(k.tx_bytes).unwrap(), None);
    assert_eq!(flaky.inner.get_string(k.last_notification).unwrap(), None);
}

// ============================================================================
// Failure Semantics
// ============================================================================

#[test]
fn unreachable_store_fails_registration_softly() {
    let counter = DataCounter::new(Arc::new(DownConnector));
    let (listener, seen) = recorder();
    assert!(!counter.register(listener, TrafficProfile::Home));
    assert!(seen.lock().is_empty());

    // Explicit calls on the dead counter are logged no-ops.
    counter.save(true, Some("500"));
    counter.reset();
}

#[test]
fn read_error_falls_back_to_default_for_that_field() {
    let k = keys::home();
    let flaky = Arc::new(FlakyStore::default().fail_read(k.rx_bytes));
    flaky.inner.set_string(k.tx_bytes, "42").unwrap();

    let counter = DataCounter::new(connector(flaky));
    let (listener, seen) = recorder();
    assert!(counter.register(listener, TrafficProfile::Home));

    let snap = last(&seen);
    assert_eq!(snap.rx_bytes, 0);
    assert_eq!(snap.tx_bytes, 42);
}
