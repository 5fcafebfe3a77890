//! Persistent data-usage counter.
//!
//! Tracks received/transmitted byte counts for one traffic profile, mirrors
//! the settings store underneath, and fans every change out to registered
//! listeners. The store is the source of truth: local operations write
//! through to it, and the in-memory state follows store change events.
//!
//! The counter is a two-state machine. It starts **idle**; the first
//! registration opens the store, loads the persisted fields and subscribes
//! to changes; when the last listener unregisters the subscription and the
//! store handle are released and the counter is idle again.
//!
//! Store failures are never fatal. Failing to *open* the store makes
//! [`register`] return `false`; every other read, write or unset error is
//! logged and absorbed: reads fall back to defaults, failed writes are
//! skipped while their siblings are still attempted, and nothing is rolled
//! back. `save` and `reset` are therefore best-effort sequences, not
//! transactions.
//!
//! [`register`]: DataCounter::register

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{debug, error, warn};

use cellbar_core::{CounterSnapshot, TrafficProfile};
use cellbar_store::{
    COUNTER_DIR, ChangeEvent, ChangeHandler, ProfileKeys, SettingsStore, StoreConnector,
    StoreValue, WatchId, keys, value,
};

use crate::notify::{Listener, Notifier};

/// Listener receiving a [`CounterSnapshot`] on every notification.
pub type CounterListener = Listener<CounterSnapshot>;

// ============================================================================
// State
// ============================================================================

#[derive(Default)]
struct CounterInner {
    active: Option<ActiveCounter>,
    notifiers: Notifier<CounterSnapshot>,
}

struct ActiveCounter {
    store: Arc<dyn SettingsStore>,
    watch: Option<WatchId>,
    profile: TrafficProfile,
    rx_bytes: u64,
    tx_bytes: u64,
    reset_time: Option<DateTime<Utc>>,
    warning_limit: Option<String>,
    notification_enabled: bool,
}

impl ActiveCounter {
    fn keys(&self) -> &'static ProfileKeys {
        keys::for_profile(self.profile)
    }

    fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            rx_bytes: self.rx_bytes,
            tx_bytes: self.tx_bytes,
            reset_time: self.reset_time,
            notification_enabled: self.notification_enabled,
            warning_limit: self.warning_limit.clone(),
        }
    }
}

// ============================================================================
// Data Counter
// ============================================================================

/// Data-usage counter for one traffic profile.
///
/// One instance tracks one profile at a time; the profile is fixed by
/// whichever call activates the counter. Hosts that need home and roaming
/// tracking simultaneously hold two instances.
pub struct DataCounter {
    connector: Arc<dyn StoreConnector>,
    inner: Arc<Mutex<CounterInner>>,
}

impl DataCounter {
    /// Creates an idle counter. No store access happens until the first
    /// registration (or a `save`/`reset` call).
    pub fn new(connector: Arc<dyn StoreConnector>) -> Self {
        Self {
            connector,
            inner: Arc::new(Mutex::new(CounterInner::default())),
        }
    }

    /// Registers a listener for counter updates.
    ///
    /// Activates the counter for `profile` if it is idle; if it is already
    /// active the requested profile is ignored and the existing one keeps
    /// tracking. On success every registered listener, including the new
    /// one, immediately receives the current snapshot.
    ///
    /// Returns `false` when the settings store cannot be opened; the
    /// listener is not retained in that case.
    pub fn register(&self, listener: CounterListener, profile: TrafficProfile) -> bool {
        let (listeners, snap) = {
            let mut inner = self.inner.lock();
            if !self.ensure_active(&mut inner, profile) {
                return false;
            }
            inner.notifiers.add(listener);
            let Some(active) = inner.active.as_ref() else {
                return false;
            };
            (inner.notifiers.snapshot(), active.snapshot())
        };

        for listener in &listeners {
            listener(&snap);
        }
        true
    }

    /// Removes a listener.
    ///
    /// When the last listener goes away the store subscription is released
    /// and the counter returns to idle. Removing an unknown listener only
    /// triggers that emptiness check.
    pub fn unregister(&self, listener: &CounterListener) {
        let mut inner = self.inner.lock();
        inner.notifiers.remove(listener);
        if inner.notifiers.is_empty() {
            Self::teardown(&mut inner);
        }
    }

    /// Persists the notification flag and, when given, the warning limit.
    ///
    /// With a limit, a derived notify-period value is written as well: the
    /// limit string with a literal `"000000"` suffix while notifications
    /// are enabled, the string `"0"` otherwise. Each write may fail
    /// independently; failures are logged and the remaining writes still
    /// run.
    ///
    /// Activates an idle counter for the home profile first.
    pub fn save(&self, notification_enabled: bool, warning_limit: Option<&str>) {
        let Some((store, k)) = self.active_handle() else {
            return;
        };

        if let Err(e) = store.set_bool(k.notification_enabled, notification_enabled) {
            error!(key = k.notification_enabled, error = %e, "Unable to save notification flag");
        }

        let Some(limit) = warning_limit else { return };

        if let Err(e) = store.set_string(k.warning_limit, limit) {
            error!(key = k.warning_limit, error = %e, "Unable to save warning limit");
        }

        let period = if notification_enabled {
            // Kept verbatim from the platform's stored format; the unit of
            // the suffix has never been documented.
            format!("{limit}000000")
        } else {
            "0".to_owned()
        };
        if let Err(e) = store.set_string(k.notify_period, &period) {
            error!(key = k.notify_period, error = %e, "Unable to save notify period");
        }
    }

    /// Resets the counters.
    ///
    /// Writes the current time as the new reset time, unsets the rx/tx
    /// counts and the last-notification marker, then unconditionally drops
    /// the active state - even while listeners remain registered - so the
    /// next use reloads everything from the store. Listeners stay
    /// registered across the teardown.
    ///
    /// Activates an idle counter for the home profile first.
    pub fn reset(&self) {
        let Some((store, k)) = self.active_handle() else {
            return;
        };

        let now = Utc::now();
        if let Err(e) = store.set_string(k.reset_time, &value::encode_epoch(now)) {
            error!(key = k.reset_time, error = %e, "Unable to save reset time");
        }

        for key in [k.rx_bytes, k.tx_bytes, k.last_notification] {
            if let Err(e) = store.unset(key) {
                error!(key, error = %e, "Unable to clear counter key");
            }
        }

        let mut inner = self.inner.lock();
        Self::teardown(&mut inner);
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Ensures the counter is active, returning the store handle and key
    /// set to operate on. Idle counters are activated for the home profile.
    fn active_handle(&self) -> Option<(Arc<dyn SettingsStore>, &'static ProfileKeys)> {
        let mut inner = self.inner.lock();
        if !self.ensure_active(&mut inner, TrafficProfile::Home) {
            return None;
        }
        inner
            .active
            .as_ref()
            .map(|active| (Arc::clone(&active.store), active.keys()))
    }

    /// Idle -> Active transition. Returns false only when the store cannot
    /// be opened; subscription and read failures are logged and tolerated.
    fn ensure_active(&self, inner: &mut CounterInner, profile: TrafficProfile) -> bool {
        if inner.active.is_some() {
            return true;
        }

        let store = match self.connector.connect() {
            Ok(store) => store,
            Err(e) => {
                error!(error = %e, "Unable to open settings store");
                return false;
            }
        };

        let weak = Arc::downgrade(&self.inner);
        let handler: ChangeHandler = Arc::new(move |event| {
            if let Some(inner) = weak.upgrade() {
                on_store_change(&inner, event);
            }
        });

        let watch = match store.subscribe(COUNTER_DIR, handler) {
            Ok(id) => Some(id),
            Err(e) => {
                error!(error = %e, "Unable to subscribe to counter changes");
                None
            }
        };
        if let Err(e) = store.add_watch_dir(COUNTER_DIR) {
            error!(error = %e, "Unable to watch counter directory");
        }

        let k = keys::for_profile(profile);
        let rx_bytes = read_counter(store.as_ref(), k.rx_bytes);
        let tx_bytes = read_counter(store.as_ref(), k.tx_bytes);
        let reset_time = value::decode_epoch(read_counter(store.as_ref(), k.reset_time));
        let warning_limit = read_string(store.as_ref(), k.warning_limit);
        let notification_enabled = read_bool(store.as_ref(), k.notification_enabled);

        inner.active = Some(ActiveCounter {
            store,
            watch,
            profile,
            rx_bytes,
            tx_bytes,
            reset_time,
            warning_limit,
            notification_enabled,
        });
        debug!(profile = %profile, "Data counter active");
        true
    }

    /// Active -> Idle transition. The listener registry is left alone.
    fn teardown(inner: &mut CounterInner) {
        let Some(active) = inner.active.take() else {
            return;
        };
        if let Err(e) = active.store.remove_watch_dir(COUNTER_DIR) {
            warn!(error = %e, "Unable to remove counter directory watch");
        }
        if let Some(watch) = active.watch {
            active.store.unsubscribe(watch);
        }
        debug!("Data counter idle");
    }
}

// ============================================================================
// Store Change Dispatch
// ============================================================================

/// Applies one store change to the in-memory state and re-broadcasts the
/// full snapshot. Each event updates at most one field; unrelated keys
/// under the counter directory still trigger a broadcast.
fn on_store_change(inner: &Arc<Mutex<CounterInner>>, event: &ChangeEvent) {
    let (listeners, snap) = {
        let mut guard = inner.lock();
        let Some(active) = guard.active.as_mut() else {
            return;
        };

        // Counters travel as decimal strings; anything else reads as 0.
        let numeric = match &event.value {
            Some(StoreValue::String(s)) => value::decode_u64(s),
            _ => 0,
        };

        let k = active.keys();
        if event.key == k.rx_bytes {
            active.rx_bytes = numeric;
        } else if event.key == k.tx_bytes {
            active.tx_bytes = numeric;
        } else if event.key == k.reset_time {
            active.reset_time = value::decode_epoch(numeric);
        } else if event.key == k.warning_limit {
            active.warning_limit = Some(value::encode_u64(numeric));
        } else if event.key == k.notification_enabled {
            active.notification_enabled = event
                .value
                .as_ref()
                .and_then(StoreValue::as_bool)
                .unwrap_or(false);
        }

        let snap = active.snapshot();
        (guard.notifiers.snapshot(), snap)
    };

    for listener in &listeners {
        listener(&snap);
    }
}

// ============================================================================
// Field Loading
// ============================================================================

fn read_counter(store: &dyn SettingsStore, key: &str) -> u64 {
    match store.get_string(key) {
        Ok(s) => value::decode_opt_u64(s.as_deref()),
        Err(e) => {
            error!(key, error = %e, "Unable to read counter value");
            0
        }
    }
}

fn read_string(store: &dyn SettingsStore, key: &str) -> Option<String> {
    match store.get_string(key) {
        Ok(s) => s,
        Err(e) => {
            error!(key, error = %e, "Unable to read counter value");
            None
        }
    }
}

fn read_bool(store: &dyn SettingsStore, key: &str) -> bool {
    match store.get_bool(key) {
        Ok(b) => b,
        Err(e) => {
            error!(key, error = %e, "Unable to read counter flag");
            false
        }
    }
}
