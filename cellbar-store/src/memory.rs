//! In-memory settings-store backend.
//!
//! A process-local [`SettingsStore`] used by embedders that have no
//! platform store and by the test suites. It keeps the contract the real
//! backends keep: change handlers run synchronously on the mutating thread,
//! in subscription order, after the store's own lock has been released.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::error::StoreError;
use crate::store::{ChangeEvent, ChangeHandler, SettingsStore, StoreValue, WatchId};

/// Thread-safe in-memory key/value store with change notification.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    values: HashMap<String, StoreValue>,
    watches: Vec<MemoryWatch>,
    watch_dirs: HashMap<String, usize>,
    next_watch: u64,
}

struct MemoryWatch {
    id: WatchId,
    dir: String,
    handler: ChangeHandler,
}

/// Returns true when `key` lives under `dir`.
fn key_in_dir(key: &str, dir: &str) -> bool {
    key.strip_prefix(dir)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store behind an [`Arc`], ready to share.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Number of live change subscriptions.
    pub fn watch_count(&self) -> usize {
        self.inner.lock().watches.len()
    }

    /// Number of directories currently registered for watching.
    pub fn watched_dir_count(&self) -> usize {
        self.inner.lock().watch_dirs.len()
    }

    /// Stores `value` and fans the change out to matching subscriptions.
    fn put(&self, key: &str, value: StoreValue) {
        {
            let mut inner = self.inner.lock();
            inner.values.insert(key.to_owned(), value.clone());
        }
        self.dispatch(key, Some(value));
    }

    /// Invokes matching handlers outside the store lock.
    ///
    /// Handlers may call back into the store, so the lock must be released
    /// before the first handler runs.
    fn dispatch(&self, key: &str, value: Option<StoreValue>) {
        let handlers: Vec<ChangeHandler> = {
            let inner = self.inner.lock();
            inner
                .watches
                .iter()
                .filter(|w| key_in_dir(key, &w.dir))
                .map(|w| Arc::clone(&w.handler))
                .collect()
        };

        if handlers.is_empty() {
            return;
        }

        let event = ChangeEvent {
            key: key.to_owned(),
            value,
        };
        for handler in handlers {
            handler(&event);
        }
    }
}

impl SettingsStore for MemoryStore {
    fn get_string(&self, key: &str) -> Result<Option<String>, StoreError> {
        let inner = self.inner.lock();
        Ok(inner
            .values
            .get(key)
            .and_then(|v| v.as_str().map(str::to_owned)))
    }

    fn set_string(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.put(key, StoreValue::String(value.to_owned()));
        Ok(())
    }

    fn get_bool(&self, key: &str) -> Result<bool, StoreError> {
        let inner = self.inner.lock();
        Ok(inner
            .values
            .get(key)
            .and_then(StoreValue::as_bool)
            .unwrap_or(false))
    }

    fn set_bool(&self, key: &str, value: bool) -> Result<(), StoreError> {
        self.put(key, StoreValue::Bool(value));
        Ok(())
    }

    fn unset(&self, key: &str) -> Result<(), StoreError> {
        let removed = {
            let mut inner = self.inner.lock();
            inner.values.remove(key).is_some()
        };
        if removed {
            self.dispatch(key, None);
        }
        Ok(())
    }

    fn add_watch_dir(&self, dir: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        *inner.watch_dirs.entry(dir.to_owned()).or_insert(0) += 1;
        Ok(())
    }

    fn remove_watch_dir(&self, dir: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        if let Some(count) = inner.watch_dirs.get_mut(dir) {
            *count -= 1;
            if *count == 0 {
                inner.watch_dirs.remove(dir);
            }
        }
        Ok(())
    }

    fn subscribe(&self, dir: &str, handler: ChangeHandler) -> Result<WatchId, StoreError> {
        let mut inner = self.inner.lock();
        let id = WatchId(inner.next_watch);
        inner.next_watch += 1;
        inner.watches.push(MemoryWatch {
            id,
            dir: dir.to_owned(),
            handler,
        });
        debug!(dir = %dir, id = id.0, "Subscription added");
        Ok(id)
    }

    fn unsubscribe(&self, id: WatchId) {
        let mut inner = self.inner.lock();
        inner.watches.retain(|w| w.id != id);
    }
}
