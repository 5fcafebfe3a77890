//! The settings-store trait surface.
//!
//! The store itself is a platform service; everything here describes how it
//! is consumed. Backends bridge these traits to the real IPC client.

use std::sync::Arc;

use crate::error::StoreError;

// ============================================================================
// Values & Change Events
// ============================================================================

/// A typed value held by the settings store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreValue {
    /// A string value. Counters and timestamps travel as decimal strings.
    String(String),
    /// A boolean value.
    Bool(bool),
}

impl StoreValue {
    /// Returns the string payload, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            StoreValue::String(s) => Some(s),
            StoreValue::Bool(_) => None,
        }
    }

    /// Returns the boolean payload, if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StoreValue::Bool(b) => Some(*b),
            StoreValue::String(_) => None,
        }
    }
}

/// A single key change delivered to a subscription.
///
/// `value` is `None` when the key was unset.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    /// Full path of the key that changed.
    pub key: String,
    /// The new value, or `None` for an unset.
    pub value: Option<StoreValue>,
}

/// Callback invoked for every change under a subscribed directory.
pub type ChangeHandler = Arc<dyn Fn(&ChangeEvent) + Send + Sync>;

/// Opaque token identifying a live change subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchId(pub u64);

// ============================================================================
// Store Traits
// ============================================================================

/// Client handle to the platform settings store.
///
/// Implementations are expected to be cheap local IPC. Every call must be
/// bounded: a backend that can stall must enforce its own deadline and
/// surface expiry as [`StoreError::Timeout`]. Callers treat every error
/// here as non-fatal.
///
/// Change handlers registered through [`subscribe`] are invoked
/// synchronously, one change at a time, and never concurrently with each
/// other for the same subscription.
///
/// [`subscribe`]: SettingsStore::subscribe
pub trait SettingsStore: Send + Sync {
    /// Reads a string key. Absent keys read as `None`.
    fn get_string(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes a string key.
    fn set_string(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Reads a boolean key. Absent keys read as `false`.
    fn get_bool(&self, key: &str) -> Result<bool, StoreError>;

    /// Writes a boolean key.
    fn set_bool(&self, key: &str, value: bool) -> Result<(), StoreError>;

    /// Removes a key. Removing an absent key is not an error.
    fn unset(&self, key: &str) -> Result<(), StoreError>;

    /// Registers interest in a directory so changes under it are tracked.
    fn add_watch_dir(&self, dir: &str) -> Result<(), StoreError>;

    /// Drops interest in a directory added with [`add_watch_dir`].
    ///
    /// [`add_watch_dir`]: SettingsStore::add_watch_dir
    fn remove_watch_dir(&self, dir: &str) -> Result<(), StoreError>;

    /// Subscribes to changes of every key under `dir`.
    fn subscribe(&self, dir: &str, handler: ChangeHandler) -> Result<WatchId, StoreError>;

    /// Cancels a subscription. Unknown ids are ignored.
    fn unsubscribe(&self, id: WatchId);
}

/// The fallible "open the settings store" operation.
///
/// Opening is the one store failure that is not absorbed: a counter that
/// cannot connect stays uninitialized and its caller is told so.
pub trait StoreConnector: Send + Sync {
    /// Opens a store handle.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when the store cannot be
    /// reached.
    fn connect(&self) -> Result<Arc<dyn SettingsStore>, StoreError>;
}

/// Wraps an already-open store handle as a connector that always succeeds.
pub fn connector(store: Arc<dyn SettingsStore>) -> Arc<dyn StoreConnector> {
    Arc::new(SharedConnector(store))
}

struct SharedConnector(Arc<dyn SettingsStore>);

impl StoreConnector for SharedConnector {
    fn connect(&self) -> Result<Arc<dyn SettingsStore>, StoreError> {
        Ok(Arc::clone(&self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_accessors() {
        let s = StoreValue::String("42".into());
        assert_eq!(s.as_str(), Some("42"));
        assert_eq!(s.as_bool(), None);

        let b = StoreValue::Bool(true);
        assert_eq!(b.as_bool(), Some(true));
        assert_eq!(b.as_str(), None);
    }

    #[test]
    fn test_shared_connector_returns_same_store() {
        let store = crate::memory::MemoryStore::shared();
        let connector = connector(store.clone());
        let handle = connector.connect().unwrap();
        handle.set_string("/k", "v").unwrap();
        assert_eq!(store.get_string("/k").unwrap().as_deref(), Some("v"));
    }
}
