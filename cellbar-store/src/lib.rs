// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # cellbar Store
//!
//! The settings-store client boundary for cellbar.
//!
//! The platform's hierarchical key/value store is an external service; this
//! crate only defines how the rest of the workspace talks to it:
//!
//! - [`SettingsStore`] / [`StoreConnector`] - the consumed trait surface
//! - [`ChangeEvent`] / [`ChangeHandler`] / [`WatchId`] - change notification
//! - [`keys`] - the data-counter key namespace
//! - [`value`] - the decimal-string wire codec
//! - [`MemoryStore`] - an in-memory backend for embedders and tests
//!
//! ## Usage
//!
//! ```
//! use cellbar_store::{MemoryStore, SettingsStore, keys};
//!
//! let store = MemoryStore::shared();
//! store.set_string(keys::home().rx_bytes, "1024").unwrap();
//! assert_eq!(
//!     store.get_string(keys::home().rx_bytes).unwrap().as_deref(),
//!     Some("1024")
//! );
//! ```

pub mod error;
pub mod keys;
pub mod memory;
pub mod store;
pub mod value;

pub use error::StoreError;
pub use keys::{COUNTER_DIR, ProfileKeys};
pub use memory::MemoryStore;
pub use store::{
    ChangeEvent, ChangeHandler, SettingsStore, StoreConnector, StoreValue, WatchId, connector,
};
