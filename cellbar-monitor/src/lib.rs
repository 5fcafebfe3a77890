// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # cellbar Monitor
//!
//! The callback-registration layer of cellbar.
//!
//! A desktop shell registers listeners here and receives state snapshots
//! whenever something changes underneath:
//!
//! - [`DataCounter`] - persistent data-usage counters backed by the
//!   platform settings store
//! - [`NetworkStatusMonitor`] / [`SimStatusMonitor`] - registration and SIM
//!   state from the telephony middleware
//! - [`Notifier`] - the shared listener registry all of them fan out
//!   through
//!
//! Every monitor follows the same lifecycle: resources are acquired when
//! the first listener registers, each registration immediately receives the
//! current state, and the underlying subscription is released when the last
//! listener unregisters.
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use cellbar_core::TrafficProfile;
//! use cellbar_monitor::{CounterListener, DataCounter};
//! use cellbar_store::{MemoryStore, connector};
//!
//! let store = MemoryStore::shared();
//! let counter = DataCounter::new(connector(store));
//!
//! let listener: CounterListener = Arc::new(|snapshot| {
//!     println!("{} bytes so far", snapshot.total_bytes());
//! });
//! assert!(counter.register(Arc::clone(&listener), TrafficProfile::Home));
//! counter.unregister(&listener);
//! ```

pub mod datacounter;
pub mod netstatus;
pub mod notify;
pub mod simstatus;
pub mod telephony;

pub use datacounter::{CounterListener, DataCounter};
pub use netstatus::{NetworkListener, NetworkStatusMonitor};
pub use notify::{Listener, Notifier};
pub use simstatus::{SimListener, SimStatusMonitor};
pub use telephony::{
    NetworkStateHandler, SimStatusHandler, TelephonyError, TelephonyService, TelephonyWatch,
};
