//! Domain models for cellbar.
//!
//! This module contains the data structures exchanged between the settings
//! store boundary, the monitor layer, and the host shell.
//!
//! ## Submodules
//!
//! - [`profile`] - Traffic profile selection (home vs. roaming)
//! - [`counter`] - Data-usage counter snapshot
//! - [`network`] - Network registration state
//! - [`sim`] - SIM card status

mod counter;
mod network;
mod profile;
mod sim;

// Re-export everything at the models level
pub use counter::CounterSnapshot;
pub use network::{NetworkInfo, NetworkState, RadioAccess, RegistrationStatus};
pub use profile::TrafficProfile;
pub use sim::SimStatus;
