//! The telephony middleware boundary.
//!
//! Registration state and SIM status originate in the platform's telephony
//! service. This module defines the trait the monitors consume; backends
//! bridge it to the real IPC bus.

use std::sync::Arc;

use thiserror::Error;

use cellbar_core::{NetworkState, SimStatus};

/// Callback receiving network registration reports.
pub type NetworkStateHandler = Arc<dyn Fn(&NetworkState) + Send + Sync>;

/// Callback receiving SIM status reports.
pub type SimStatusHandler = Arc<dyn Fn(SimStatus) + Send + Sync>;

/// Opaque token identifying a live middleware watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TelephonyWatch(pub u64);

/// Errors reported by a telephony backend.
#[derive(Debug, Error)]
pub enum TelephonyError {
    /// The service cannot be reached.
    #[error("telephony service unavailable: {0}")]
    Unavailable(String),

    /// A watch could not be established.
    #[error("telephony subscription failed: {0}")]
    Subscribe(String),
}

/// Client handle to the telephony middleware.
///
/// Handlers are invoked synchronously, one report at a time. All the state
/// machinery (registration transitions, SIM locking) lives behind this
/// trait; the monitors only relay what it reports.
pub trait TelephonyService: Send + Sync {
    /// Starts delivering network registration reports to `handler`.
    fn watch_network(&self, handler: NetworkStateHandler)
    -> Result<TelephonyWatch, TelephonyError>;

    /// Starts delivering SIM status reports to `handler`.
    fn watch_sim(&self, handler: SimStatusHandler) -> Result<TelephonyWatch, TelephonyError>;

    /// Stops a watch. Unknown tokens are ignored.
    fn unwatch(&self, watch: TelephonyWatch);
}
