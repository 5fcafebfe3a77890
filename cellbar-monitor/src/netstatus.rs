//! Network registration monitor.
//!
//! Relays registration-state reports from the telephony middleware to
//! registered listeners, caching the most recent report so a new listener
//! gets current state immediately instead of waiting for the next change.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::error;

use cellbar_core::NetworkState;

use crate::notify::{Listener, Notifier};
use crate::telephony::{NetworkStateHandler, TelephonyService, TelephonyWatch};

/// Listener receiving a [`NetworkState`] on every report.
pub type NetworkListener = Listener<NetworkState>;

#[derive(Default)]
struct NetworkInner {
    watch: Option<TelephonyWatch>,
    last: Option<NetworkState>,
    notifiers: Notifier<NetworkState>,
}

/// Fan-out of network registration state.
///
/// The middleware watch is established when the first listener registers
/// and released when the last one unregisters.
pub struct NetworkStatusMonitor {
    service: Arc<dyn TelephonyService>,
    inner: Arc<Mutex<NetworkInner>>,
}

impl NetworkStatusMonitor {
    /// Creates a monitor over a telephony service. No watch is taken yet.
    pub fn new(service: Arc<dyn TelephonyService>) -> Self {
        Self {
            service,
            inner: Arc::new(Mutex::new(NetworkInner::default())),
        }
    }

    /// Registers a listener for registration-state reports.
    ///
    /// When a report has already been received, every listener immediately
    /// gets the cached state. Returns `false` when the middleware watch
    /// cannot be established; the listener is not retained in that case.
    pub fn register(&self, listener: NetworkListener) -> bool {
        let (listeners, state) = {
            let mut inner = self.inner.lock();
            if inner.watch.is_none() {
                let weak = Arc::downgrade(&self.inner);
                let handler: NetworkStateHandler = Arc::new(move |state| {
                    if let Some(inner) = weak.upgrade() {
                        deliver(&inner, state);
                    }
                });
                match self.service.watch_network(handler) {
                    Ok(watch) => inner.watch = Some(watch),
                    Err(e) => {
                        error!(error = %e, "Unable to watch network state");
                        return false;
                    }
                }
            }
            inner.notifiers.add(listener);

            let Some(state) = inner.last.clone() else {
                return true;
            };
            (inner.notifiers.snapshot(), state)
        };

        for listener in &listeners {
            listener(&state);
        }
        true
    }

    /// Removes a listener, releasing the middleware watch and the cached
    /// state when it was the last one.
    pub fn unregister(&self, listener: &NetworkListener) {
        let mut inner = self.inner.lock();
        inner.notifiers.remove(listener);
        if inner.notifiers.is_empty() {
            if let Some(watch) = inner.watch.take() {
                self.service.unwatch(watch);
            }
            inner.last = None;
        }
    }

    /// The most recent registration state, if any report has arrived.
    pub fn last_state(&self) -> Option<NetworkState> {
        self.inner.lock().last.clone()
    }
}

fn deliver(inner: &Arc<Mutex<NetworkInner>>, state: &NetworkState) {
    let listeners = {
        let mut guard = inner.lock();
        if guard.watch.is_none() {
            return;
        }
        guard.last = Some(state.clone());
        guard.notifiers.snapshot()
    };

    for listener in &listeners {
        listener(state);
    }
}
