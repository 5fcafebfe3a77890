//! SIM status monitor.
//!
//! Same shape as the network monitor: lazily watches the telephony
//! middleware, caches the last report, fans changes out to listeners.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::error;

use cellbar_core::SimStatus;

use crate::notify::{Listener, Notifier};
use crate::telephony::{SimStatusHandler, TelephonyService, TelephonyWatch};

/// Listener receiving a [`SimStatus`] on every report.
pub type SimListener = Listener<SimStatus>;

#[derive(Default)]
struct SimInner {
    watch: Option<TelephonyWatch>,
    last: Option<SimStatus>,
    notifiers: Notifier<SimStatus>,
}

/// Fan-out of SIM card status.
pub struct SimStatusMonitor {
    service: Arc<dyn TelephonyService>,
    inner: Arc<Mutex<SimInner>>,
}

impl SimStatusMonitor {
    /// Creates a monitor over a telephony service. No watch is taken yet.
    pub fn new(service: Arc<dyn TelephonyService>) -> Self {
        Self {
            service,
            inner: Arc::new(Mutex::new(SimInner::default())),
        }
    }

    /// Registers a listener for SIM status reports.
    ///
    /// When a report has already been received, every listener immediately
    /// gets the cached status. Returns `false` when the middleware watch
    /// cannot be established; the listener is not retained in that case.
    pub fn register(&self, listener: SimListener) -> bool {
        let (listeners, status) = {
            let mut inner = self.inner.lock();
            if inner.watch.is_none() {
                let weak = Arc::downgrade(&self.inner);
                let handler: SimStatusHandler = Arc::new(move |status| {
                    if let Some(inner) = weak.upgrade() {
                        deliver(&inner, status);
                    }
                });
                match self.service.watch_sim(handler) {
                    Ok(watch) => inner.watch = Some(watch),
                    Err(e) => {
                        error!(error = %e, "Unable to watch SIM status");
                        return false;
                    }
                }
            }
            inner.notifiers.add(listener);

            let Some(status) = inner.last else {
                return true;
            };
            (inner.notifiers.snapshot(), status)
        };

        for listener in &listeners {
            listener(&status);
        }
        true
    }

    /// Removes a listener, releasing the middleware watch and the cached
    /// status when it was the last one.
    pub fn unregister(&self, listener: &SimListener) {
        let mut inner = self.inner.lock();
        inner.notifiers.remove(listener);
        if inner.notifiers.is_empty() {
            if let Some(watch) = inner.watch.take() {
                self.service.unwatch(watch);
            }
            inner.last = None;
        }
    }

    /// The most recent SIM status, if any report has arrived.
    pub fn last_status(&self) -> Option<SimStatus> {
        self.inner.lock().last
    }
}

fn deliver(inner: &Arc<Mutex<SimInner>>, status: SimStatus) {
    let listeners = {
        let mut guard = inner.lock();
        if guard.watch.is_none() {
            return;
        }
        guard.last = Some(status);
        guard.notifiers.snapshot()
    };

    for listener in &listeners {
        listener(&status);
    }
}
