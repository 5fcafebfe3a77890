//! Data-usage counter snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The counter state delivered to every subscriber on every notification.
///
/// Byte counts are monotonic until the counter is reset. `warning_limit`
/// mirrors the string representation kept by the settings store; consumers
/// that need a number should go through [`warning_limit_bytes`].
///
/// [`warning_limit_bytes`]: CounterSnapshot::warning_limit_bytes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterSnapshot {
    /// Bytes received since the last reset.
    pub rx_bytes: u64,
    /// Bytes transmitted since the last reset.
    pub tx_bytes: u64,
    /// When the counters were last reset, if ever.
    pub reset_time: Option<DateTime<Utc>>,
    /// Whether threshold notifications are enabled.
    pub notification_enabled: bool,
    /// Warning threshold in the store's string representation.
    pub warning_limit: Option<String>,
}

impl CounterSnapshot {
    /// Total traffic since the last reset.
    pub fn total_bytes(&self) -> u64 {
        self.rx_bytes.saturating_add(self.tx_bytes)
    }

    /// Parses the warning limit as a byte count.
    ///
    /// Returns `None` when no limit is set or the stored string does not
    /// start with a decimal number.
    pub fn warning_limit_bytes(&self) -> Option<u64> {
        let s = self.warning_limit.as_deref()?.trim_start();
        let digits: String = s.chars().take_while(char::is_ascii_digit).collect();
        digits.parse().ok()
    }

    /// Returns true when a limit is set and total traffic has reached it.
    pub fn over_warning_limit(&self) -> bool {
        self.warning_limit_bytes()
            .is_some_and(|limit| self.total_bytes() >= limit)
    }
}
