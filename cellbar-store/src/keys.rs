//! The data-counter key namespace.
//!
//! All counter state lives under one directory, [`COUNTER_DIR`], with a
//! separate key set per traffic profile. Five keys are read and written by
//! the counter; `notify_period` and `last_notification` are only ever
//! written or unset here and are read by the platform's notification
//! daemon.

use cellbar_core::TrafficProfile;

/// Directory holding every data-counter key.
///
/// Change subscriptions are scoped to this directory.
pub const COUNTER_DIR: &str = "/system/connectivity/gprs";

/// The full key paths for one traffic profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileKeys {
    /// Received byte count, decimal string.
    pub rx_bytes: &'static str,
    /// Transmitted byte count, decimal string.
    pub tx_bytes: &'static str,
    /// Last reset time, decimal string of epoch seconds.
    pub reset_time: &'static str,
    /// Warning threshold, decimal string.
    pub warning_limit: &'static str,
    /// Whether threshold notifications are enabled, boolean.
    pub notification_enabled: &'static str,
    /// Derived notification period, write-only for this subsystem.
    pub notify_period: &'static str,
    /// Marker for the last delivered notification, unset on reset.
    pub last_notification: &'static str,
}

const HOME: ProfileKeys = ProfileKeys {
    rx_bytes: "/system/connectivity/gprs/home_rx_bytes",
    tx_bytes: "/system/connectivity/gprs/home_tx_bytes",
    reset_time: "/system/connectivity/gprs/home_reset_time",
    warning_limit: "/system/connectivity/gprs/home_warning_limit",
    notification_enabled: "/system/connectivity/gprs/home_notification_enabled",
    notify_period: "/system/connectivity/gprs/home_notify_period",
    last_notification: "/system/connectivity/gprs/home_last_notification",
};

const ROAMING: ProfileKeys = ProfileKeys {
    rx_bytes: "/system/connectivity/gprs/roaming_rx_bytes",
    tx_bytes: "/system/connectivity/gprs/roaming_tx_bytes",
    reset_time: "/system/connectivity/gprs/roaming_reset_time",
    warning_limit: "/system/connectivity/gprs/roaming_warning_limit",
    notification_enabled: "/system/connectivity/gprs/roaming_notification_enabled",
    notify_period: "/system/connectivity/gprs/roaming_notify_period",
    last_notification: "/system/connectivity/gprs/roaming_last_notification",
};

/// Returns the key set for the home profile.
pub fn home() -> &'static ProfileKeys {
    &HOME
}

/// Returns the key set for the roaming profile.
pub fn roaming() -> &'static ProfileKeys {
    &ROAMING
}

/// Returns the key set for a traffic profile.
pub fn for_profile(profile: TrafficProfile) -> &'static ProfileKeys {
    match profile {
        TrafficProfile::Home => &HOME,
        TrafficProfile::Roaming => &ROAMING,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_do_not_share_keys() {
        assert_ne!(home().rx_bytes, roaming().rx_bytes);
        assert_ne!(home().notify_period, roaming().notify_period);
    }

    #[test]
    fn test_all_keys_live_under_counter_dir() {
        for keys in [home(), roaming()] {
            for key in [
                keys.rx_bytes,
                keys.tx_bytes,
                keys.reset_time,
                keys.warning_limit,
                keys.notification_enabled,
                keys.notify_period,
                keys.last_notification,
            ] {
                assert!(key.starts_with(COUNTER_DIR));
            }
        }
    }

    #[test]
    fn test_for_profile_selects() {
        assert_eq!(for_profile(TrafficProfile::Home), home());
        assert_eq!(for_profile(TrafficProfile::Roaming), roaming());
    }
}
