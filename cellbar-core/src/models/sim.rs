//! SIM card status.

use serde::{Deserialize, Serialize};

/// SIM card state as reported by the telephony middleware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimStatus {
    /// State not yet reported.
    #[default]
    Unknown,
    /// SIM present and usable.
    Ready,
    /// No SIM card inserted.
    NotInserted,
    /// SIM locked, waiting for a PIN or PUK.
    Locked,
    /// SIM rejected by the network or permanently blocked.
    Rejected,
}

impl SimStatus {
    /// Returns true when the SIM can be used for service.
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usable() {
        assert!(SimStatus::Ready.is_usable());
        assert!(!SimStatus::Locked.is_usable());
        assert!(!SimStatus::Unknown.is_usable());
    }

    #[test]
    fn test_default() {
        assert_eq!(SimStatus::default(), SimStatus::Unknown);
    }
}
