//! Traffic profile selection.

use serde::{Deserialize, Serialize};

/// Which tracking context a data-usage counter follows.
///
/// Home and roaming traffic are persisted under separate key sets, so a
/// counter instance tracks exactly one profile. Tracking both at the same
/// time requires two instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrafficProfile {
    /// Traffic on the home network.
    Home,
    /// Traffic while roaming.
    Roaming,
}

impl TrafficProfile {
    /// Returns the display name for this profile.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Roaming => "Roaming",
        }
    }

    /// Returns true for the home profile.
    pub fn is_home(&self) -> bool {
        matches!(self, Self::Home)
    }

    /// Returns both profiles.
    pub fn all() -> &'static [TrafficProfile] {
        &[Self::Home, Self::Roaming]
    }
}

impl std::fmt::Display for TrafficProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
