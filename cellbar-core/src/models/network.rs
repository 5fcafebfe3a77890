//! Network registration state.
//!
//! Mirrors what the telephony middleware reports about the circuit-switched
//! registration: where the modem is registered, in which cell, and over
//! which radio access technology.

use serde::{Deserialize, Serialize};

// ============================================================================
// Registration Status
// ============================================================================

/// Circuit-switched registration status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    /// Registered to the home network.
    Home,
    /// Registered to a network other than the home network.
    Roaming,
    /// Registered to a non-home system in a non-home area.
    RoamingBlink,
    /// Not in service.
    NoService,
    /// Not in service, currently searching.
    SearchingService,
    /// Not in service and not searching.
    NotSearching,
    /// Not in service due to a missing SIM or subscription.
    NoSim,
    /// Radio powered off.
    PowerOff,
    /// No-service power save state.
    PowerSave,
    /// Power save entered because there is no network coverage.
    NoCoverage,
    /// SIM rejected by the network.
    RejectedByNetwork,
}

impl RegistrationStatus {
    /// Decodes the middleware's raw status byte.
    ///
    /// The raw encoding leaves a gap before the power states: power-off is
    /// reported as 8, not 7.
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Home),
            1 => Some(Self::Roaming),
            2 => Some(Self::RoamingBlink),
            3 => Some(Self::NoService),
            4 => Some(Self::SearchingService),
            5 => Some(Self::NotSearching),
            6 => Some(Self::NoSim),
            8 => Some(Self::PowerOff),
            9 => Some(Self::PowerSave),
            10 => Some(Self::NoCoverage),
            11 => Some(Self::RejectedByNetwork),
            _ => None,
        }
    }

    /// Returns true when the modem is registered to some network.
    pub fn is_registered(&self) -> bool {
        matches!(self, Self::Home | Self::Roaming | Self::RoamingBlink)
    }

    /// Returns true when registered away from the home network.
    pub fn is_roaming(&self) -> bool {
        matches!(self, Self::Roaming | Self::RoamingBlink)
    }
}

// ============================================================================
// Radio Access
// ============================================================================

/// Radio access technology in use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadioAccess {
    /// Technology not reported.
    #[default]
    Unknown,
    /// GSM / GPRS / EDGE.
    Gsm,
    /// UMTS / HSPA.
    Umts,
}

impl RadioAccess {
    /// Decodes the middleware's raw technology byte.
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            1 => Self::Gsm,
            2 => Self::Umts,
            _ => Self::Unknown,
        }
    }
}

// ============================================================================
// Network Identity & State
// ============================================================================

/// Identity of the network the modem is registered to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInfo {
    /// Mobile country code.
    pub country_code: String,
    /// Mobile network code.
    pub operator_code: String,
    /// Operator display name, when one has been resolved.
    pub operator_name: Option<String>,
}

/// A full registration-state report from the telephony middleware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkState {
    /// Current registration status.
    pub registration: RegistrationStatus,
    /// Location area code.
    pub lac: u32,
    /// Serving cell id.
    pub cell_id: u32,
    /// Identity of the serving network, when registered.
    pub network: Option<NetworkInfo>,
    /// Signal strength in bars (0-5).
    pub signal_bars: u8,
    /// Radio access technology in use.
    pub radio: RadioAccess,
}

impl NetworkState {
    /// A state representing a modem with no service at all.
    pub fn no_service() -> Self {
        Self {
            registration: RegistrationStatus::NoService,
            lac: 0,
            cell_id: 0,
            network: None,
            signal_bars: 0,
            radio: RadioAccess::Unknown,
        }
    }
}
