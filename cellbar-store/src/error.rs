//! Store error types.

use thiserror::Error;

/// Errors reported by a settings-store backend.
///
/// None of these are fatal to the monitor layer: every one of them is
/// absorbed at the API boundary (logged, value defaulted, write skipped).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be opened at all.
    #[error("settings store unavailable: {0}")]
    Unavailable(String),

    /// A single key could not be read.
    #[error("read failed for {key}: {reason}")]
    Read {
        /// The key that failed.
        key: String,
        /// Backend-specific failure description.
        reason: String,
    },

    /// A single key could not be written or unset.
    #[error("write failed for {key}: {reason}")]
    Write {
        /// The key that failed.
        key: String,
        /// Backend-specific failure description.
        reason: String,
    },

    /// A change subscription could not be established.
    #[error("subscription failed: {0}")]
    Subscribe(String),

    /// A store call exceeded the backend's bounded deadline.
    #[error("store operation timed out")]
    Timeout,
}

impl StoreError {
    /// Returns true if this error might succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            StoreError::Read { .. } | StoreError::Write { .. } | StoreError::Timeout
        )
    }
}
