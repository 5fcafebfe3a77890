//! The decimal-string wire codec.
//!
//! The settings store keeps counters and timestamps as decimal strings.
//! Values are converted to typed integers immediately on read and only
//! serialized back to strings at the write boundary.

use chrono::{DateTime, TimeZone, Utc};

/// Parses a stored counter string.
///
/// Follows the lenient semantics the rest of the platform relies on:
/// leading whitespace is skipped, the longest run of leading digits is
/// taken, an empty run decodes to 0, and overflow saturates to `u64::MAX`.
pub fn decode_u64(s: &str) -> u64 {
    let digits: &str = {
        let trimmed = s.trim_start();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        &trimmed[..end]
    };

    if digits.is_empty() {
        return 0;
    }

    digits.parse().unwrap_or(u64::MAX)
}

/// Parses an optional stored counter string; absent decodes to 0.
pub fn decode_opt_u64(s: Option<&str>) -> u64 {
    s.map_or(0, decode_u64)
}

/// Serializes a counter for the store.
pub fn encode_u64(value: u64) -> String {
    value.to_string()
}

/// Decodes a stored epoch-seconds value into a timestamp.
///
/// Zero means "never", not the epoch itself.
pub fn decode_epoch(secs: u64) -> Option<DateTime<Utc>> {
    if secs == 0 {
        return None;
    }
    let secs = i64::try_from(secs).ok()?;
    Utc.timestamp_opt(secs, 0).single()
}

/// Serializes a timestamp as epoch seconds for the store.
pub fn encode_epoch(time: DateTime<Utc>) -> String {
    time.timestamp().max(0).to_string()
}
