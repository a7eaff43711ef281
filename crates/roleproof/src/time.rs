//! Time utilities for RoleProof.
//!
//! All timestamps are Unix epoch milliseconds (u64), matching the
//! integer encoding used inside signed claims.

/// One hour in milliseconds.
pub const HOUR_MS: u64 = 60 * 60 * 1000;

/// One day in milliseconds.
pub const DAY_MS: u64 = 24 * HOUR_MS;

/// Return the current time as milliseconds since Unix epoch.
pub fn now_millis() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}

/// Convert milliseconds to an RFC 3339 string.
pub fn millis_to_rfc3339(millis: u64) -> String {
    let dt = chrono::DateTime::from_timestamp_millis(millis as i64)
        .unwrap_or(chrono::DateTime::UNIX_EPOCH);
    dt.to_rfc3339()
}
