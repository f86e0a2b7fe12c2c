//! Time-related utility functions.
//!
//! Observation times are carried as floating point Unix seconds, which is
//! what both providers report. The orchestrator reads the current time
//! through a [`Clock`] so tests can pin it.

use chrono::{DateTime, NaiveDate, Utc};

/// Source of the current Unix time in seconds.
pub type Clock = fn() -> f64;

/// Current Unix time in seconds with millisecond precision.
pub fn epoch_seconds_now() -> f64 {
    Utc::now().timestamp_millis() as f64 / 1000.0
}

/// UTC calendar date for a Unix timestamp.
///
/// Out-of-range timestamps map to the Unix epoch date.
pub fn utc_date(epoch_seconds: f64) -> NaiveDate {
    DateTime::from_timestamp(epoch_seconds.floor() as i64, 0)
        .unwrap_or_default()
        .date_naive()
}
