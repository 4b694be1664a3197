//! One-minute bar boundaries.

use chrono::{DateTime, Utc};

/// Length of a bar in milliseconds.
pub const BAR_MILLIS: i64 = 60_000;

/// Earliest minute start representable in epoch milliseconds.
pub const MIN_MINUTE_START: i64 = i64::MIN / BAR_MILLIS * BAR_MILLIS;

/// Floors epoch milliseconds to the start of their UTC minute.
///
/// Seconds and sub-second components are truncated. Timestamps before the
/// epoch floor towards negative infinity, so `-1` maps to `-60_000`.
/// Timestamps in the first partial minute above `i64::MIN` clamp to
/// [`MIN_MINUTE_START`].
#[must_use]
pub const fn floor_to_minute(timestamp_ms: i64) -> i64 {
    match timestamp_ms.checked_sub(timestamp_ms.rem_euclid(BAR_MILLIS)) {
        Some(start) => start,
        None => MIN_MINUTE_START,
    }
}

/// Returns true if `timestamp_ms` lies exactly on a minute boundary.
#[must_use]
pub const fn is_minute_aligned(timestamp_ms: i64) -> bool {
    timestamp_ms.rem_euclid(BAR_MILLIS) == 0
}

/// Returns the start of the minute following the one containing `timestamp_ms`.
#[must_use]
pub const fn next_minute(timestamp_ms: i64) -> i64 {
    floor_to_minute(timestamp_ms).saturating_add(BAR_MILLIS)
}

/// Converts a minute start in epoch milliseconds to a UTC datetime.
#[must_use]
pub fn minute_start_time(start_ms: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(start_ms)
}
