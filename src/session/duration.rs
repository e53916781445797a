//! Elapsed-time strings for the "Connected for" column

use std::time::{SystemTime, UNIX_EPOCH};

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

/// Formats the time between `timestamp` and `now` (both epoch seconds).
///
/// Only non-zero days, hours and minutes are emitted; seconds always are:
/// `"1 days 1 hrs 1 mins 5 secs"`, `"0 secs"`. A timestamp in the future
/// gives the magnitude of the difference with no sign.
pub fn format_since(timestamp: i64, now: i64) -> String {
    let mut remaining = now.abs_diff(timestamp);

    let days = remaining / DAY;
    remaining %= DAY;
    let hours = remaining / HOUR;
    remaining %= HOUR;
    let minutes = remaining / MINUTE;
    let seconds = remaining % MINUTE;

    let mut parts = Vec::with_capacity(4);
    if days > 0 {
        parts.push(format!("{days} days"));
    }
    if hours > 0 {
        parts.push(format!("{hours} hrs"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes} mins"));
    }
    parts.push(format!("{seconds} secs"));
    parts.join(" ")
}

pub fn now_epoch() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}
