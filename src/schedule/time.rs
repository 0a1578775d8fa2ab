//! Parse/format boundary for the 12-hour wall-clock strings stored on disk.
//!
//! Every place that reads or writes an `"H:MM AM/PM"` string goes through
//! here; the format string does not appear anywhere else.

use chrono::{NaiveTime, Timelike};
use tracing::warn;

const CLOCK_FORMAT: &str = "%I:%M %p";

/// Events starting before this hour belong to the end of the logical day.
pub const DAY_ROLLOVER_HOUR: u32 = 5;

/// Fallback duration for an open-ended event with no next-day anchor.
pub const TOTAL_HOURS: f64 = 24.0;

pub fn parse_clock(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), CLOCK_FORMAT).ok()
}

pub fn format_clock(t: NaiveTime) -> String {
    t.format("%-I:%M %p").to_string()
}

pub fn validate_clock(s: &str) -> bool {
    parse_clock(s).is_some()
}

/// Split a stored time-range string into start and optional end.
/// `"9:00 AM - 10:00 AM"` -> `("9:00 AM", Some("10:00 AM"))`;
/// `"11:30 PM"` -> `("11:30 PM", None)`. A blank end becomes `None`.
pub fn split_range(range: &str) -> (String, Option<String>) {
    match range.split_once('-') {
        Some((start, end)) => {
            let end = end.trim();
            let end = if end.is_empty() {
                None
            } else {
                Some(end.to_string())
            };
            (start.trim().to_string(), end)
        }
        None => (range.trim().to_string(), None),
    }
}

/// Sort key for the chronological order with the 5 AM day boundary:
/// minutes since midnight, plus a day for starts in [12:00 AM, 5:00 AM).
/// `None` for a malformed start time.
pub fn sort_key(start: &str) -> Option<i64> {
    let t = parse_clock(start)?;
    let mut minutes = i64::from(t.hour()) * 60 + i64::from(t.minute());
    if t.hour() < DAY_ROLLOVER_HOUR {
        minutes += 24 * 60;
    }
    Some(minutes)
}

/// Hours between start and end, rounded to 2 decimals. An end at or before
/// the start is taken to cross midnight. A missing, blank, or malformed
/// time degrades to 0.0 rather than surfacing an error.
pub fn duration_hours(start: &str, end: Option<&str>) -> f64 {
    let Some(end) = end.map(str::trim).filter(|e| !e.is_empty()) else {
        return 0.0;
    };
    let (Some(start_t), Some(end_t)) = (parse_clock(start), parse_clock(end)) else {
        warn!(start, end, "malformed time range, using zero duration");
        return 0.0;
    };

    let mut minutes = end_t.signed_duration_since(start_t).num_minutes();
    if minutes <= 0 {
        minutes += 24 * 60;
    }
    round2(minutes as f64 / 60.0)
}

fn round2(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}
