//! Schedule normalization: alias expansion, chronological sort with the
//! 5 AM day boundary, duration derivation, and overlap resolution.

use std::cmp::Ordering;

use indexmap::IndexMap;
use tracing::{debug, warn};

use super::model::{next_day, AliasMap, DayEntry, Event, Schedule};
use super::time;

/// Expand alias template references into real, deep-copied event lists.
/// Alias keys themselves are excluded from the result; they are templates,
/// not schedulable days. A reference to a missing template expands to an
/// empty day.
pub fn expand(schedule: &Schedule, aliases: &AliasMap) -> Schedule {
    let mut expanded = Schedule::default();

    for (key, entry) in &schedule.days {
        if aliases.is_alias(key) {
            continue;
        }
        let events = match entry {
            DayEntry::Events(events) => events.clone(),
            DayEntry::Template(name) => match schedule.events_of(name) {
                Some(template) => template.clone(),
                None => {
                    warn!(day = %key, template = %name, "alias template missing, expanding to empty day");
                    Vec::new()
                }
            },
        };
        expanded.insert(key.clone(), DayEntry::Events(events));
    }

    expanded
}

/// Sort a day's events chronologically, treating 5:00 AM as the day start.
/// Malformed start times sort last; duplicate starts are fine.
pub fn sort_events(events: &mut [Event]) {
    events.sort_by_key(|event| time::sort_key(&event.start).unwrap_or(i64::MAX));
}

/// Sort every concrete day in the schedule.
pub fn sort_schedule(schedule: &mut Schedule) {
    for entry in schedule.days.values_mut() {
        if let DayEntry::Events(events) = entry {
            sort_events(events);
        }
    }
}

/// Adjust existing events so that none overlaps the interval
/// `[new_start, new_end)` about to be inserted. Classifies each event in
/// list order:
///
/// 1. fully inside the new interval -> removed
/// 2. new interval starts inside it -> its end shortened to `new_start`
/// 3. new interval ends inside it   -> its start pushed to `new_end`
/// 4. it starts at or after `new_end` -> its start set to `new_end`, end
///    kept, and the scan stops (only the immediately-following event moves)
///
/// Open-ended events and events with unparseable times are skipped. Returns
/// whether anything changed. Running the pass twice with the same interval
/// settles: case 4 rewrites an already-equal start and the other cases find
/// nothing left to adjust.
///
/// All comparisons happen on the logical-day axis (the same 5 AM shift the
/// sort uses), so an 8 PM event is before, not after, a 12:30 AM one. An
/// end at or before its start wraps past midnight.
pub fn resolve_overlaps(events: &mut Vec<Event>, new_start: &str, new_end: &str) -> bool {
    let (Some(start), Some(end)) = (time::sort_key(new_start), time::sort_key(new_end)) else {
        warn!(new_start, new_end, "unparseable interval, skipping overlap resolution");
        return false;
    };
    let end = if end <= start { end + 24 * 60 } else { end };

    let mut modified = false;
    let mut i = 0;
    while i < events.len() {
        let Some(entry_end_str) = events[i].end.clone() else {
            // Single-time markers like "Bedtime" are left alone.
            i += 1;
            continue;
        };
        let (Some(entry_start), Some(entry_end)) = (
            time::sort_key(&events[i].start),
            time::sort_key(&entry_end_str),
        ) else {
            i += 1;
            continue;
        };
        let entry_end = if entry_end <= entry_start {
            entry_end + 24 * 60
        } else {
            entry_end
        };

        if start <= entry_start && end >= entry_end {
            debug!(label = %events[i].label, "removing event fully covered by new interval");
            events.remove(i);
            modified = true;
            continue;
        } else if entry_start < start && start < entry_end {
            debug!(label = %events[i].label, end = new_start, "shortening event to end at new start");
            events[i].end = Some(new_start.trim().to_string());
            modified = true;
        } else if entry_start < end && end < entry_end {
            debug!(label = %events[i].label, start = new_end, "pushing event start to new end");
            events[i].start = new_end.trim().to_string();
            modified = true;
        } else if entry_start >= end {
            debug!(label = %events[i].label, start = new_end, "snapping following event to new end");
            events[i].start = new_end.trim().to_string();
            modified = true;
            break;
        }

        i += 1;
    }

    modified
}

/// Duration of an event in hours. An open-ended event borrows the next
/// day's first start time as its end; with no next-day event it counts as
/// a full day.
pub fn duration_with_fallback(expanded: &Schedule, day: &str, event: &Event) -> f64 {
    if event.end.is_some() {
        return time::duration_hours(&event.start, event.end.as_deref());
    }
    match next_day_first_start(expanded, day) {
        Some(next_start) => time::duration_hours(&event.start, Some(&next_start)),
        None => time::TOTAL_HOURS,
    }
}

/// First event start of the weekday after `day`, if any.
pub fn next_day_first_start(expanded: &Schedule, day: &str) -> Option<String> {
    let next = next_day(day)?;
    let first = expanded.events_of(next)?.first()?;
    Some(first.start.clone())
}

/// Hours allocated on one day, using the open-ended fallback.
pub fn allocated_hours(expanded: &Schedule, day: &str) -> f64 {
    expanded
        .events_of(day)
        .map(|events| {
            events
                .iter()
                .map(|event| duration_with_fallback(expanded, day, event))
                .sum()
        })
        .unwrap_or(0.0)
}

/// Total hours per activity label across the whole week, descending.
pub fn weekly_summary(expanded: &Schedule) -> Vec<(String, f64)> {
    let mut totals: IndexMap<String, f64> = IndexMap::new();
    for (day, events) in expanded.event_days() {
        for event in events {
            *totals.entry(event.label.clone()).or_insert(0.0) +=
                duration_with_fallback(expanded, day, event);
        }
    }

    let mut summary: Vec<(String, f64)> = totals.into_iter().collect();
    summary.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    summary
}
