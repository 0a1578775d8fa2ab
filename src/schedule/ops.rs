//! Event CRUD over the persisted document. Every operation reloads the
//! file, transforms fully in memory, and only then backs up and writes; a
//! failed lookup leaves the on-disk document untouched.

use thiserror::Error;
use tracing::info;

use super::model::{AliasMap, DayEntry, Event, Schedule};
use super::normalize::{resolve_overlaps, sort_events};
use super::store::Store;
use super::time;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("no schedule entry for {0}")]
    DayNotFound(String),

    #[error("no event starting at {start} on {day}")]
    EventNotFound { day: String, start: String },

    #[error("invalid time {0:?}, expected H:MM AM/PM")]
    InvalidTime(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Add an event to a day. The day resolves through the alias map first, so
/// adding to Monday lands on the MW template and shows up on Wednesday too.
pub fn add_event(
    store: &Store,
    aliases: &AliasMap,
    day: &str,
    start: &str,
    end: &str,
    label: &str,
) -> Result<()> {
    validate_time(start)?;
    validate_time(end)?;

    let mut schedule = store.load()?;
    let target = aliases.resolve(day);
    let mut events = day_events(&schedule, &target).unwrap_or_default();

    resolve_overlaps(&mut events, start, end);
    events.push(Event::new(start, Some(end), label));
    sort_events(&mut events);

    schedule.insert(target.clone(), DayEntry::Events(events));
    store.backup()?;
    store.save(&schedule)?;
    info!(day = %target, start, end, label, "added event");
    Ok(())
}

/// Replace the event starting at `old_start` with a new interval and label.
pub fn update_event(
    store: &Store,
    aliases: &AliasMap,
    day: &str,
    old_start: &str,
    start: &str,
    end: &str,
    label: &str,
) -> Result<()> {
    validate_time(start)?;
    validate_time(end)?;

    let mut schedule = store.load()?;
    let target = aliases.resolve(day);
    let mut events =
        day_events(&schedule, &target).ok_or_else(|| ScheduleError::DayNotFound(target.clone()))?;

    let idx = find_by_start(&events, old_start).ok_or_else(|| ScheduleError::EventNotFound {
        day: target.clone(),
        start: old_start.to_string(),
    })?;
    let removed = events.remove(idx);

    // One overlap pass for the new interval before the edited event goes
    // back in. Running it again after insertion would classify the event
    // against itself and delete it.
    resolve_overlaps(&mut events, start, end);
    events.push(Event::new(start, Some(end), label));
    sort_events(&mut events);

    schedule.insert(target.clone(), DayEntry::Events(events));
    store.backup()?;
    store.save(&schedule)?;
    info!(day = %target, old = %removed.time_range(), start, end, label, "updated event");
    Ok(())
}

/// Remove the event starting at `start` and close the gap it leaves: the
/// preceding event's end extends to the deleted start, and the following
/// event's start pulls back to it. An open-ended neighbor (a "Bedtime"
/// marker) stays start-only.
pub fn delete_event(store: &Store, aliases: &AliasMap, day: &str, start: &str) -> Result<()> {
    let mut schedule = store.load()?;
    let target = aliases.resolve(day);
    let mut events =
        day_events(&schedule, &target).ok_or_else(|| ScheduleError::DayNotFound(target.clone()))?;

    let idx = find_by_start(&events, start).ok_or_else(|| ScheduleError::EventNotFound {
        day: target.clone(),
        start: start.to_string(),
    })?;
    let removed = events.remove(idx);

    if idx > 0 {
        let prev = &mut events[idx - 1];
        if prev.end.is_some() {
            prev.end = Some(removed.start.clone());
        }
    }
    if let Some(next) = events.get_mut(idx) {
        next.start = removed.start.clone();
    }
    sort_events(&mut events);

    schedule.insert(target.clone(), DayEntry::Events(events));
    store.backup()?;
    store.save(&schedule)?;
    info!(day = %target, event = %removed.time_range(), label = %removed.label, "deleted event");
    Ok(())
}

/// Working copy of a day's events, following a template reference if the
/// key holds one.
fn day_events(schedule: &Schedule, key: &str) -> Option<Vec<Event>> {
    match schedule.get(key)? {
        DayEntry::Events(events) => Some(events.clone()),
        DayEntry::Template(name) => {
            Some(schedule.events_of(name).cloned().unwrap_or_default())
        }
    }
}

/// Events are identified by their exact start-time string.
fn find_by_start(events: &[Event], start: &str) -> Option<usize> {
    events.iter().position(|e| e.start.trim() == start.trim())
}

fn validate_time(s: &str) -> Result<()> {
    if time::validate_clock(s) {
        Ok(())
    } else {
        Err(ScheduleError::InvalidTime(s.to_string()))
    }
}
