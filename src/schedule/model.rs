use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::time;

/// Canonical weekday order, used for next-day lookups.
pub const DAYS_OF_WEEK: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// The weekday following `day`, cycling Sunday back to Monday.
pub fn next_day(day: &str) -> Option<&'static str> {
    let idx = DAYS_OF_WEEK.iter().position(|d| *d == day)?;
    Some(DAYS_OF_WEEK[(idx + 1) % DAYS_OF_WEEK.len()])
}

/// A single schedule entry. Stored on disk as a 2-element array:
/// `["9:00 AM - 10:00 AM", "Gym"]`. An open-ended marker like "Bedtime"
/// carries only a start time: `["11:30 PM", "Bedtime"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawEvent", into = "RawEvent")]
pub struct Event {
    pub start: String,
    pub end: Option<String>,
    pub label: String,
}

impl Event {
    pub fn new(start: &str, end: Option<&str>, label: &str) -> Self {
        Self {
            start: start.trim().to_string(),
            end: end.map(str::trim).filter(|e| !e.is_empty()).map(String::from),
            label: label.trim().to_string(),
        }
    }

    /// The on-disk time-range string, e.g. `"9:00 AM - 10:00 AM"`.
    pub fn time_range(&self) -> String {
        match &self.end {
            Some(end) => format!("{} - {}", self.start, end),
            None => self.start.clone(),
        }
    }
}

/// Wire form of an event: `[time_range, label]`.
#[derive(Serialize, Deserialize)]
struct RawEvent(String, String);

impl From<RawEvent> for Event {
    fn from(raw: RawEvent) -> Self {
        let (start, end) = time::split_range(&raw.0);
        Self {
            start,
            end,
            label: raw.1,
        }
    }
}

impl From<Event> for RawEvent {
    fn from(event: Event) -> Self {
        let range = event.time_range();
        Self(range, event.label)
    }
}

/// Value of a day-key: either a concrete event list or a reference to an
/// alias template (e.g. `"Monday": "MW"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DayEntry {
    Template(String),
    Events(Vec<Event>),
}

/// The whole schedule document: day or alias name -> entry, in file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule {
    pub days: IndexMap<String, DayEntry>,
}

impl Schedule {
    pub fn get(&self, key: &str) -> Option<&DayEntry> {
        self.days.get(key)
    }

    pub fn insert(&mut self, key: String, entry: DayEntry) {
        self.days.insert(key, entry);
    }

    /// Concrete event list stored under `key`, if any.
    pub fn events_of(&self, key: &str) -> Option<&Vec<Event>> {
        match self.days.get(key)? {
            DayEntry::Events(events) => Some(events),
            DayEntry::Template(_) => None,
        }
    }

    /// Iterate the day-keys that hold concrete event lists.
    pub fn event_days(&self) -> impl Iterator<Item = (&str, &[Event])> {
        self.days.iter().filter_map(|(key, entry)| match entry {
            DayEntry::Events(events) => Some((key.as_str(), events.as_slice())),
            DayEntry::Template(_) => None,
        })
    }
}

/// Alias name -> member weekdays, from the preferences document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasMap(IndexMap<String, Vec<String>>);

impl Default for AliasMap {
    fn default() -> Self {
        let mut map = IndexMap::new();
        map.insert(
            "MW".to_string(),
            vec!["Monday".to_string(), "Wednesday".to_string()],
        );
        map.insert(
            "TTh".to_string(),
            vec!["Tuesday".to_string(), "Thursday".to_string()],
        );
        Self(map)
    }
}

impl AliasMap {
    pub fn empty() -> Self {
        Self(IndexMap::new())
    }

    pub fn is_alias(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Resolve a weekday to its alias key, or return the day unchanged.
    /// A day belongs to at most one alias; the first match wins and any
    /// later membership is reported.
    pub fn resolve(&self, day: &str) -> String {
        let mut resolved: Option<&str> = None;
        for (alias, members) in &self.0 {
            if members.iter().any(|m| m == day) {
                if resolved.is_some() {
                    warn!(day, alias, "day listed in more than one alias group, keeping first");
                } else {
                    resolved = Some(alias);
                }
            }
        }
        resolved.unwrap_or(day).to_string()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }
}
