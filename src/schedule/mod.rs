//! The day-schedule normalizer: data model, time boundary, alias
//! expansion, 5 AM sorting, overlap resolution, and document persistence.

pub mod model;
pub mod normalize;
pub mod ops;
pub mod store;
pub mod time;

pub use model::{next_day, AliasMap, DayEntry, Event, Schedule, DAYS_OF_WEEK};
pub use ops::{add_event, delete_event, update_event, ScheduleError};
pub use store::Store;

/// Read-side entry point: the document loaded, alias-expanded, and sorted.
pub fn load_view(store: &Store, aliases: &AliasMap) -> anyhow::Result<Schedule> {
    let raw = store.load()?;
    let mut expanded = normalize::expand(&raw, aliases);
    normalize::sort_schedule(&mut expanded);
    Ok(expanded)
}
