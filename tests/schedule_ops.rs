//! End-to-end tests of the add/update/delete operations against a real
//! document on disk.

use std::fs;

use weekplan::schedule::{
    self, add_event, delete_event, normalize, update_event, AliasMap, Event, Schedule,
    ScheduleError, Store,
};

fn store_with(doc: &str) -> (tempfile::TempDir, Store) {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::at(dir.path());
    let schedule: Schedule = serde_json::from_str(doc).unwrap();
    store.save(&schedule).unwrap();
    (dir, store)
}

fn day_starts(store: &Store, aliases: &AliasMap, day: &str) -> Vec<String> {
    let view = schedule::load_view(store, aliases).unwrap();
    view.events_of(day)
        .map(|events| events.iter().map(|e| e.start.clone()).collect())
        .unwrap_or_default()
}

#[test]
fn add_lands_on_the_alias_template_and_every_member_day() {
    let (_dir, store) = store_with(
        r#"{
            "MW": [["9:00 AM - 10:00 AM", "Class"]],
            "Monday": "MW",
            "Wednesday": "MW"
        }"#,
    );
    let aliases = AliasMap::default();

    add_event(&store, &aliases, "Monday", "2:00 PM", "3:00 PM", "Office Hours").unwrap();

    // The template itself was updated, so Wednesday sees the event too.
    let raw = store.load().unwrap();
    assert_eq!(raw.events_of("MW").unwrap().len(), 2);
    assert_eq!(
        day_starts(&store, &aliases, "Wednesday"),
        vec!["9:00 AM", "2:00 PM"]
    );
}

#[test]
fn add_removes_a_fully_contained_event() {
    let (_dir, store) = store_with(r#"{ "Friday": [["9:00 AM - 10:00 AM", "Gym"]] }"#);
    let aliases = AliasMap::empty();

    add_event(&store, &aliases, "Friday", "8:30 AM", "10:30 AM", "Errands").unwrap();

    let view = schedule::load_view(&store, &aliases).unwrap();
    let events = view.events_of("Friday").unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].label, "Errands");
}

#[test]
fn add_shortens_the_event_it_starts_inside() {
    let (_dir, store) = store_with(r#"{ "Friday": [["9:00 AM - 11:00 AM", "Study"]] }"#);
    let aliases = AliasMap::empty();

    add_event(&store, &aliases, "Friday", "10:00 AM", "10:30 AM", "Call").unwrap();

    let view = schedule::load_view(&store, &aliases).unwrap();
    let events = view.events_of("Friday").unwrap();
    assert_eq!(events[0].label, "Study");
    assert_eq!(events[0].end.as_deref(), Some("10:00 AM"));
    assert_eq!(events[1].label, "Call");
}

#[test]
fn add_sorts_pre_dawn_events_to_the_day_end() {
    let (_dir, store) = store_with(r#"{ "Friday": [["8:00 PM - 9:00 PM", "TV"]] }"#);
    let aliases = AliasMap::empty();

    add_event(&store, &aliases, "Friday", "12:30 AM", "1:30 AM", "Reading").unwrap();

    assert_eq!(
        day_starts(&store, &aliases, "Friday"),
        vec!["8:00 PM", "12:30 AM"]
    );
}

#[test]
fn add_creates_a_missing_day() {
    let (_dir, store) = store_with(r#"{}"#);
    let aliases = AliasMap::empty();

    add_event(&store, &aliases, "Sunday", "9:00 AM", "10:00 AM", "Brunch").unwrap();
    assert_eq!(day_starts(&store, &aliases, "Sunday"), vec!["9:00 AM"]);
}

#[test]
fn add_rejects_malformed_times_without_writing() {
    let (_dir, store) = store_with(r#"{ "Friday": [["9:00 AM - 10:00 AM", "Gym"]] }"#);
    let before = fs::read_to_string(store.schedule_path()).unwrap();

    let err = add_event(&store, &AliasMap::empty(), "Friday", "25:00", "26:00", "X").unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidTime(_)));
    assert_eq!(fs::read_to_string(store.schedule_path()).unwrap(), before);
}

#[test]
fn update_replaces_the_event_found_by_start_time() {
    let (_dir, store) = store_with(
        r#"{ "Friday": [
            ["9:00 AM - 10:00 AM", "Gym"],
            ["10:00 AM - 12:00 PM", "Work"]
        ] }"#,
    );
    let aliases = AliasMap::empty();

    update_event(&store, &aliases, "Friday", "9:00 AM", "8:30 AM", "9:30 AM", "Run").unwrap();

    let view = schedule::load_view(&store, &aliases).unwrap();
    let events = view.events_of("Friday").unwrap();
    assert_eq!(events[0].label, "Run");
    assert_eq!(events[0].start, "8:30 AM");
    assert_eq!(events[1].label, "Work");
}

#[test]
fn update_with_no_matching_start_aborts_without_writing() {
    let (_dir, store) = store_with(r#"{ "Friday": [["9:00 AM - 10:00 AM", "Gym"]] }"#);
    let before = fs::read_to_string(store.schedule_path()).unwrap();

    let err = update_event(
        &store,
        &AliasMap::empty(),
        "Friday",
        "7:00 AM",
        "8:00 AM",
        "9:00 AM",
        "Run",
    )
    .unwrap_err();

    assert!(matches!(err, ScheduleError::EventNotFound { .. }));
    assert_eq!(fs::read_to_string(store.schedule_path()).unwrap(), before);
}

#[test]
fn delete_fills_the_gap_from_both_sides() {
    let (_dir, store) = store_with(
        r#"{ "Friday": [
            ["8:00 AM - 9:00 AM", "Breakfast"],
            ["9:00 AM - 10:00 AM", "Gym"],
            ["10:30 AM - 12:00 PM", "Work"]
        ] }"#,
    );
    let aliases = AliasMap::empty();

    delete_event(&store, &aliases, "Friday", "9:00 AM").unwrap();

    let view = schedule::load_view(&store, &aliases).unwrap();
    let events = view.events_of("Friday").unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].end.as_deref(), Some("9:00 AM"));
    assert_eq!(events[1].start, "9:00 AM");
    assert_eq!(events[1].end.as_deref(), Some("12:00 PM"));
}

#[test]
fn delete_keeps_an_open_ended_marker_start_only() {
    let (_dir, store) = store_with(
        r#"{ "Friday": [
            ["9:00 PM - 10:00 PM", "TV"],
            ["10:00 PM - 11:00 PM", "Reading"],
            ["11:30 PM", "Bedtime"]
        ] }"#,
    );
    let aliases = AliasMap::empty();

    delete_event(&store, &aliases, "Friday", "10:00 PM").unwrap();

    let view = schedule::load_view(&store, &aliases).unwrap();
    let events = view.events_of("Friday").unwrap();
    assert_eq!(events.len(), 2);
    // Bedtime moved up to the freed slot but stays open-ended.
    assert_eq!(events[1].label, "Bedtime");
    assert_eq!(events[1].start, "10:00 PM");
    assert_eq!(events[1].end, None);
}

#[test]
fn delete_then_reinsert_restores_an_equivalent_schedule() {
    let doc = r#"{ "Friday": [
        ["8:00 AM - 9:00 AM", "Breakfast"],
        ["9:00 AM - 10:00 AM", "Gym"],
        ["10:00 AM - 11:00 AM", "Work"]
    ] }"#;
    let (_dir, store) = store_with(doc);
    let aliases = AliasMap::empty();
    let original = schedule::load_view(&store, &aliases).unwrap();

    delete_event(&store, &aliases, "Friday", "9:00 AM").unwrap();
    add_event(&store, &aliases, "Friday", "9:00 AM", "10:00 AM", "Gym").unwrap();

    let roundtripped = schedule::load_view(&store, &aliases).unwrap();
    assert_eq!(roundtripped, original);
}

#[test]
fn expansion_round_trip_preserves_an_untouched_template() {
    let (_dir, store) = store_with(
        r#"{
            "MW": [["9:00 AM - 10:00 AM", "Class"]],
            "Monday": "MW",
            "Wednesday": "MW",
            "Friday": [["8:00 AM - 9:00 AM", "Gym"]]
        }"#,
    );
    let aliases = AliasMap::default();

    // A mutation on an unrelated day must leave the alias template as-is.
    add_event(&store, &aliases, "Friday", "6:00 PM", "7:00 PM", "Dinner").unwrap();

    let raw = store.load().unwrap();
    let template = raw.events_of("MW").unwrap();
    assert_eq!(template, &vec![Event::new("9:00 AM", Some("10:00 AM"), "Class")]);
    assert_eq!(
        day_starts(&store, &aliases, "Monday"),
        day_starts(&store, &aliases, "Wednesday")
    );
}

#[test]
fn mutations_leave_a_backup_behind() {
    let (dir, store) = store_with(r#"{ "Friday": [["9:00 AM - 10:00 AM", "Gym"]] }"#);
    let aliases = AliasMap::empty();

    add_event(&store, &aliases, "Friday", "2:00 PM", "3:00 PM", "Call").unwrap();
    assert!(store.latest_backup().unwrap().is_some());

    // Undo takes the schedule back to the pre-add state.
    store.restore_latest().unwrap();
    assert_eq!(day_starts(&store, &aliases, "Friday"), vec!["9:00 AM"]);
    drop(dir);
}

#[test]
fn durations_in_the_loaded_view() {
    let (_dir, store) = store_with(
        r#"{
            "Friday": [["7:30 PM - 2:00 AM", "Party"], ["11:00 PM", "Bedtime"]],
            "Saturday": [["9:00 AM - 10:00 AM", "Recover"]]
        }"#,
    );
    let view = schedule::load_view(&store, &AliasMap::empty()).unwrap();

    let friday = view.events_of("Friday").unwrap();
    assert_eq!(
        normalize::duration_with_fallback(&view, "Friday", &friday[0]),
        6.5
    );
    // Open-ended Bedtime runs until Saturday's first event.
    assert_eq!(
        normalize::duration_with_fallback(&view, "Friday", &friday[1]),
        10.0
    );
}
