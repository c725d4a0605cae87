//! Tests for schedule parsing, working-window resolution and schedule validation.

use chrono::NaiveDate;
use slot_engine::window::resolve_window_str;
use slot_engine::{resolve_window, DayHours, ScheduleMap, SlotError, TimeOfDay, WorkingWindow};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn tod(s: &str) -> TimeOfDay {
    s.parse().unwrap()
}

#[test]
fn resolves_open_day() {
    let schedule = ScheduleMap::from_json_str(r#"{"2026-03-16":{"start":"09:00:00","end":"17:00:00"}}"#).unwrap();

    let window = resolve_window(&schedule, d("2026-03-16")).unwrap().unwrap();

    assert_eq!(window.date(), d("2026-03-16"));
    assert_eq!(window.start(), tod("09:00"));
    assert_eq!(window.end(), tod("17:00"));
    assert_eq!(window.length().num_minutes(), 480);
}

#[test]
fn missing_date_is_closed() {
    let schedule = ScheduleMap::from_json_str(r#"{"2026-03-16":{"start":"09:00","end":"17:00"}}"#).unwrap();

    assert_eq!(resolve_window(&schedule, d("2026-03-17")).unwrap(), None);
}

#[test]
fn null_or_missing_bounds_are_closed() {
    let schedule = ScheduleMap::from_json_str(
        r#"{
            "2026-03-16": {"start": null, "end": "17:00"},
            "2026-03-17": {"start": "09:00"},
            "2026-03-18": {"start": "", "end": ""},
            "2026-03-19": null
        }"#,
    )
    .unwrap();

    for day in ["2026-03-16", "2026-03-17", "2026-03-18", "2026-03-19"] {
        assert_eq!(resolve_window(&schedule, d(day)).unwrap(), None, "{day} should be closed");
    }
    assert_eq!(schedule.len(), 4);
}

#[test]
fn inverted_hours_are_malformed() {
    let schedule = ScheduleMap::from_json_str(r#"{"2026-03-16":{"start":"17:00","end":"09:00"}}"#).unwrap();

    let err = resolve_window(&schedule, d("2026-03-16")).unwrap_err();
    assert!(matches!(err, SlotError::MalformedWindow { .. }));
}

#[test]
fn equal_bounds_are_malformed() {
    let err = WorkingWindow::new(d("2026-03-16"), tod("09:00"), tod("09:00")).unwrap_err();

    assert!(matches!(err, SlotError::MalformedWindow { .. }));
}

#[test]
fn nested_schedule_body_is_accepted() {
    let schedule = ScheduleMap::from_json_str(
        r#"{"therapistId": 7, "schedule": {"2026-03-16": {"start": "10:00", "end": "14:00"}}}"#,
    )
    .unwrap();

    let window = resolve_window(&schedule, d("2026-03-16")).unwrap().unwrap();
    assert_eq!(window.start(), tod("10:00"));
    assert_eq!(schedule.len(), 1, "non-date keys are ignored");
}

#[test]
fn flat_entry_wins_over_nested() {
    let schedule = ScheduleMap::from_json_str(
        r#"{
            "2026-03-16": {"start": "08:00", "end": "12:00"},
            "schedule": {"2026-03-16": {"start": "10:00", "end": "14:00"}}
        }"#,
    )
    .unwrap();

    let window = resolve_window(&schedule, d("2026-03-16")).unwrap().unwrap();
    assert_eq!(window.start(), tod("08:00"));
}

#[test]
fn bad_time_in_entry_is_rejected() {
    let result = ScheduleMap::from_json_str(r#"{"2026-03-16":{"start":"9am","end":"17:00"}}"#);

    assert!(matches!(result, Err(SlotError::Json(_))));
}

#[test]
fn string_date_entry_point() {
    let schedule = ScheduleMap::from_json_str(r#"{"2026-03-16":{"start":"09:00","end":"17:00"}}"#).unwrap();

    assert!(resolve_window_str(&schedule, "2026-03-16").unwrap().is_some());
    assert!(matches!(
        resolve_window_str(&schedule, "2026-02-30"),
        Err(SlotError::InvalidDate(_))
    ));
}

#[test]
fn validate_rejects_half_filled_day() {
    let mut schedule = ScheduleMap::new();
    schedule.insert(d("2026-03-16"), DayHours::open(tod("09:00"), tod("17:00")));
    schedule.insert(
        d("2026-03-17"),
        DayHours {
            start: Some(tod("09:00")),
            end: None,
        },
    );

    let err = schedule.validate().unwrap_err();
    assert!(matches!(err, SlotError::IncompleteDay(date) if date == d("2026-03-17")));
}

#[test]
fn validate_rejects_inverted_day() {
    let schedule: ScheduleMap = [(d("2026-03-16"), DayHours::open(tod("12:00"), tod("11:30")))]
        .into_iter()
        .collect();

    assert!(matches!(schedule.validate(), Err(SlotError::MalformedWindow { .. })));
}

#[test]
fn validate_accepts_open_and_closed_days() {
    let schedule: ScheduleMap = [
        (d("2026-03-16"), DayHours::open(tod("09:00"), tod("17:00"))),
        (d("2026-03-17"), DayHours::closed()),
    ]
    .into_iter()
    .collect();

    assert!(schedule.validate().is_ok());
}

#[test]
fn week_entries_fill_closed_days() {
    let schedule: ScheduleMap = [(d("2026-03-17"), DayHours::open(tod("09:00"), tod("17:00")))]
        .into_iter()
        .collect();

    let week = schedule.to_week_entries(d("2026-03-15"));

    assert_eq!(week.len(), 7);
    assert_eq!(week[0].date, d("2026-03-15"));
    assert_eq!(week[6].date, d("2026-03-21"));
    assert_eq!(week[2].start, Some(tod("09:00")));
    assert!(week.iter().filter(|e| e.start.is_none() && e.end.is_none()).count() == 6);

    let json = serde_json::to_value(&week[2]).unwrap();
    assert_eq!(json, serde_json::json!({"date": "2026-03-17", "start": "09:00", "end": "17:00"}));
    let closed = serde_json::to_value(&week[0]).unwrap();
    assert_eq!(closed, serde_json::json!({"date": "2026-03-15", "start": null, "end": null}));
}

#[test]
fn schedule_serializes_as_flat_map() {
    let schedule: ScheduleMap = [(d("2026-03-16"), DayHours::open(tod("09:00"), tod("17:00")))]
        .into_iter()
        .collect();

    let json = serde_json::to_value(&schedule).unwrap();

    assert_eq!(json, serde_json::json!({"2026-03-16": {"start": "09:00", "end": "17:00"}}));
}
