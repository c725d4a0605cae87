//! Tests for the composed availability service and booking re-check.

use chrono::{NaiveDate, NaiveDateTime};
use slot_engine::{
    compute_available_slots, AvailabilityConfig, AvailabilityService, BookingRequest, Reservation, ScheduleMap,
    ServiceDuration, SlotError, Stride,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 16).unwrap()
}

fn at(hour: u32, minute: u32) -> NaiveDateTime {
    date().and_hms_opt(hour, minute, 0).unwrap()
}

fn schedule(start: &str, end: &str) -> ScheduleMap {
    ScheduleMap::from_json_str(&format!(r#"{{"2026-03-16":{{"start":"{start}","end":"{end}"}}}}"#)).unwrap()
}

fn booked(hour: u32, minute: u32, duration: i64) -> Reservation {
    Reservation::new(at(hour, minute), ServiceDuration::new(duration).unwrap())
}

fn times(slots: &[slot_engine::AvailableSlot]) -> Vec<String> {
    slots.iter().map(|s| s.time().to_string()).collect()
}

// ── computeAvailableSlots ───────────────────────────────────────────────────

#[test]
fn morning_with_one_booking() {
    // 09:00-12:00, 30 min, booked 09:30-10:00
    let slots = compute_available_slots(date(), 30, &schedule("09:00", "12:00"), &[booked(9, 30, 30)]).unwrap();

    assert_eq!(
        times(&slots),
        ["09:00", "10:00", "10:15", "10:30", "10:45", "11:00", "11:15", "11:30"]
    );
}

#[test]
fn slots_carry_their_end_time() {
    let slots = compute_available_slots(date(), 45, &schedule("09:00", "10:00"), &[]).unwrap();

    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0].start, at(9, 0));
    assert_eq!(slots[0].end, at(9, 45));
    assert_eq!(slots[1].end, at(10, 0));
}

#[test]
fn full_day_hour_long_service() {
    let slots = compute_available_slots(date(), 60, &schedule("09:00", "17:00"), &[]).unwrap();

    assert_eq!(slots.last().map(|s| s.start), Some(at(16, 0)));
    assert!(!slots.iter().any(|s| s.start == at(16, 15)));
}

#[test]
fn closed_day_returns_empty() {
    let slots = compute_available_slots(
        NaiveDate::from_ymd_opt(2026, 3, 17).unwrap(),
        30,
        &schedule("09:00", "17:00"),
        &[],
    )
    .unwrap();

    assert!(slots.is_empty());
}

#[test]
fn empty_schedule_returns_empty() {
    let slots = compute_available_slots(date(), 30, &ScheduleMap::new(), &[booked(9, 0, 30)]).unwrap();

    assert!(slots.is_empty());
}

#[test]
fn service_longer_than_window_returns_empty() {
    let slots = compute_available_slots(date(), 60, &schedule("09:00", "09:30"), &[]).unwrap();

    assert!(slots.is_empty());
}

#[test]
fn fully_booked_day_returns_empty() {
    let slots = compute_available_slots(date(), 15, &schedule("09:00", "12:00"), &[booked(9, 0, 180)]).unwrap();

    assert!(slots.is_empty());
}

#[test]
fn non_positive_duration_is_rejected() {
    for bad in [0, -30] {
        let err = compute_available_slots(date(), bad, &schedule("09:00", "12:00"), &[]).unwrap_err();
        assert!(matches!(err, SlotError::InvalidDuration(d) if d == bad));
    }
}

#[test]
fn non_positive_duration_rejected_even_when_closed() {
    let err = compute_available_slots(date(), 0, &ScheduleMap::new(), &[]).unwrap_err();

    assert!(matches!(err, SlotError::InvalidDuration(0)));
}

#[test]
fn inverted_window_is_an_error() {
    let err = compute_available_slots(date(), 30, &schedule("12:00", "09:00"), &[]).unwrap_err();

    assert!(matches!(err, SlotError::MalformedWindow { .. }));
}

#[test]
fn custom_stride_from_config() {
    let config = AvailabilityConfig::from_json_str(r#"{"stride_minutes": 30}"#).unwrap();
    let service = AvailabilityService::from_config(&config).unwrap();

    let slots = service
        .compute_available_slots(date(), 30, &schedule("09:00", "11:00"), &[booked(10, 0, 30)])
        .unwrap();

    assert_eq!(service.stride(), Stride::new(30).unwrap());
    assert_eq!(times(&slots), ["09:00", "09:30", "10:30"]);
}

#[test]
fn both_booking_flows_share_one_service() {
    // The customer flow and the staff custom-booking flow must agree.
    let service = AvailabilityService::default();
    let schedule = schedule("10:00", "13:00");
    let reservations = [booked(11, 0, 60)];

    let customer = service.compute_available_slots(date(), 60, &schedule, &reservations).unwrap();
    let staff = compute_available_slots(date(), 60, &schedule, &reservations).unwrap();

    assert_eq!(customer, staff);
    assert_eq!(times(&customer), ["10:00", "12:00"]);
}

#[test]
fn service_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AvailabilityService>();
    assert_send_sync::<ScheduleMap>();
    assert_send_sync::<Reservation>();
}

// ── check_booking ───────────────────────────────────────────────────────────

fn request(date_time: &str) -> BookingRequest {
    BookingRequest::from_json_str(&format!(
        r#"{{"serviceId": 3, "therapistId": "t-7", "dateTime": "{date_time}"}}"#
    ))
    .unwrap()
}

#[test]
fn booking_at_open_slot_is_confirmed() {
    let slot = AvailabilityService::default()
        .check_booking(
            &request("2026-03-16T10:00:00"),
            30,
            &schedule("09:00", "12:00"),
            &[booked(9, 30, 30)],
        )
        .unwrap();

    assert_eq!(slot.start, at(10, 0));
    assert_eq!(slot.end, at(10, 30));
}

#[test]
fn booking_accepts_utc_suffix_as_wall_clock() {
    let result = AvailabilityService::default().check_booking(
        &request("2026-03-16T10:00:00.000Z"),
        30,
        &schedule("09:00", "12:00"),
        &[],
    );

    assert!(result.is_ok());
}

#[test]
fn booking_overlapping_reservation_is_unavailable() {
    let err = AvailabilityService::default()
        .check_booking(
            &request("2026-03-16T09:15:00"),
            30,
            &schedule("09:00", "12:00"),
            &[booked(9, 30, 30)],
        )
        .unwrap_err();

    assert!(matches!(err, SlotError::SlotUnavailable(t) if t == at(9, 15)));
}

#[test]
fn booking_off_stride_is_unavailable() {
    let err = AvailabilityService::default()
        .check_booking(&request("2026-03-16T09:07:00"), 30, &schedule("09:00", "12:00"), &[])
        .unwrap_err();

    assert!(matches!(err, SlotError::SlotUnavailable(_)));
}

#[test]
fn booking_on_closed_day_is_unavailable() {
    let err = AvailabilityService::default()
        .check_booking(&request("2026-03-18T10:00:00"), 30, &schedule("09:00", "12:00"), &[])
        .unwrap_err();

    assert!(matches!(err, SlotError::SlotUnavailable(_)));
}

#[test]
fn booking_request_serializes_camel_case() {
    let json = serde_json::to_value(request("2026-03-16T10:00:00")).unwrap();

    assert_eq!(
        json,
        serde_json::json!({"serviceId": 3, "therapistId": "t-7", "dateTime": "2026-03-16T10:00:00"})
    );
}
