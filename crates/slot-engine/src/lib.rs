//! # slot-engine
//!
//! Appointment availability for a spa booking system.
//!
//! Given a provider's opening hours for a day and the reservations already on
//! their book, the engine lists every start time at which a new appointment of
//! a given length fits. All times are naive facility-local wall-clock values.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use slot_engine::{compute_available_slots, ScheduleMap};
//!
//! let schedule = ScheduleMap::from_json_str(r#"{"2026-03-16":{"start":"09:00","end":"10:00"}}"#).unwrap();
//! let date = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap();
//! let slots = compute_available_slots(date, 30, &schedule, &[]).unwrap();
//! let times: Vec<String> = slots.iter().map(|s| s.time().to_string()).collect();
//! assert_eq!(times, ["09:00", "09:15", "09:30"]);
//! ```
//!
//! ## Modules
//!
//! - [`window`] — schedule map parsing and working-window resolution
//! - [`slots`] — candidate start enumeration at a fixed stride
//! - [`conflict`] — half-open overlap filtering against reservations
//! - [`availability`] — the composed service and booking re-check
//! - [`reservation`] — backend reservation records and status policy
//! - [`booking`] — the booking request body
//! - [`config`] — stride and status policy configuration
//! - [`time`] — `TimeOfDay`, `ServiceDuration`, `Stride`
//! - [`error`] — Error types

pub mod availability;
pub mod booking;
pub mod config;
pub mod conflict;
pub mod error;
pub mod reservation;
pub mod slots;
pub mod time;
pub mod window;

pub use availability::{compute_available_slots, AvailabilityService, AvailableSlot};
pub use booking::BookingRequest;
pub use config::AvailabilityConfig;
pub use conflict::filter_conflicts;
pub use error::SlotError;
pub use reservation::{blocking_reservations, Reservation, ReservationRecord, StatusPolicy};
pub use slots::{editor_time_options, enumerate_slots};
pub use time::{ServiceDuration, Stride, TimeOfDay};
pub use window::{resolve_window, DayHours, ScheduleMap, WorkingWindow};
