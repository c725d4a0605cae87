//! Error types for slot-engine operations.

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::time::TimeOfDay;

#[derive(Error, Debug)]
pub enum SlotError {
    /// A service or reservation duration that is zero or negative.
    #[error("Invalid duration: {0} minutes (must be positive)")]
    InvalidDuration(i64),

    /// A working window whose start is not strictly before its end.
    #[error("Malformed working window on {date}: start {start} is not before end {end}")]
    MalformedWindow {
        date: NaiveDate,
        start: TimeOfDay,
        end: TimeOfDay,
    },

    /// A schedule day with only one of `start` / `end` set.
    #[error("Incomplete hours on {0}: set both a start and an end time, or clear both")]
    IncompleteDay(NaiveDate),

    #[error("Invalid stride: {0} minutes (must be positive)")]
    InvalidStride(i64),

    #[error("Invalid time of day: {0}")]
    InvalidTime(String),

    #[error("Invalid calendar date: {0}")]
    InvalidDate(String),

    #[error("Invalid date-time: {0}")]
    InvalidDateTime(String),

    /// The requested start time is not among the available slots.
    #[error("Requested time {0} is no longer available")]
    SlotUnavailable(NaiveDateTime),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SlotError>;
