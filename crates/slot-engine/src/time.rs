//! Wall-clock value types.
//!
//! All times in this crate are naive facility-local wall-clock readings. A
//! [`TimeOfDay`] is stored as minutes since midnight so window arithmetic never
//! goes through string slicing or timezone conversion.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};

/// Minutes in a day. `24:00` is representable as an end-of-day bound.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// A wall-clock time with minute precision, `00:00` through `24:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);
    pub const END_OF_DAY: TimeOfDay = TimeOfDay(MINUTES_PER_DAY);

    /// Build from hour and minute components.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidTime` when the hour is above 23 (except the
    /// `24:00` bound) or the minute is above 59.
    pub fn from_hm(hour: u16, minute: u16) -> Result<Self> {
        if minute > 59 || hour > 24 || (hour == 24 && minute != 0) {
            return Err(SlotError::InvalidTime(format!("{:02}:{:02}", hour, minute)));
        }
        Ok(TimeOfDay(hour * 60 + minute))
    }

    /// Build from minutes since midnight.
    pub fn from_minutes(minutes: u16) -> Result<Self> {
        if minutes > MINUTES_PER_DAY {
            return Err(SlotError::InvalidTime(format!("{} minutes", minutes)));
        }
        Ok(TimeOfDay(minutes))
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }

    /// Add minutes, returning `None` past `24:00`.
    pub fn checked_add_minutes(self, minutes: u32) -> Option<TimeOfDay> {
        let total = u32::from(self.0).checked_add(minutes)?;
        u16::try_from(total)
            .ok()
            .filter(|m| *m <= MINUTES_PER_DAY)
            .map(TimeOfDay)
    }

    /// Subtract minutes, returning `None` before `00:00`.
    pub fn checked_sub_minutes(self, minutes: u32) -> Option<TimeOfDay> {
        let minutes = u16::try_from(minutes).ok()?;
        self.0.checked_sub(minutes).map(TimeOfDay)
    }

    /// Combine with a calendar date. `24:00` lands on the following midnight.
    pub fn on(self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(NaiveTime::MIN) + Duration::minutes(i64::from(self.0))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Parses `HH:MM` or `HH:MM:SS`. Seconds are truncated to the minute.
impl FromStr for TimeOfDay {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || SlotError::InvalidTime(s.to_string());
        let trimmed = s.trim();
        let mut parts = trimmed.split(':');

        let hour = parts.next().ok_or_else(invalid)?;
        let minute = parts.next().ok_or_else(invalid)?;
        let second = parts.next();
        if parts.next().is_some() {
            return Err(invalid());
        }

        let field = |raw: &str| -> Result<u16> {
            if raw.len() != 2 || !raw.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            raw.parse::<u16>().map_err(|_| invalid())
        };

        let hour = field(hour)?;
        let minute = field(minute)?;
        if let Some(second) = second {
            let second = field(second)?;
            if second > 59 || (hour == 24 && second != 0) {
                return Err(invalid());
            }
        }

        TimeOfDay::from_hm(hour, minute).map_err(|_| invalid())
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = SlotError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

/// A positive length of time in whole minutes: a service's duration or a
/// reservation's occupied length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct ServiceDuration(u32);

impl ServiceDuration {
    /// # Errors
    /// Returns `SlotError::InvalidDuration` for zero, negative, or
    /// out-of-range values.
    pub fn new(minutes: i64) -> Result<Self> {
        u32::try_from(minutes)
            .ok()
            .filter(|m| *m > 0)
            .map(ServiceDuration)
            .ok_or(SlotError::InvalidDuration(minutes))
    }

    pub fn minutes(self) -> u32 {
        self.0
    }

    pub fn as_duration(self) -> Duration {
        Duration::minutes(i64::from(self.0))
    }
}

impl TryFrom<i64> for ServiceDuration {
    type Error = SlotError;

    fn try_from(value: i64) -> Result<Self> {
        ServiceDuration::new(value)
    }
}

impl From<ServiceDuration> for i64 {
    fn from(value: ServiceDuration) -> Self {
        i64::from(value.0)
    }
}

impl fmt::Display for ServiceDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} min", self.0)
    }
}

/// Granularity between successive candidate start times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Stride(u32);

impl Stride {
    /// 15 minutes, the booking pages' slot granularity.
    pub const DEFAULT: Stride = Stride(15);

    /// # Errors
    /// Returns `SlotError::InvalidStride` for zero or negative values.
    pub fn new(minutes: i64) -> Result<Self> {
        u32::try_from(minutes)
            .ok()
            .filter(|m| *m > 0)
            .map(Stride)
            .ok_or(SlotError::InvalidStride(minutes))
    }

    pub fn minutes(self) -> u32 {
        self.0
    }
}

impl Default for Stride {
    fn default() -> Self {
        Stride::DEFAULT
    }
}

/// Parse an ISO calendar date (`YYYY-MM-DD`).
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| SlotError::InvalidDate(s.to_string()))
}

/// Wall-clock time of day for a date-time, truncated to the minute.
pub(crate) fn time_of_day(dt: NaiveDateTime) -> TimeOfDay {
    use chrono::Timelike;
    // hour() <= 23 and minute() <= 59, so this never exceeds 23:59.
    TimeOfDay((dt.hour() * 60 + dt.minute()) as u16)
}
