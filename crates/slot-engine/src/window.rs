//! Working windows and the per-provider schedule map they are resolved from.
//!
//! A schedule is a sparse map from calendar date to opening hours, as served by
//! `GET /schedules/{providerId}`. A date with no entry, or an entry missing
//! either bound, means the provider is closed that day.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, SlotError};
use crate::time::{parse_date, TimeOfDay};

/// The open-to-close interval during which a provider accepts appointments.
///
/// Always satisfies `start < end`; construct through [`WorkingWindow::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkingWindow {
    date: NaiveDate,
    start: TimeOfDay,
    end: TimeOfDay,
}

impl WorkingWindow {
    /// # Errors
    /// Returns `SlotError::MalformedWindow` when `start >= end`.
    pub fn new(date: NaiveDate, start: TimeOfDay, end: TimeOfDay) -> Result<Self> {
        if start >= end {
            return Err(SlotError::MalformedWindow { date, start, end });
        }
        Ok(WorkingWindow { date, start, end })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn start(&self) -> TimeOfDay {
        self.start
    }

    pub fn end(&self) -> TimeOfDay {
        self.end
    }

    pub fn start_at(&self) -> NaiveDateTime {
        self.start.on(self.date)
    }

    pub fn end_at(&self) -> NaiveDateTime {
        self.end.on(self.date)
    }

    pub fn length(&self) -> Duration {
        self.end_at() - self.start_at()
    }
}

/// Opening hours for one date. Either bound may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHours {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub start: Option<TimeOfDay>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub end: Option<TimeOfDay>,
}

impl DayHours {
    pub fn open(start: TimeOfDay, end: TimeOfDay) -> Self {
        DayHours {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn closed() -> Self {
        DayHours::default()
    }

    /// Check the hours the way the schedule editor does before saving.
    ///
    /// # Errors
    /// `SlotError::IncompleteDay` when exactly one bound is set,
    /// `SlotError::MalformedWindow` when `start >= end`.
    pub fn validate(&self, date: NaiveDate) -> Result<()> {
        match (self.start, self.end) {
            (None, None) => Ok(()),
            (Some(start), Some(end)) => WorkingWindow::new(date, start, end).map(|_| ()),
            _ => Err(SlotError::IncompleteDay(date)),
        }
    }
}

/// Empty strings are how the editor clears a bound.
fn blank_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<TimeOfDay>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// One day of the week the schedule editor submits to `POST /schedules`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekEntry {
    pub date: NaiveDate,
    pub start: Option<TimeOfDay>,
    pub end: Option<TimeOfDay>,
}

/// A provider's sparse date → hours map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ScheduleMap {
    days: BTreeMap<NaiveDate, DayHours>,
}

impl ScheduleMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, date: NaiveDate, hours: DayHours) -> Option<DayHours> {
        self.days.insert(date, hours)
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DayHours> {
        self.days.get(&date)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &DayHours)> {
        self.days.iter().map(|(d, h)| (*d, h))
    }

    /// Parse a `/schedules/{providerId}` response body.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate every day in date order, stopping at the first failure.
    pub fn validate(&self) -> Result<()> {
        self.days
            .iter()
            .try_for_each(|(date, hours)| hours.validate(*date))
    }

    /// The seven entries for the week starting at `week_start`, closed days
    /// included with both bounds empty.
    pub fn to_week_entries(&self, week_start: NaiveDate) -> Vec<WeekEntry> {
        week_start
            .iter_days()
            .take(7)
            .map(|date| {
                let hours = self.days.get(&date).copied().unwrap_or_default();
                WeekEntry {
                    date,
                    start: hours.start,
                    end: hours.end,
                }
            })
            .collect()
    }
}

impl FromIterator<(NaiveDate, DayHours)> for ScheduleMap {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, DayHours)>>(iter: I) -> Self {
        ScheduleMap {
            days: iter.into_iter().collect(),
        }
    }
}

/// Accepts the flat `{ "YYYY-MM-DD": {start, end} }` body as well as the same
/// map nested under a top-level `"schedule"` key. Flat entries win over nested
/// ones for the same date; keys that are not dates are ignored.
impl<'de> Deserialize<'de> for ScheduleMap {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        let mut raw: BTreeMap<String, serde_json::Value> = BTreeMap::deserialize(deserializer)?;
        let nested: BTreeMap<String, serde_json::Value> = match raw.remove("schedule") {
            Some(serde_json::Value::Object(map)) => map.into_iter().collect(),
            _ => BTreeMap::new(),
        };

        let mut days = BTreeMap::new();
        for (key, value) in nested.into_iter().chain(raw) {
            let Ok(date) = parse_date(&key) else {
                tracing::debug!(key = %key, "ignoring non-date schedule key");
                continue;
            };
            let hours = if value.is_null() {
                DayHours::closed()
            } else {
                DayHours::deserialize(value).map_err(|e| D::Error::custom(format!("{}: {}", key, e)))?
            };
            days.insert(date, hours);
        }

        Ok(ScheduleMap { days })
    }
}

/// Resolve the working window for `date`.
///
/// Returns `Ok(None)` when the provider is closed: no entry for the date, or an
/// entry missing either bound.
///
/// # Errors
/// Returns `SlotError::MalformedWindow` when both bounds are present but
/// `start >= end`.
pub fn resolve_window(schedule: &ScheduleMap, date: NaiveDate) -> Result<Option<WorkingWindow>> {
    match schedule.get(date) {
        Some(DayHours {
            start: Some(start),
            end: Some(end),
        }) => WorkingWindow::new(date, *start, *end).map(Some),
        _ => Ok(None),
    }
}

/// Like [`resolve_window`], taking the date as a `YYYY-MM-DD` string.
///
/// # Errors
/// Returns `SlotError::InvalidDate` if the string is not a calendar date.
pub fn resolve_window_str(schedule: &ScheduleMap, date: &str) -> Result<Option<WorkingWindow>> {
    resolve_window(schedule, parse_date(date)?)
}
