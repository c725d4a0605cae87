//! Existing reservations and their intake from backend records.
//!
//! The backend's `/reservations/therapist/{id}?date=...` endpoint returns
//! [`ReservationRecord`]s. [`blocking_reservations`] applies the configured
//! [`StatusPolicy`] and converts the survivors into [`Reservation`]s, which the
//! conflict filter treats as unconditionally occupying time.

use std::fmt;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::conflict::Interval;
use crate::error::{Result, SlotError};
use crate::time::ServiceDuration;

/// A booked appointment occupying `[start, start + duration)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub start: NaiveDateTime,
    pub duration: ServiceDuration,
}

impl Reservation {
    pub fn new(start: NaiveDateTime, duration: ServiceDuration) -> Self {
        Reservation { start, duration }
    }

    pub fn end(&self) -> NaiveDateTime {
        self.start + self.duration.as_duration()
    }

    pub fn occupied(&self) -> Interval {
        Interval::new(self.start, self.end())
    }
}

/// Lifecycle status carried by a backend reservation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReservationStatus {
    Confirmed,
    Completed,
    Cancelled,
    Other(String),
}

impl From<String> for ReservationStatus {
    fn from(value: String) -> Self {
        match value.trim() {
            s if s.eq_ignore_ascii_case("confirmed") => ReservationStatus::Confirmed,
            s if s.eq_ignore_ascii_case("completed") => ReservationStatus::Completed,
            s if s.eq_ignore_ascii_case("cancelled") || s.eq_ignore_ascii_case("canceled") => {
                ReservationStatus::Cancelled
            }
            _ => ReservationStatus::Other(value),
        }
    }
}

impl From<ReservationStatus> for String {
    fn from(value: ReservationStatus) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReservationStatus::Confirmed => f.write_str("Confirmed"),
            ReservationStatus::Completed => f.write_str("Completed"),
            ReservationStatus::Cancelled => f.write_str("Cancelled"),
            ReservationStatus::Other(s) => f.write_str(s),
        }
    }
}

/// Which reservation statuses occupy a provider's time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusPolicy {
    /// Every status blocks except the listed ones.
    AllExcept(Vec<ReservationStatus>),
    /// Only the listed statuses block.
    Only(Vec<ReservationStatus>),
}

impl Default for StatusPolicy {
    fn default() -> Self {
        StatusPolicy::AllExcept(vec![ReservationStatus::Cancelled])
    }
}

impl StatusPolicy {
    /// Records without a status are treated as blocking unless the policy is
    /// an allow-list.
    pub fn blocks(&self, status: Option<&ReservationStatus>) -> bool {
        match (self, status) {
            (StatusPolicy::AllExcept(excluded), Some(status)) => !excluded.contains(status),
            (StatusPolicy::AllExcept(_), None) => true,
            (StatusPolicy::Only(allowed), Some(status)) => allowed.contains(status),
            (StatusPolicy::Only(_), None) => false,
        }
    }
}

/// One reservation as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationRecord {
    #[serde(rename = "ReservationID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(rename = "ReservationDateTime")]
    pub date_time: String,
    #[serde(rename = "DurationMinutes")]
    pub duration_minutes: i64,
    #[serde(rename = "Status", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ReservationStatus>,
    #[serde(rename = "ServiceName", default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(
        rename = "TherapistName",
        alias = "EmployeeName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub therapist_name: Option<String>,
    #[serde(rename = "CustomerName", default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(rename = "CancellationReason", default, skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
}

impl ReservationRecord {
    /// Convert to a [`Reservation`], ignoring status.
    ///
    /// # Errors
    /// `SlotError::InvalidDateTime` for an unparseable `ReservationDateTime`,
    /// `SlotError::InvalidDuration` for a non-positive `DurationMinutes`.
    pub fn to_reservation(&self) -> Result<Reservation> {
        let start = parse_date_time(&self.date_time)?;
        let duration = ServiceDuration::new(self.duration_minutes)?;
        Ok(Reservation::new(start, duration))
    }
}

/// Parse a list of backend reservation records from JSON.
pub fn parse_records(json: &str) -> Result<Vec<ReservationRecord>> {
    Ok(serde_json::from_str(json)?)
}

/// Keep the records that occupy time under `policy` and convert them.
///
/// # Errors
/// Fails on the first blocking record that cannot be converted.
pub fn blocking_reservations(
    records: &[ReservationRecord],
    policy: &StatusPolicy,
) -> Result<Vec<Reservation>> {
    let mut reservations = Vec::with_capacity(records.len());
    for record in records {
        if !policy.blocks(record.status.as_ref()) {
            tracing::debug!(
                date_time = %record.date_time,
                status = ?record.status,
                "skipping non-blocking reservation"
            );
            continue;
        }
        let reservation = record.to_reservation().inspect_err(|e| {
            tracing::warn!(date_time = %record.date_time, error = %e, "rejecting reservation record");
        })?;
        reservations.push(reservation);
    }
    Ok(reservations)
}

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse an ISO 8601 date-time as a wall-clock reading.
///
/// Naive values are taken as-is. Values carrying `Z` or an offset keep the
/// local reading at that offset; no conversion between zones is done.
pub fn parse_date_time(s: &str) -> Result<NaiveDateTime> {
    let trimmed = s.trim();
    if let Some(dt) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
    {
        return Ok(dt);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.naive_local())
        .map_err(|_| SlotError::InvalidDateTime(s.to_string()))
}
