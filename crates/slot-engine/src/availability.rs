//! Appointment availability for one provider on one date.
//!
//! Composes window resolution, slot enumeration and conflict filtering into a
//! single pass. Both the customer booking flow and the staff custom-booking
//! flow go through [`AvailabilityService`], and the same service re-checks a
//! chosen time right before a booking is submitted.
//!
//! The result is advisory: the backend re-validates at booking time and stays
//! the source of truth.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::booking::BookingRequest;
use crate::config::AvailabilityConfig;
use crate::conflict::filter_conflicts;
use crate::error::{Result, SlotError};
use crate::reservation::Reservation;
use crate::slots::enumerate_slots;
use crate::time::{self, ServiceDuration, Stride, TimeOfDay};
use crate::window::{resolve_window, ScheduleMap};

/// A start time that survived conflict filtering, with the end of the
/// appointment it would hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct AvailableSlot {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl AvailableSlot {
    /// Start time as a wall-clock `TimeOfDay`, the way pickers display it.
    pub fn time(&self) -> TimeOfDay {
        time::time_of_day(self.start)
    }
}

/// Stateless availability calculator. Cheap to copy and safe to share.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AvailabilityService {
    stride: Stride,
}

impl AvailabilityService {
    pub fn new(stride: Stride) -> Self {
        AvailabilityService { stride }
    }

    pub fn from_config(config: &AvailabilityConfig) -> Result<Self> {
        Ok(AvailabilityService::new(config.stride()?))
    }

    pub fn stride(&self) -> Stride {
        self.stride
    }

    /// Compute the ordered list of start times open for a new appointment.
    ///
    /// `reservations` must already be narrowed to this provider and date, with
    /// non-blocking statuses removed (see
    /// [`blocking_reservations`](crate::reservation::blocking_reservations)).
    ///
    /// A closed day yields an empty list.
    ///
    /// # Errors
    /// `SlotError::InvalidDuration` when `duration_minutes <= 0`;
    /// `SlotError::MalformedWindow` when the day's hours are inverted.
    pub fn compute_available_slots(
        &self,
        date: NaiveDate,
        duration_minutes: i64,
        schedule: &ScheduleMap,
        reservations: &[Reservation],
    ) -> Result<Vec<AvailableSlot>> {
        let duration = ServiceDuration::new(duration_minutes)?;

        let Some(window) = resolve_window(schedule, date)? else {
            tracing::debug!(%date, "provider closed");
            return Ok(Vec::new());
        };

        let candidates = enumerate_slots(Some(&window), duration, self.stride);
        let open = filter_conflicts(&candidates, duration, reservations);

        tracing::debug!(
            %date,
            duration = duration.minutes(),
            candidates = candidates.len(),
            reservations = reservations.len(),
            available = open.len(),
            "computed availability"
        );

        Ok(open
            .into_iter()
            .map(|start| AvailableSlot {
                start,
                end: start + duration.as_duration(),
            })
            .collect())
    }

    /// Re-check a booking request against current availability.
    ///
    /// # Errors
    /// `SlotError::SlotUnavailable` when the requested time is not an available
    /// slot, plus any error from [`Self::compute_available_slots`].
    pub fn check_booking(
        &self,
        request: &BookingRequest,
        duration_minutes: i64,
        schedule: &ScheduleMap,
        reservations: &[Reservation],
    ) -> Result<AvailableSlot> {
        let date = request.date_time.date();
        let slots = self.compute_available_slots(date, duration_minutes, schedule, reservations)?;

        slots
            .into_iter()
            .find(|slot| slot.start == request.date_time)
            .ok_or_else(|| {
                tracing::info!(
                    therapist = %request.therapist_id,
                    service = %request.service_id,
                    requested = %request.date_time,
                    "requested slot unavailable"
                );
                SlotError::SlotUnavailable(request.date_time)
            })
    }
}

/// [`AvailabilityService::compute_available_slots`] with the default 15-minute
/// stride.
pub fn compute_available_slots(
    date: NaiveDate,
    duration_minutes: i64,
    schedule: &ScheduleMap,
    reservations: &[Reservation],
) -> Result<Vec<AvailableSlot>> {
    AvailabilityService::default().compute_available_slots(date, duration_minutes, schedule, reservations)
}
