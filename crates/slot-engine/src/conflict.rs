//! Remove candidate slots that collide with existing reservations.
//!
//! Intervals are half-open: a slot ending exactly when a reservation starts (or
//! starting exactly when one ends) is NOT a conflict, so back-to-back bookings
//! are allowed.

use chrono::NaiveDateTime;

use crate::reservation::Reservation;
use crate::slots::CandidateSlot;
use crate::time::ServiceDuration;

/// A half-open time range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Interval {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Interval { start, end }
    }

    /// The interval a slot of `duration` starting at `start` would occupy.
    pub fn occupied_by(start: NaiveDateTime, duration: ServiceDuration) -> Self {
        Interval::new(start, start + duration.as_duration())
    }

    /// Two intervals overlap iff `a.start < b.end && a.end > b.start`.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// Keep the candidates whose occupied interval overlaps no reservation.
///
/// Every entry in `reservations` is treated as occupying time; status filtering
/// happens before this point. Returns a new list preserving candidate order.
pub fn filter_conflicts(
    candidates: &[CandidateSlot],
    duration: ServiceDuration,
    reservations: &[Reservation],
) -> Vec<CandidateSlot> {
    let booked: Vec<Interval> = reservations.iter().map(Reservation::occupied).collect();

    candidates
        .iter()
        .copied()
        .filter(|start| {
            let slot = Interval::occupied_by(*start, duration);
            match booked.iter().find(|b| slot.overlaps(b)) {
                Some(blocking) => {
                    tracing::trace!(
                        slot = %start,
                        booked_start = %blocking.start,
                        booked_end = %blocking.end,
                        "slot conflicts with reservation"
                    );
                    false
                }
                None => true,
            }
        })
        .collect()
}
