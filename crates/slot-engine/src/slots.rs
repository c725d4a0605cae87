//! Candidate slot enumeration.
//!
//! Walks a working window at a fixed stride and keeps every start time whose
//! full service duration fits before closing.

use chrono::{Duration, NaiveDateTime};

use crate::time::{ServiceDuration, Stride, TimeOfDay};
use crate::window::WorkingWindow;

/// A potential appointment start.
pub type CandidateSlot = NaiveDateTime;

/// Enumerate candidate start times within `window`.
///
/// Produces every `t = window.start + k * stride` (`k >= 0`) with
/// `t + duration <= window.end`, in ascending order. A closed day (`None`) or a
/// duration longer than the window yields an empty list.
pub fn enumerate_slots(
    window: Option<&WorkingWindow>,
    duration: ServiceDuration,
    stride: Stride,
) -> Vec<CandidateSlot> {
    let Some(window) = window else {
        return Vec::new();
    };

    let open = u32::from(window.start().minutes());
    let close = u32::from(window.end().minutes());
    // WorkingWindow guarantees open < close; never walk an inverted range.
    if open >= close {
        return Vec::new();
    }

    let Some(last_start) = close.checked_sub(duration.minutes()) else {
        return Vec::new();
    };
    if last_start < open {
        return Vec::new();
    }

    let base = window.start_at();
    let slots: Vec<CandidateSlot> = (open..=last_start)
        .step_by(stride.minutes() as usize)
        .map(|minute| base + Duration::minutes(i64::from(minute - open)))
        .collect();

    tracing::trace!(
        date = %window.date(),
        open = %window.start(),
        close = %window.end(),
        duration = duration.minutes(),
        stride = stride.minutes(),
        candidates = slots.len(),
        "enumerated candidate slots"
    );

    slots
}

/// Times offered by the schedule editor's start/end pickers.
///
/// Runs from `open` in `step` increments up to and including `close - step`;
/// empty when either bound is missing or the range is shorter than one step.
pub fn editor_time_options(
    open: Option<TimeOfDay>,
    close: Option<TimeOfDay>,
    step: Stride,
) -> Vec<TimeOfDay> {
    let (Some(open), Some(close)) = (open, close) else {
        return Vec::new();
    };
    let Some(last) = close.checked_sub_minutes(step.minutes()) else {
        return Vec::new();
    };

    let mut options = Vec::new();
    let mut current = Some(open);
    while let Some(time) = current.filter(|t| *t <= last) {
        options.push(time);
        current = time.checked_add_minutes(step.minutes());
    }
    options
}
