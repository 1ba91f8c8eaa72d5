use thiserror::Error;

use crate::calendar::{Event, TimeOfDay};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("Event overlaps with an existing event. Please choose a different time.")]
    Overlap,
    #[error("End time must be after start time.")]
    InvalidRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidate {
    New,
    /// Edits skip the overlap scan; only the range rule applies.
    Edit,
}

/// Decides whether `start..end` may be committed next to `existing`.
pub fn validate(
    start: TimeOfDay,
    end: TimeOfDay,
    existing: &[Event],
    candidate: Candidate,
) -> Result<(), ScheduleError> {
    if candidate == Candidate::New && existing.iter().any(|event| collides(start, end, event)) {
        return Err(ScheduleError::Overlap);
    }

    if start >= end {
        return Err(ScheduleError::InvalidRange);
    }

    Ok(())
}

fn collides(start: TimeOfDay, end: TimeOfDay, event: &Event) -> bool {
    let starts_inside = start >= event.start_time && start < event.end_time;
    let ends_inside = end > event.start_time && end <= event.end_time;
    let contains = start <= event.start_time && end >= event.end_time;

    starts_inside || ends_inside || contains
}
