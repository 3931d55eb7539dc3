// --- File: crates/planify_slots/src/error.rs ---
use chrono::{DateTime, NaiveTime, Utc};
use planify_common::{
    external_service_error, not_found, unauthorized, validation_error, PlanifyError,
};
use thiserror::Error;

use crate::service::SlotApiError;

/// Local validation errors of the planning engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SlotError {
    #[error("Invalid time range: start {start} is not before end {end}")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error("Invalid daily window: {start} is not before {end}")]
    InvalidBaseRange { start: NaiveTime, end: NaiveTime },
    #[error("Unsupported slot interval: {0} minutes (expected 15, 30 or 60)")]
    InvalidInterval(u32),
    #[error("Day index out of range: {0} (expected 0..=6)")]
    InvalidDay(usize),
    #[error("Invalid grid hours: {start_hour}..={end_hour}")]
    InvalidGrid { start_hour: u32, end_hour: u32 },
    #[error("Unknown time zone: {0}")]
    InvalidTimeZone(String),
    #[error("Failed to parse time: {0}")]
    TimeParse(String),
    #[error("Date out of range: cannot shift by {days} days")]
    DateOutOfRange { days: i64 },
    #[error("Too many repeat weeks: {requested} (at most {max})")]
    TooManyWeeks { requested: i32, max: i32 },
}

/// Errors surfaced by the planner session.
///
/// Per-slot submission failures are not errors; they are collected in
/// [`crate::submission::SubmissionResult`].
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error(transparent)]
    Slot(#[from] SlotError),
    #[error("Planning API error: {0}")]
    Api(#[from] SlotApiError),
    #[error("Failed to refresh the week from the planning API: {0}")]
    Refresh(SlotApiError),
    #[error("Operation requires an administrator session")]
    Forbidden,
    #[error("No slot edit in progress")]
    NoEditInProgress,
}

impl From<SlotError> for PlanifyError {
    fn from(err: SlotError) -> Self {
        validation_error(err)
    }
}

impl From<SlotApiError> for PlanifyError {
    fn from(err: SlotApiError) -> Self {
        match err.status_code() {
            401 => unauthorized(err),
            403 => PlanifyError::ForbiddenError(err.to_string()),
            404 => not_found(err),
            429 => PlanifyError::RateLimitError(err.to_string()),
            _ => external_service_error("planning-api", err),
        }
    }
}

impl From<PlannerError> for PlanifyError {
    fn from(err: PlannerError) -> Self {
        let message = err.to_string();
        match err {
            PlannerError::Slot(e) => e.into(),
            PlannerError::Api(e) | PlannerError::Refresh(e) => e.into(),
            PlannerError::Forbidden => PlanifyError::ForbiddenError(message),
            PlannerError::NoEditInProgress => validation_error(message),
        }
    }
}
