// --- File: crates/planify_slots/src/lib.rs ---
// Declare modules within this crate
pub mod calendar;
pub mod doc;
pub mod error;
pub mod handlers;
pub mod logic;
pub mod materialize;
pub mod models;
pub mod planner;
pub mod ranges;
#[cfg(test)]
mod ranges_proptest;
pub mod routes;
pub mod selection;
pub mod service;
pub mod submission;
#[cfg(test)]
mod submission_test;
pub mod week;
#[cfg(test)]
mod week_test;

pub use error::{PlannerError, SlotError};
pub use models::{ExistingSlot, Role, SessionContext, SlotDto, SlotInterval, TimeRange};
pub use planner::{PlannerSettings, SlotPlanner};
pub use service::{ReqwestSlotApi, SlotApi, SlotApiError};
pub use submission::{BatchSubmitter, SubmissionOptions, SubmissionResult};
