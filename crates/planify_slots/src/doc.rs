// --- File: crates/planify_slots/src/doc.rs ---

#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::logic::{DayRangeInput, PreviewResponse, SlotPlanRequest, WeekSlotsResponse};
use crate::materialize::{DaySummary, WeekSummary};
use crate::models::{ExistingSlot, SlotDto};
use crate::submission::{SlotFailure, SlotSuccess, SubmissionResult};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::preview_slots_handler,
        crate::handlers::publish_slots_handler,
        crate::handlers::week_slots_handler
    ),
    components(
        schemas(
            DayRangeInput,
            SlotPlanRequest,
            PreviewResponse,
            WeekSummary,
            DaySummary,
            SlotDto,
            ExistingSlot,
            WeekSlotsResponse,
            SlotSuccess,
            SlotFailure,
            SubmissionResult
        )
    ),
    tags(
        (name = "Planning", description = "Weekly slot planning API")
    ),
    servers(
        (url = "/api", description = "Planning API server")
    )
)]
pub struct PlanningApiDoc;
