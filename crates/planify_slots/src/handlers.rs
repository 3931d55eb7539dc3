// --- File: crates/planify_slots/src/handlers.rs ---
use axum::{
    extract::{Query, State},
    http::{header::AUTHORIZATION, HeaderMap},
    response::Json,
};
use chrono::Utc;
use planify_common::{log_result, unauthorized, PlanifyError};
use planify_config::AppConfig;
use std::sync::Arc;
use tracing::{info, warn};

use crate::logic::{
    plan_slots, preview, PreviewResponse, SlotPlanRequest, WeekQuery, WeekSlotsResponse,
};
use crate::materialize::filter_existing_to_week;
use crate::models::{Role, SessionContext};
use crate::planner::PlannerSettings;
use crate::service::SlotApiFactory;
use crate::submission::{BatchSubmitter, SubmissionResult};
use crate::week::iso_week_start;

/// Header carrying the caller's role label (`ADMIN` for administrators).
pub const ROLE_HEADER: &str = "x-user-role";

// Shared state of the planning routes
#[derive(Clone)]
pub struct PlanningState {
    pub config: Arc<AppConfig>,
    pub api_factory: Arc<dyn SlotApiFactory>,
}

impl PlanningState {
    fn settings(&self) -> Result<PlannerSettings, PlanifyError> {
        if !self.config.use_planning {
            return Err(PlanifyError::UnavailableError(
                "Planning service is disabled.".to_string(),
            ));
        }
        let planning = self.config.planning.as_ref().ok_or_else(|| {
            warn!("Planning configuration missing in AppConfig.");
            PlanifyError::ConfigError("planning section missing".to_string())
        })?;
        PlannerSettings::try_from(planning)
            .map_err(|err| PlanifyError::ConfigError(err.to_string()))
    }
}

/// Reads the caller's session from the request headers.
pub fn session_from_headers(headers: &HeaderMap) -> SessionContext {
    let role = headers
        .get(ROLE_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(Role::from_label)
        .unwrap_or(Role::Other);
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty());
    SessionContext::new(role, token)
}

/// Preview the slots a set of dragged ranges would produce.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/slots/preview",
    request_body = SlotPlanRequest,
    responses(
        (status = 200, description = "Materialized slots and weekly summary", body = PreviewResponse),
        (status = 400, description = "Invalid day, time, range or interval"),
        (status = 503, description = "Planning disabled")
    ),
    tag = "Planning"
))]
pub async fn preview_slots_handler(
    State(state): State<Arc<PlanningState>>,
    Json(request): Json<SlotPlanRequest>,
) -> Result<Json<PreviewResponse>, PlanifyError> {
    let settings = state.settings()?;
    let response = preview(&settings, &request)?;
    Ok(Json(response))
}

/// Publish the planned slots to the planning API. Administrators only.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/slots/publish",
    request_body = SlotPlanRequest,
    responses(
        (status = 200, description = "Per-slot outcome of the batch", body = SubmissionResult),
        (status = 400, description = "Invalid day, time, range or interval"),
        (status = 401, description = "Missing bearer token"),
        (status = 403, description = "Caller is not an administrator"),
        (status = 503, description = "Planning disabled")
    ),
    security(("bearer" = [])),
    tag = "Planning"
))]
pub async fn publish_slots_handler(
    State(state): State<Arc<PlanningState>>,
    headers: HeaderMap,
    Json(request): Json<SlotPlanRequest>,
) -> Result<Json<SubmissionResult>, PlanifyError> {
    let settings = state.settings()?;
    let session = session_from_headers(&headers);
    if session.token.is_none() {
        return Err(unauthorized("Bearer token required."));
    }
    if !session.is_admin() {
        return Err(PlanifyError::ForbiddenError(
            "Publishing slots requires an administrator.".to_string(),
        ));
    }

    let slots = plan_slots(&settings, &request)?;
    info!(
        count = slots.len(),
        anchor = %request.anchor_date,
        "Publishing planned slots"
    );
    let api = state.api_factory.for_session(&session);
    let result = BatchSubmitter::new(api, settings.submission)
        .submit(&slots)
        .await;
    Ok(Json(result))
}

/// Remote slots of the week containing `anchorDate`.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/slots/week",
    params(WeekQuery),
    responses(
        (status = 200, description = "Active, upcoming slots of the week", body = WeekSlotsResponse),
        (status = 502, description = "Planning API error"),
        (status = 503, description = "Planning disabled")
    ),
    tag = "Planning"
))]
pub async fn week_slots_handler(
    State(state): State<Arc<PlanningState>>,
    headers: HeaderMap,
    Query(query): Query<WeekQuery>,
) -> Result<Json<WeekSlotsResponse>, PlanifyError> {
    let settings = state.settings()?;
    let session = session_from_headers(&headers);
    let api = state.api_factory.for_session(&session);

    let all = log_result(
        api.list_slots().await,
        "Fetched remote slots",
        "Failed to list remote slots",
    )?;
    let slots = filter_existing_to_week(&all, query.anchor_date, &settings.tz, Utc::now());
    Ok(Json(WeekSlotsResponse {
        week_start: iso_week_start(query.anchor_date),
        slots,
    }))
}
