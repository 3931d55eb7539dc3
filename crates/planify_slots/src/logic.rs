// --- File: crates/planify_slots/src/logic.rs ---
//! Request and response types of the HTTP surface, and the stateless week
//! planning they drive.

use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SlotError;
use crate::materialize::{
    filter_to_week, materialize, replicate_across_weeks, summarize_week, WeekSummary,
};
use crate::models::{ExistingSlot, SlotDto, SlotInterval, TimeRange};
use crate::planner::{check_repeat_weeks, PlannerSettings};
use crate::ranges::DayRangeSet;
use crate::week::{iso_week_start, localize};

/// One dragged range, as wall-clock times of a weekday.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DayRangeInput {
    /// 0 = Monday .. 6 = Sunday
    #[cfg_attr(feature = "openapi", schema(example = 0))]
    pub day: usize,
    #[cfg_attr(feature = "openapi", schema(example = "09:00"))]
    pub start: String,
    #[cfg_attr(feature = "openapi", schema(example = "12:00"))]
    pub end: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotPlanRequest {
    #[cfg_attr(feature = "openapi", schema(example = "2024-01-03", value_type = String, format = Date))]
    pub anchor_date: NaiveDate,
    #[serde(default)]
    pub ranges: Vec<DayRangeInput>,
    /// 15, 30 or 60; the configured interval when absent.
    #[serde(default)]
    pub interval_minutes: Option<u32>,
    #[serde(default = "default_repeat_weeks")]
    pub repeat_weeks: i32,
}

fn default_repeat_weeks() -> i32 {
    1
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize)]
pub struct PreviewResponse {
    pub slots: Vec<SlotDto>,
    pub summary: WeekSummary,
}

#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekQuery {
    #[cfg_attr(feature = "openapi", param(value_type = String, format = Date, example = "2024-01-03"))]
    pub anchor_date: NaiveDate,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekSlotsResponse {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = Date))]
    pub week_start: NaiveDate,
    pub slots: Vec<ExistingSlot>,
}

fn parse_hm(raw: &str) -> Result<NaiveTime, SlotError> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|err| SlotError::TimeParse(format!("{raw:?}: {err}")))
}

/// Merges the requested ranges of the anchor week into a [`DayRangeSet`].
pub fn collect_ranges(
    settings: &PlannerSettings,
    request: &SlotPlanRequest,
) -> Result<DayRangeSet, SlotError> {
    let week_start = iso_week_start(request.anchor_date);
    let mut set = DayRangeSet::new();
    for input in &request.ranges {
        if input.day > 6 {
            return Err(SlotError::InvalidDay(input.day));
        }
        let date = week_start + Duration::days(input.day as i64);
        let start = localize(&settings.tz, date.and_time(parse_hm(&input.start)?));
        let end = localize(&settings.tz, date.and_time(parse_hm(&input.end)?));
        let range = TimeRange::new(start.with_timezone(&Utc), end.with_timezone(&Utc))?;
        set.add_range(input.day, range)?;
    }
    Ok(set)
}

/// Slots to publish for `request`: merged, materialized, kept to the anchor
/// week, then replicated.
pub fn plan_slots(
    settings: &PlannerSettings,
    request: &SlotPlanRequest,
) -> Result<Vec<SlotDto>, SlotError> {
    let interval = match request.interval_minutes {
        Some(minutes) => SlotInterval::try_from(minutes)?,
        None => settings.interval,
    };
    check_repeat_weeks(request.repeat_weeks, settings.max_repeat_weeks)?;
    let ranges = collect_ranges(settings, request)?;
    let week = filter_to_week(
        &materialize(&ranges, interval),
        request.anchor_date,
        &settings.tz,
    );
    replicate_across_weeks(&week, request.repeat_weeks, &settings.tz)
}

pub fn preview(
    settings: &PlannerSettings,
    request: &SlotPlanRequest,
) -> Result<PreviewResponse, SlotError> {
    let slots = plan_slots(settings, request)?;
    let summary = summarize_week(&slots, &settings.tz);
    Ok(PreviewResponse { slots, summary })
}
