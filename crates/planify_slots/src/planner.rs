// --- File: crates/planify_slots/src/planner.rs ---
//! One editing session over the weekly planning grid.
//!
//! The planner ties the pieces together: it owns the selection state of the
//! displayed week, keeps the remote slots of that week in view, publishes the
//! drafts and lets administrators edit or delete persisted slots.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use planify_config::{PlanningConfig, SelectionPolicy};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{PlannerError, SlotError};
use crate::materialize::{
    filter_existing_to_week, filter_to_week, outdated_slots, replicate_across_weeks,
    summarize_week, WeekSummary,
};
use crate::models::{ExistingSlot, SessionContext, SlotDto, SlotInterval, TimeRange};
use crate::selection::{SelectionEvent, WeekSelector};
use crate::service::SlotApi;
use crate::submission::{BatchSubmitter, SubmissionOptions, SubmissionResult};
use crate::week::{parse_time_zone, HalfHourGrid};

/// Planner settings resolved from [`PlanningConfig`].
#[derive(Debug, Clone)]
pub struct PlannerSettings {
    pub tz: Tz,
    pub grid: HalfHourGrid,
    pub interval: SlotInterval,
    pub policy: SelectionPolicy,
    pub submission: SubmissionOptions,
    /// Pause between the end of a batch and the refresh of the week.
    pub settle_delay: Duration,
    pub max_repeat_weeks: i32,
}

/// Rejects a repeat count above `max`.
pub fn check_repeat_weeks(requested: i32, max: i32) -> Result<(), SlotError> {
    if requested > max {
        return Err(SlotError::TooManyWeeks { requested, max });
    }
    Ok(())
}

impl TryFrom<&PlanningConfig> for PlannerSettings {
    type Error = SlotError;

    fn try_from(config: &PlanningConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            tz: parse_time_zone(&config.time_zone)?,
            grid: HalfHourGrid::new(config.grid_start_hour, config.grid_end_hour)?,
            interval: SlotInterval::try_from(config.interval_minutes)?,
            policy: config.selection_policy,
            submission: SubmissionOptions::from(&config.submission),
            settle_delay: Duration::from_millis(config.submission.settle_delay_ms),
            max_repeat_weeks: i32::try_from(config.max_repeat_weeks).unwrap_or(i32::MAX),
        })
    }
}

pub struct SlotPlanner {
    session: SessionContext,
    api: Arc<dyn SlotApi>,
    settings: PlannerSettings,
    anchor: NaiveDate,
    selector: WeekSelector,
    repeat_weeks: i32,
    existing: Vec<ExistingSlot>,
    cleaned: bool,
    edit: Option<ExistingSlot>,
    last_result: Option<SubmissionResult>,
    clock: fn() -> DateTime<Utc>,
}

impl SlotPlanner {
    pub fn new(
        session: SessionContext,
        api: Arc<dyn SlotApi>,
        settings: PlannerSettings,
        anchor: NaiveDate,
    ) -> Self {
        let selector = WeekSelector::new(
            settings.tz,
            anchor,
            settings.grid.clone(),
            settings.policy,
            session.is_admin(),
        );
        Self {
            session,
            api,
            settings,
            anchor,
            selector,
            repeat_weeks: 1,
            existing: Vec::new(),
            cleaned: false,
            edit: None,
            last_result: None,
            clock: Utc::now,
        }
    }

    /// Replaces the wall clock used to decide which slots are over.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn settings(&self) -> &PlannerSettings {
        &self.settings
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn selector(&self) -> &WeekSelector {
        &self.selector
    }

    /// Remote slots of the displayed week, as of the last refresh.
    pub fn existing(&self) -> &[ExistingSlot] {
        &self.existing
    }

    pub fn edit(&self) -> Option<&ExistingSlot> {
        self.edit.as_ref()
    }

    pub fn last_result(&self) -> Option<&SubmissionResult> {
        self.last_result.as_ref()
    }

    pub fn repeat_weeks(&self) -> i32 {
        self.repeat_weeks
    }

    /// Number of weeks the drafts are published over, at most
    /// [`PlannerSettings::max_repeat_weeks`].
    pub fn set_repeat_weeks(&mut self, weeks: i32) -> Result<(), PlannerError> {
        check_repeat_weeks(weeks, self.settings.max_repeat_weeks)?;
        self.repeat_weeks = weeks;
        Ok(())
    }

    pub fn set_interval(&mut self, interval: SlotInterval) {
        self.settings.interval = interval;
    }

    /// Shows the week containing `anchor`. Moving to another week drops the
    /// drafts, the pending edit and the last result. Call
    /// [`refresh_week`](Self::refresh_week) afterwards to load its slots.
    pub fn set_anchor(&mut self, anchor: NaiveDate) -> bool {
        self.anchor = anchor;
        let changed = self.selector.set_week(anchor);
        if changed {
            self.existing.clear();
            self.edit = None;
            self.last_result = None;
        }
        changed
    }

    pub fn pointer_down(&mut self, day: usize, index: usize) -> Option<SelectionEvent> {
        let event = self.selector.pointer_down(day, index);
        if let Some(SelectionEvent::EditRequested(slot)) = &event {
            self.edit = Some(slot.clone());
        }
        event
    }

    pub fn pointer_enter(&mut self, day: usize, index: usize) {
        self.selector.pointer_enter(day, index);
    }

    pub fn pointer_up(&mut self, day: usize) -> Option<SelectionEvent> {
        self.selector.pointer_up(day)
    }

    pub fn pointer_leave(&mut self, day: usize) -> Option<SelectionEvent> {
        self.selector.pointer_leave(day)
    }

    pub fn toggle_day(&mut self, day: usize) -> Result<bool, PlannerError> {
        Ok(self.selector.toggle_day(day)?)
    }

    pub fn reset_draft_state(&mut self) {
        self.selector.reset_draft_state();
    }

    /// Reloads the remote slots and keeps those of the displayed week.
    ///
    /// The first refresh of an administrator session also deletes slots that
    /// are still active but already over. Those deletions are best effort.
    pub async fn refresh_week(&mut self) -> Result<&[ExistingSlot], PlannerError> {
        let now = (self.clock)();
        let mut all = self.api.list_slots().await.map_err(PlannerError::Refresh)?;

        if self.session.is_admin() && !self.cleaned {
            let outdated: Vec<String> = outdated_slots(&all, now)
                .into_iter()
                .map(|slot| slot.id.clone())
                .collect();
            if !outdated.is_empty() {
                info!(count = outdated.len(), "Removing outdated slots");
                for id in &outdated {
                    if let Err(err) = self.api.delete_slot(id).await {
                        warn!(%id, "Failed to delete outdated slot: {}", err);
                    }
                }
                all = self.api.list_slots().await.map_err(PlannerError::Refresh)?;
            }
            self.cleaned = true;
        }

        self.existing = filter_existing_to_week(&all, self.anchor, &self.settings.tz, now);
        self.selector.set_existing(self.existing.clone());
        debug!(count = self.existing.len(), anchor = %self.anchor, "Week refreshed");
        Ok(&self.existing)
    }

    /// Drafts of the displayed week, replicated over `repeat_weeks` weeks.
    pub fn pending_slots(&self) -> Result<Vec<SlotDto>, SlotError> {
        let week = self.week_drafts();
        replicate_across_weeks(&week, self.repeat_weeks, &self.settings.tz)
    }

    pub fn summary(&self) -> WeekSummary {
        summarize_week(&self.week_drafts(), &self.settings.tz)
    }

    fn week_drafts(&self) -> Vec<SlotDto> {
        let drafts = self.selector.draft_slots(self.settings.interval);
        filter_to_week(&drafts, self.anchor, &self.settings.tz)
    }

    /// Publishes the pending slots.
    ///
    /// Per-slot failures end up in the returned result. Once the batch is
    /// done the week is refreshed and the drafts are cleared, whatever the
    /// outcome; only a failing refresh is reported as an error. A dry run
    /// leaves both the week and the drafts untouched.
    pub async fn submit(&mut self) -> Result<SubmissionResult, PlannerError> {
        if !self.session.is_admin() {
            return Err(PlannerError::Forbidden);
        }

        let slots = self.pending_slots()?;
        if slots.is_empty() {
            let result = SubmissionResult::default();
            self.last_result = Some(result.clone());
            return Ok(result);
        }

        info!(count = slots.len(), weeks = self.repeat_weeks, "Publishing slots");
        let result = BatchSubmitter::new(self.api.clone(), self.settings.submission)
            .submit(&slots)
            .await;
        self.last_result = Some(result.clone());
        if result.dry_run {
            // Nothing reached the API; drafts stay
            return Ok(result);
        }

        tokio::time::sleep(self.settings.settle_delay).await;
        let refreshed = self.refresh_week().await.map(|_| ());
        self.selector.reset_draft_state();
        refreshed?;

        Ok(result)
    }

    /// Opens the edit flow for a persisted slot.
    pub fn request_edit(&mut self, slot: ExistingSlot) -> Result<(), PlannerError> {
        if !self.session.is_admin() {
            return Err(PlannerError::Forbidden);
        }
        self.edit = Some(slot);
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    /// Moves the slot under edit to `[start, end)` and re-activates it.
    pub async fn save_edit(
        &mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Value, PlannerError> {
        let id = self.editing_id()?;
        let range = TimeRange::new(start, end)?;
        let dto = SlotDto::active(range.start(), range.end());

        let response = self.api.update_slot(&id, &dto).await?;
        info!(%id, "Slot updated");
        self.refresh_week().await?;
        self.edit = None;
        Ok(response)
    }

    pub async fn delete_edit(&mut self) -> Result<(), PlannerError> {
        let id = self.editing_id()?;
        self.api.delete_slot(&id).await?;
        info!(%id, "Slot deleted");
        self.refresh_week().await?;
        self.edit = None;
        Ok(())
    }

    fn editing_id(&self) -> Result<String, PlannerError> {
        if !self.session.is_admin() {
            return Err(PlannerError::Forbidden);
        }
        self.edit
            .as_ref()
            .map(|slot| slot.id.clone())
            .ok_or(PlannerError::NoEditInProgress)
    }
}
