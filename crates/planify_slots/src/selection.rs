// --- File: crates/planify_slots/src/selection.rs ---
//! Drag-to-select state machine of the weekly grid.
//!
//! A gesture starts with `pointer_down` on one day column, follows the pointer
//! with `pointer_enter` and commits on `pointer_up`. Gestures never span two
//! columns: moving to another day is ignored, releasing or leaving elsewhere
//! discards the gesture.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use planify_config::SelectionPolicy;
use tracing::{debug, warn};

use crate::error::SlotError;
use crate::materialize::{materialize, materialize_shared};
use crate::models::{BaseRange, ExistingSlot, SlotDto, SlotInterval, TimeRange};
use crate::ranges::DayRangeSet;
use crate::week::{iso_week_start, HalfHourGrid, DAYS_PER_WEEK};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        day: usize,
        start_index: usize,
        hover_index: usize,
    },
}

/// Outcome of a pointer event worth reporting to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionEvent {
    /// A range was folded into the drafts.
    Committed { day: usize, range: TimeRange },
    /// The gesture ended outside its column and was dropped.
    Discarded,
    /// An already persisted slot was clicked.
    EditRequested(ExistingSlot),
}

/// Selection state of one displayed week.
#[derive(Debug, Clone)]
pub struct WeekSelector {
    tz: Tz,
    week_start: NaiveDate,
    grid: HalfHourGrid,
    policy: SelectionPolicy,
    enabled: bool,
    drag: DragState,
    draft: DayRangeSet,
    base: Option<BaseRange>,
    enabled_days: [bool; DAYS_PER_WEEK],
    existing: Vec<ExistingSlot>,
}

const WEEKDAYS_ONLY: [bool; DAYS_PER_WEEK] = [true, true, true, true, true, false, false];

impl WeekSelector {
    pub fn new(
        tz: Tz,
        anchor: NaiveDate,
        grid: HalfHourGrid,
        policy: SelectionPolicy,
        enabled: bool,
    ) -> Self {
        Self {
            tz,
            week_start: iso_week_start(anchor),
            grid,
            policy,
            enabled,
            drag: DragState::Idle,
            draft: DayRangeSet::new(),
            base: None,
            enabled_days: WEEKDAYS_ONLY,
            existing: Vec::new(),
        }
    }

    pub fn week_start(&self) -> NaiveDate {
        self.week_start
    }

    pub fn grid(&self) -> &HalfHourGrid {
        &self.grid
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn draft(&self) -> &DayRangeSet {
        &self.draft
    }

    pub fn base_range(&self) -> Option<BaseRange> {
        self.base
    }

    pub fn enabled_days(&self) -> &[bool; DAYS_PER_WEEK] {
        &self.enabled_days
    }

    pub fn existing(&self) -> &[ExistingSlot] {
        &self.existing
    }

    /// Moves to the week containing `anchor`. Returns `true` when the week
    /// changed, in which case all draft state is dropped.
    pub fn set_week(&mut self, anchor: NaiveDate) -> bool {
        let week_start = iso_week_start(anchor);
        if week_start == self.week_start {
            return false;
        }
        debug!(%week_start, "Displayed week changed");
        self.week_start = week_start;
        self.existing.clear();
        self.reset_draft_state();
        true
    }

    pub fn set_existing(&mut self, existing: Vec<ExistingSlot>) {
        self.existing = existing;
    }

    /// Turns selection on or off; switching off drops a gesture in progress.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.drag = DragState::Idle;
        }
    }

    /// Flips a weekday in or out of the shared window.
    pub fn toggle_day(&mut self, day: usize) -> Result<bool, SlotError> {
        let flag = self
            .enabled_days
            .get_mut(day)
            .ok_or(SlotError::InvalidDay(day))?;
        *flag = !*flag;
        Ok(*flag)
    }

    /// Drops drafts, the shared window and any gesture in progress.
    pub fn reset_draft_state(&mut self) {
        self.drag = DragState::Idle;
        self.draft.clear();
        self.base = None;
    }

    pub fn pointer_down(&mut self, day: usize, index: usize) -> Option<SelectionEvent> {
        if !self.enabled || self.drag != DragState::Idle {
            return None;
        }
        let instant = self.cell_instant(day, index)?;

        if let Some(slot) = self.existing.iter().find(|s| s.covers(instant)) {
            debug!(id = %slot.id, "Existing slot clicked");
            return Some(SelectionEvent::EditRequested(slot.clone()));
        }

        self.drag = DragState::Dragging {
            day,
            start_index: index,
            hover_index: index,
        };
        None
    }

    pub fn pointer_enter(&mut self, day: usize, index: usize) {
        if let DragState::Dragging {
            day: drag_day,
            hover_index,
            ..
        } = &mut self.drag
        {
            if day == *drag_day && index < self.grid.len() {
                *hover_index = index;
            }
        }
    }

    pub fn pointer_up(&mut self, day: usize) -> Option<SelectionEvent> {
        let DragState::Dragging {
            day: drag_day,
            start_index,
            hover_index,
        } = std::mem::take(&mut self.drag)
        else {
            return None;
        };

        if day != drag_day {
            debug!(from = drag_day, to = day, "Cross-day release discarded");
            return Some(SelectionEvent::Discarded);
        }

        let lo = start_index.min(hover_index);
        let hi = start_index.max(hover_index);
        match self.commit(drag_day, lo, hi) {
            Ok(range) => Some(SelectionEvent::Committed {
                day: drag_day,
                range,
            }),
            Err(err) => {
                warn!("Failed to commit selection: {}", err);
                Some(SelectionEvent::Discarded)
            }
        }
    }

    /// The pointer left the column of `day`; a gesture started there is dropped.
    pub fn pointer_leave(&mut self, day: usize) -> Option<SelectionEvent> {
        match self.drag {
            DragState::Dragging { day: drag_day, .. } if drag_day == day => {
                self.drag = DragState::Idle;
                Some(SelectionEvent::Discarded)
            }
            _ => None,
        }
    }

    /// Cell indices `(day, lo, hi)` highlighted by the gesture in progress.
    pub fn preview(&self) -> Option<(usize, usize, usize)> {
        match self.drag {
            DragState::Dragging {
                day,
                start_index,
                hover_index,
            } => Some((
                day,
                start_index.min(hover_index),
                start_index.max(hover_index),
            )),
            DragState::Idle => None,
        }
    }

    /// Draft slots of the displayed week, as the configured policy lays them out.
    pub fn draft_slots(&self, interval: SlotInterval) -> Vec<SlotDto> {
        match self.policy {
            SelectionPolicy::MultiRange => materialize(&self.draft, interval),
            SelectionPolicy::SingleRange => self
                .base
                .map(|base| {
                    materialize_shared(
                        &self.tz,
                        self.week_start,
                        &self.enabled_days,
                        base,
                        interval,
                    )
                })
                .unwrap_or_default(),
        }
    }

    fn cell_instant(&self, day: usize, index: usize) -> Option<DateTime<Utc>> {
        self.grid.slot_time(&self.tz, self.week_start, day, index)
    }

    fn commit(&mut self, day: usize, lo: usize, hi: usize) -> Result<TimeRange, SlotError> {
        let start = self.cell_instant(day, lo).ok_or(SlotError::InvalidDay(day))?;
        let last = self.cell_instant(day, hi).ok_or(SlotError::InvalidDay(day))?;
        let cell = Duration::minutes(HalfHourGrid::CELL_MINUTES);
        let range = TimeRange::new(start, last + cell)?;

        match self.policy {
            SelectionPolicy::MultiRange => self.draft.add_range(day, range)?,
            SelectionPolicy::SingleRange => {
                let from = self.grid.time_of(lo).ok_or(SlotError::InvalidDay(day))?;
                let to = self.grid.time_of(hi).ok_or(SlotError::InvalidDay(day))? + cell;
                self.base = Some(BaseRange::new(from, to)?);
            }
        }
        debug!(day, lo, hi, "Selection committed");
        Ok(range)
    }
}
