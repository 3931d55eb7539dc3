// --- File: crates/planify_slots/src/materialize.rs ---
//! Expansion of draft ranges into discrete slot DTOs.
//!
//! Drafts of one displayed week are materialized, filtered to the anchor week
//! and then replicated onto the following weeks before publishing.

use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::SlotError;
use crate::models::{BaseRange, ExistingSlot, SlotDto, SlotInterval, TimeRange};
use crate::ranges::DayRangeSet;
use crate::week::{
    add_days, iso_week_start, localize, week_window, weekday_index, DAYS_PER_WEEK, DAY_LABELS,
};

/// Splits one range into back-to-back slots of `interval`.
///
/// A trailing remainder shorter than one interval is dropped.
pub fn materialize_range(range: &TimeRange, interval: SlotInterval) -> Vec<SlotDto> {
    let step = interval.duration();
    let mut slots = Vec::new();
    let mut cur = range.start();
    while cur + step <= range.end() {
        slots.push(SlotDto::active(cur, cur + step));
        cur += step;
    }
    slots
}

/// Materializes every day of `ranges`, Monday first and time-ascending within a day.
pub fn materialize(ranges: &DayRangeSet, interval: SlotInterval) -> Vec<SlotDto> {
    ranges
        .iter()
        .flat_map(|(_, day_ranges)| day_ranges.iter())
        .flat_map(|range| materialize_range(range, interval))
        .collect()
}

/// Stamps one time-of-day window onto each enabled weekday of the week
/// starting on `week_start`, then materializes it.
pub fn materialize_shared(
    tz: &Tz,
    week_start: NaiveDate,
    enabled_days: &[bool; DAYS_PER_WEEK],
    base: BaseRange,
    interval: SlotInterval,
) -> Vec<SlotDto> {
    let mut slots = Vec::new();
    for (day, _) in enabled_days.iter().enumerate().filter(|(_, on)| **on) {
        let date = week_start + Duration::days(day as i64);
        let start = localize(tz, date.and_time(base.start())).with_timezone(&Utc);
        let end = localize(tz, date.and_time(base.end())).with_timezone(&Utc);
        // A window swallowed by a DST jump collapses to nothing for that day
        if let Ok(range) = TimeRange::new(start, end) {
            slots.extend(materialize_range(&range, interval));
        }
    }
    slots
}

/// Keeps the slots whose start lies inside the anchor week window.
pub fn filter_to_week(slots: &[SlotDto], anchor: NaiveDate, tz: &Tz) -> Vec<SlotDto> {
    let (start, end) = week_window(anchor, tz);
    slots
        .iter()
        .filter(|slot| slot.start_time >= start && slot.start_time < end)
        .cloned()
        .collect()
}

/// Repeats a week of slots on the following weeks.
///
/// Offsets are whole local calendar weeks, so the time of day survives DST
/// changes. `week_count < 1` returns the input unchanged. Callers bound
/// `week_count`; a shift past the supported calendar fails.
pub fn replicate_across_weeks(
    slots: &[SlotDto],
    week_count: i32,
    tz: &Tz,
) -> Result<Vec<SlotDto>, SlotError> {
    if week_count < 1 {
        return Ok(slots.to_vec());
    }
    let mut out = Vec::new();
    for week in 0..week_count {
        let offset = 7 * i64::from(week);
        for slot in slots {
            out.push(SlotDto {
                start_time: shift(slot.start_time, offset, tz)?,
                end_time: shift(slot.end_time, offset, tz)?,
                is_active: slot.is_active,
            });
        }
    }
    Ok(out)
}

fn shift(instant: DateTime<Utc>, days: i64, tz: &Tz) -> Result<DateTime<Utc>, SlotError> {
    Ok(add_days(&instant.with_timezone(tz), days)?.with_timezone(&Utc))
}

/// Remote slots worth displaying for the anchor week: available, not yet
/// ended at `now`, and starting inside the week.
pub fn filter_existing_to_week(
    all: &[ExistingSlot],
    anchor: NaiveDate,
    tz: &Tz,
    now: DateTime<Utc>,
) -> Vec<ExistingSlot> {
    let (start, end) = week_window(anchor, tz);
    all.iter()
        .filter(|slot| {
            slot.is_available()
                && slot.end_time >= now
                && slot.start_time >= start
                && slot.start_time < end
        })
        .cloned()
        .collect()
}

/// Remote slots that are still active but already over.
pub fn outdated_slots(all: &[ExistingSlot], now: DateTime<Utc>) -> Vec<&ExistingSlot> {
    all.iter()
        .filter(|slot| slot.is_available() && slot.end_time < now && !slot.id.is_empty())
        .collect()
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    #[cfg_attr(feature = "openapi", schema(example = "Mon"))]
    pub day: String,
    /// `HHhMM → HHhMM`, time-ordered.
    pub ranges: Vec<String>,
}

/// Human-readable digest of one week of drafts, Monday to Sunday.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekSummary {
    pub days: Vec<DaySummary>,
}

impl WeekSummary {
    pub fn is_empty(&self) -> bool {
        self.days.iter().all(|d| d.ranges.is_empty())
    }
}

/// Summarizes the earliest week present in `slots`; later weeks are
/// replicas and are left out.
pub fn summarize_week(slots: &[SlotDto], tz: &Tz) -> WeekSummary {
    let mut groups: [Vec<&SlotDto>; DAYS_PER_WEEK] = Default::default();

    if let Some(first) = slots.iter().map(|s| s.start_time).min() {
        let anchor = iso_week_start(first.with_timezone(tz).date_naive());
        let (week_start, week_end) = week_window(anchor, tz);
        for slot in slots
            .iter()
            .filter(|s| s.start_time >= week_start && s.start_time < week_end)
        {
            let day = weekday_index(slot.start_time.with_timezone(tz).date_naive());
            groups[day].push(slot);
        }
    }

    let days = groups
        .iter_mut()
        .enumerate()
        .map(|(day, group)| {
            group.sort_by_key(|s| s.start_time);
            DaySummary {
                day: DAY_LABELS[day].to_string(),
                ranges: group
                    .iter()
                    .map(|s| {
                        format!(
                            "{} → {}",
                            format_hm(s.start_time, tz),
                            format_hm(s.end_time, tz)
                        )
                    })
                    .collect(),
            }
        })
        .collect();

    WeekSummary { days }
}

fn format_hm(instant: DateTime<Utc>, tz: &Tz) -> String {
    let local = instant.with_timezone(tz);
    format!("{:02}h{:02}", local.hour(), local.minute())
}
