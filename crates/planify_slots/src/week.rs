// --- File: crates/planify_slots/src/week.rs ---
//! Calendar arithmetic for the weekly planning grid.
//!
//! Weeks start on Monday (day index 0) and end on Sunday (day index 6). Local
//! wall-clock times are resolved in the planner's time zone and converted to
//! UTC instants at the edges.

use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use chrono_tz::Tz;
use std::str::FromStr;

use crate::error::SlotError;

pub const DAYS_PER_WEEK: usize = 7;

/// Short English labels, Monday first.
pub const DAY_LABELS: [&str; DAYS_PER_WEEK] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Parses an IANA time zone name such as `Europe/Paris`.
pub fn parse_time_zone(name: &str) -> Result<Tz, SlotError> {
    Tz::from_str(name.trim()).map_err(|_| SlotError::InvalidTimeZone(name.to_string()))
}

/// Day-of-week index with Monday = 0 .. Sunday = 6.
pub fn weekday_index(date: NaiveDate) -> usize {
    date.weekday().num_days_from_monday() as usize
}

/// The Monday of the ISO week containing `date`.
pub fn iso_week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(weekday_index(date) as i64)
}

/// Resolves a local wall-clock time to an instant.
///
/// Ambiguous times (DST fall-back) take the earlier instant; times inside a
/// DST gap move forward to the first valid local time.
pub fn localize<Z: TimeZone>(tz: &Z, naive: NaiveDateTime) -> DateTime<Z> {
    let mut candidate = naive;
    for _ in 0..8 {
        match tz.from_local_datetime(&candidate) {
            LocalResult::Single(dt) => return dt,
            LocalResult::Ambiguous(earliest, _) => return earliest,
            LocalResult::None => candidate += Duration::minutes(15),
        }
    }
    tz.from_utc_datetime(&naive)
}

/// Local midnight of `date`.
pub fn local_midnight(date: NaiveDate, tz: &Tz) -> DateTime<Tz> {
    localize(tz, date.and_time(NaiveTime::default()))
}

/// Offsets `datetime` by `days` calendar days in its own time zone, keeping
/// the local time of day. Fails when the result leaves the supported calendar.
pub fn add_days<Z: TimeZone>(
    datetime: &DateTime<Z>,
    days: i64,
) -> Result<DateTime<Z>, SlotError> {
    let naive = Duration::try_days(days)
        .and_then(|offset| datetime.naive_local().checked_add_signed(offset))
        .ok_or(SlotError::DateOutOfRange { days })?;
    Ok(localize(&datetime.timezone(), naive))
}

/// Monday 00:00 (local) of the week containing `anchor`.
pub fn week_start_instant(anchor: NaiveDate, tz: &Tz) -> DateTime<Tz> {
    local_midnight(iso_week_start(anchor), tz)
}

/// Half-open `[Monday 00:00, next Monday 00:00)` window of the anchor week, in UTC.
pub fn week_window(anchor: NaiveDate, tz: &Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let monday = iso_week_start(anchor);
    let start = local_midnight(monday, tz);
    let end = local_midnight(monday + Duration::days(DAYS_PER_WEEK as i64), tz);
    (start.with_timezone(&Utc), end.with_timezone(&Utc))
}

/// One row of the selection grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub hour: u32,
    pub is_half: bool,
}

impl GridCell {
    pub fn minute(&self) -> u32 {
        if self.is_half {
            30
        } else {
            0
        }
    }

    pub fn time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour, self.minute(), 0).unwrap_or(NaiveTime::default())
    }

    pub fn label(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute())
    }
}

/// Cells `start:00, start:30, ..., end:00`; no `end:30` cell.
pub fn build_half_hour_grid(start_hour: u32, end_hour: u32) -> Vec<GridCell> {
    let mut cells = Vec::new();
    for hour in start_hour..=end_hour {
        cells.push(GridCell {
            hour,
            is_half: false,
        });
        if hour < end_hour {
            cells.push(GridCell {
                hour,
                is_half: true,
            });
        }
    }
    cells
}

/// The half-hour grid of one day column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HalfHourGrid {
    start_hour: u32,
    end_hour: u32,
    cells: Vec<GridCell>,
}

impl HalfHourGrid {
    pub const CELL_MINUTES: i64 = 30;

    pub fn new(start_hour: u32, end_hour: u32) -> Result<Self, SlotError> {
        if start_hour > end_hour || end_hour > 23 {
            return Err(SlotError::InvalidGrid {
                start_hour,
                end_hour,
            });
        }
        Ok(Self {
            start_hour,
            end_hour,
            cells: build_half_hour_grid(start_hour, end_hour),
        })
    }

    pub fn start_hour(&self) -> u32 {
        self.start_hour
    }

    pub fn end_hour(&self) -> u32 {
        self.end_hour
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Wall-clock time of a cell: `start_hour + index / 2`, `(index % 2) * 30`.
    pub fn time_of(&self, index: usize) -> Option<NaiveTime> {
        if index >= self.cells.len() {
            return None;
        }
        let hour = self.start_hour + (index / 2) as u32;
        let minute = (index % 2) as u32 * 30;
        NaiveTime::from_hms_opt(hour, minute, 0)
    }

    /// Instant at which cell `index` of day `day` begins, for the week starting on `week_start`.
    pub fn slot_time(
        &self,
        tz: &Tz,
        week_start: NaiveDate,
        day: usize,
        index: usize,
    ) -> Option<DateTime<Utc>> {
        if day >= DAYS_PER_WEEK {
            return None;
        }
        let time = self.time_of(index)?;
        let date = week_start + Duration::days(day as i64);
        Some(localize(tz, date.and_time(time)).with_timezone(&Utc))
    }
}
