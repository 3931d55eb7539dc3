// --- File: crates/planify_slots/src/calendar.rs ---
//! Month view used to pick the anchor date.

use chrono::{Datelike, Duration, Month, NaiveDate};
use serde::Serialize;

use crate::error::SlotError;
use crate::week::{iso_week_start, DAYS_PER_WEEK};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarCell {
    pub date: NaiveDate,
    /// `false` for the leading and trailing days of adjacent months.
    pub in_month: bool,
}

/// A displayed month, laid out in Monday-first rows of seven days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCalendar {
    year: i32,
    month: u32,
}

impl MonthCalendar {
    pub fn new(year: i32, month: u32) -> Result<Self, SlotError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|_| Self { year, month })
            .ok_or_else(|| SlotError::TimeParse(format!("no such month: {year}-{month:02}")))
    }

    /// The month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    fn first_day(&self) -> NaiveDate {
        // year/month are validated on construction
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    fn days_in_month(&self) -> u32 {
        let next = self.next().first_day();
        (next - self.first_day()).num_days() as u32
    }

    /// Whole weeks covering the month: five or six rows, occasionally four.
    pub fn cells(&self) -> Vec<CalendarCell> {
        let first = self.first_day();
        let grid_start = iso_week_start(first);
        let leading = (first - grid_start).num_days() as usize;
        let used = leading + self.days_in_month() as usize;
        let rows = used.div_ceil(DAYS_PER_WEEK);

        (0..rows * DAYS_PER_WEEK)
            .map(|offset| {
                let date = grid_start + Duration::days(offset as i64);
                CalendarCell {
                    date,
                    in_month: date.month() == self.month && date.year() == self.year,
                }
            })
            .collect()
    }

    /// Date of the clicked cell, `None` past the last row.
    pub fn cell_date(&self, index: usize) -> Option<NaiveDate> {
        self.cells().get(index).map(|cell| cell.date)
    }

    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// `"January 2024"`.
    pub fn label(&self) -> String {
        let name = u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name())
            .unwrap_or("?");
        format!("{} {}", name, self.year)
    }
}
