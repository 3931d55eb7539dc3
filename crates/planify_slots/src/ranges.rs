// --- File: crates/planify_slots/src/ranges.rs ---
//! Per-day sets of disjoint draft ranges.

use tracing::debug;

use crate::error::SlotError;
use crate::models::TimeRange;
use crate::week::DAYS_PER_WEEK;

/// Folds `candidate` into `existing` and returns the minimal sorted cover.
///
/// Overlapping and touching ranges (`next.start <= current.end`) are
/// coalesced, so the output never contains two ranges sharing an instant.
pub fn merge_ranges(existing: &[TimeRange], candidate: TimeRange) -> Vec<TimeRange> {
    let mut all: Vec<TimeRange> = existing.to_vec();
    all.push(candidate);
    coalesce(all)
}

/// Sorts and coalesces an arbitrary list of ranges.
pub fn coalesce(mut ranges: Vec<TimeRange>) -> Vec<TimeRange> {
    ranges.sort_by_key(|r| r.start());

    let mut merged: Vec<TimeRange> = Vec::with_capacity(ranges.len());
    let mut iter = ranges.into_iter();
    let Some(mut current) = iter.next() else {
        return merged;
    };
    for next in iter {
        if next.start() <= current.end() {
            current.extend_to(next.end());
        } else {
            merged.push(current);
            current = next;
        }
    }
    merged.push(current);
    merged
}

/// Draft ranges of one displayed week, indexed Monday (0) to Sunday (6).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayRangeSet {
    days: [Vec<TimeRange>; DAYS_PER_WEEK],
}

impl DayRangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_range(&mut self, day: usize, range: TimeRange) -> Result<(), SlotError> {
        let ranges = self.days.get_mut(day).ok_or(SlotError::InvalidDay(day))?;
        *ranges = merge_ranges(ranges, range);
        debug!(day, count = ranges.len(), "Merged draft range");
        Ok(())
    }

    /// Ranges of `day`, sorted; empty for an out-of-range day.
    pub fn ranges(&self, day: usize) -> &[TimeRange] {
        self.days.get(day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `(day, ranges)` pairs, Monday first.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[TimeRange])> {
        self.days
            .iter()
            .enumerate()
            .map(|(day, ranges)| (day, ranges.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.days.iter().all(Vec::is_empty)
    }

    /// Total number of ranges over all days.
    pub fn len(&self) -> usize {
        self.days.iter().map(Vec::len).sum()
    }

    pub fn clear(&mut self) {
        self.days.iter_mut().for_each(Vec::clear);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn range(start_h: u32, start_m: u32, end_h: u32, end_m: u32) -> TimeRange {
        TimeRange::new(
            Utc.with_ymd_and_hms(2024, 1, 1, start_h, start_m, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 1, end_h, end_m, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_coalesce_empty_input() {
        assert!(coalesce(Vec::new()).is_empty());
    }

    #[test]
    fn test_contiguous_ranges_are_joined() {
        let merged = merge_ranges(&[range(10, 0, 10, 30)], range(10, 30, 11, 0));
        assert_eq!(merged, vec![range(10, 0, 11, 0)]);
    }

    #[test]
    fn test_covered_range_is_absorbed() {
        let existing = vec![range(9, 0, 12, 0)];
        assert_eq!(merge_ranges(&existing, range(10, 0, 10, 30)), existing);
    }

    #[test]
    fn test_gap_keeps_ranges_apart() {
        let merged = merge_ranges(&[range(14, 0, 15, 0)], range(9, 0, 10, 0));
        assert_eq!(merged, vec![range(9, 0, 10, 0), range(14, 0, 15, 0)]);
    }

    #[test]
    fn test_bridge_joins_three_ranges() {
        let existing = vec![range(9, 0, 10, 0), range(11, 0, 12, 0)];
        let merged = merge_ranges(&existing, range(9, 30, 11, 30));
        assert_eq!(merged, vec![range(9, 0, 12, 0)]);
    }

    #[test]
    fn test_day_range_set_rejects_bad_day() {
        let mut set = DayRangeSet::new();
        assert_eq!(
            set.add_range(7, range(9, 0, 10, 0)),
            Err(SlotError::InvalidDay(7))
        );
        assert!(set.is_empty());
        assert!(set.ranges(9).is_empty());
    }

    #[test]
    fn test_day_range_set_keeps_days_separate() {
        let mut set = DayRangeSet::new();
        set.add_range(0, range(9, 0, 10, 0)).unwrap();
        set.add_range(2, range(9, 0, 10, 0)).unwrap();
        set.add_range(0, range(10, 0, 11, 0)).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.ranges(0), &[range(9, 0, 11, 0)]);
        assert_eq!(set.ranges(2), &[range(9, 0, 10, 0)]);
        set.clear();
        assert!(set.is_empty());
    }
}
