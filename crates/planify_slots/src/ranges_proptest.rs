#[cfg(test)]
mod tests {
    use crate::models::TimeRange;
    use crate::ranges::{coalesce, merge_ranges, DayRangeSet};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use proptest::prelude::*;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    // Ranges on a half-hour lattice inside one day, so touching ranges are common
    fn arb_range() -> impl Strategy<Value = TimeRange> {
        (0..47i64, 1..8i64).prop_map(|(start_cell, cells)| {
            let start = base() + Duration::minutes(start_cell * 30);
            let end = start + Duration::minutes(cells * 30);
            TimeRange::new(start, end).expect("non-empty range")
        })
    }

    fn fold(ranges: &[TimeRange]) -> Vec<TimeRange> {
        ranges
            .iter()
            .fold(Vec::new(), |acc, range| merge_ranges(&acc, *range))
    }

    fn covers(ranges: &[TimeRange], instant: DateTime<Utc>) -> bool {
        ranges.iter().any(|r| r.contains(instant))
    }

    proptest! {
        // No two ranges overlap or touch after any sequence of merges
        #[test]
        fn test_merged_ranges_are_disjoint(ranges in prop::collection::vec(arb_range(), 0..20)) {
            let merged = fold(&ranges);
            for pair in merged.windows(2) {
                prop_assert!(pair[0].end() < pair[1].start(), "{:?} touches {:?}", pair[0], pair[1]);
            }
        }

        // Insertion order never changes the final cover
        #[test]
        fn test_merge_is_order_independent(
            ranges in prop::collection::vec(arb_range(), 1..12),
            seed in any::<u64>(),
        ) {
            let mut shuffled = ranges.clone();
            let len = shuffled.len();
            shuffled.rotate_left((seed as usize) % len);
            shuffled.reverse();
            prop_assert_eq!(fold(&ranges), fold(&shuffled));
            prop_assert_eq!(fold(&ranges), coalesce(ranges.clone()));
        }

        // Merging a range already inside the cover is a no-op
        #[test]
        fn test_merge_of_covered_range_is_idempotent(ranges in prop::collection::vec(arb_range(), 1..10), pick in any::<prop::sample::Index>()) {
            let merged = fold(&ranges);
            let inner = merged[pick.index(merged.len())];
            prop_assert_eq!(merge_ranges(&merged, inner), merged);
        }

        // Every half-hour cell is covered after merging iff it was covered before
        #[test]
        fn test_merge_preserves_coverage(ranges in prop::collection::vec(arb_range(), 0..15)) {
            let merged = fold(&ranges);
            for cell in 0..56i64 {
                let instant = base() + Duration::minutes(cell * 30);
                prop_assert_eq!(covers(&ranges, instant), covers(&merged, instant));
            }
        }

        #[test]
        fn test_day_range_set_matches_fold(
            entries in prop::collection::vec((0..7usize, arb_range()), 0..20),
        ) {
            let mut set = DayRangeSet::new();
            for (day, range) in &entries {
                set.add_range(*day, *range).unwrap();
            }
            for day in 0..7 {
                let expected: Vec<TimeRange> = entries
                    .iter()
                    .filter(|(d, _)| *d == day)
                    .map(|(_, r)| *r)
                    .collect();
                let folded = fold(&expected);
                prop_assert_eq!(set.ranges(day), folded.as_slice());
            }
        }
    }
}
