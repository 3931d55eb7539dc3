#[cfg(test)]
mod tests {
    use crate::error::SlotError;
    use crate::week::{
        add_days, build_half_hour_grid, iso_week_start, localize, parse_time_zone,
        week_start_instant, week_window, weekday_index, HalfHourGrid,
    };
    use chrono::{NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
    use chrono_tz::Tz;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weekday_index_is_monday_based() {
        assert_eq!(weekday_index(date(2024, 1, 1)), 0); // Monday
        assert_eq!(weekday_index(date(2024, 1, 6)), 5); // Saturday
        assert_eq!(weekday_index(date(2024, 1, 7)), 6); // Sunday
    }

    #[test]
    fn test_iso_week_start_for_every_day_of_a_week() {
        let monday = date(2024, 1, 8);
        for offset in 0..7 {
            let day = monday + chrono::Duration::days(offset);
            assert_eq!(iso_week_start(day), monday, "day {day}");
        }
        // Sunday belongs to the week that started six days earlier
        assert_eq!(iso_week_start(date(2024, 1, 14)), monday);
        // Week spanning a year boundary
        assert_eq!(iso_week_start(date(2025, 1, 1)), date(2024, 12, 30));
    }

    #[test]
    fn test_week_start_instant_is_local_midnight() {
        let tz = Tz::Europe__Paris;
        let start = week_start_instant(date(2024, 1, 10), &tz);
        assert_eq!(start.date_naive(), date(2024, 1, 8));
        assert_eq!(start.time(), NaiveTime::from_hms_opt(0, 0, 0).unwrap());
        // Paris is UTC+1 in January
        assert_eq!(
            start.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2024, 1, 7, 23, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_week_window_spans_seven_days() {
        let (start, end) = week_window(date(2024, 1, 3), &Tz::UTC);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_week_window_across_dst_change_is_short() {
        // Week of 2024-03-25 contains the spring-forward night in Paris
        let (start, end) = week_window(date(2024, 3, 27), &Tz::Europe__Paris);
        assert_eq!((end - start).num_hours(), 7 * 24 - 1);
    }

    #[test]
    fn test_add_days_keeps_local_time_across_dst() {
        let tz = Tz::Europe__Paris;
        let before = tz.with_ymd_and_hms(2024, 3, 25, 9, 0, 0).unwrap();
        let after = add_days(&before, 7).unwrap();
        assert_eq!(after.hour(), 9);
        assert_eq!(after.date_naive(), date(2024, 4, 1));
        // The UTC distance shrinks by the lost hour
        assert_eq!((after - before).num_hours(), 7 * 24 - 1);
    }

    #[test]
    fn test_add_days_past_calendar_end_fails() {
        let last_day = NaiveDate::MAX.and_hms_opt(9, 0, 0).unwrap().and_utc();
        assert_eq!(
            add_days(&last_day, 1),
            Err(SlotError::DateOutOfRange { days: 1 })
        );
        assert_eq!(
            add_days(&last_day, i64::MAX),
            Err(SlotError::DateOutOfRange { days: i64::MAX })
        );
        assert_eq!(
            add_days(&last_day, -1).unwrap().date_naive(),
            NaiveDate::MAX.pred_opt().unwrap()
        );
    }

    #[test]
    fn test_localize_moves_out_of_dst_gap() {
        let tz = Tz::Europe__Paris;
        let gap = date(2024, 3, 31).and_hms_opt(2, 30, 0).unwrap();
        let resolved = localize(&tz, gap);
        assert_eq!(resolved.hour(), 3);
    }

    #[test]
    fn test_build_half_hour_grid_bounds() {
        let cells = build_half_hour_grid(6, 21);
        // 16 full hours plus 15 half hours
        assert_eq!(cells.len(), 31);
        assert_eq!(cells[0].label(), "06:00");
        assert_eq!(cells[1].label(), "06:30");
        assert_eq!(cells.last().unwrap().label(), "21:00");
        assert!(cells.iter().all(|c| !(c.hour == 21 && c.is_half)));
    }

    #[test]
    fn test_grid_index_to_time_mapping() {
        let grid = HalfHourGrid::new(6, 21).unwrap();
        for (index, cell) in grid.cells().iter().enumerate() {
            assert_eq!(grid.time_of(index), Some(cell.time()));
        }
        assert_eq!(grid.time_of(2), NaiveTime::from_hms_opt(7, 0, 0));
        assert_eq!(grid.time_of(grid.len()), None);
    }

    #[test]
    fn test_grid_rejects_inverted_hours() {
        assert!(HalfHourGrid::new(10, 9).is_err());
        assert!(HalfHourGrid::new(6, 24).is_err());
        assert_eq!(HalfHourGrid::new(8, 8).unwrap().len(), 1);
    }

    #[test]
    fn test_slot_time_uses_day_offset() {
        let grid = HalfHourGrid::new(6, 21).unwrap();
        let instant = grid
            .slot_time(&Tz::UTC, date(2024, 1, 1), 2, 3)
            .expect("cell exists");
        assert_eq!(instant, Utc.with_ymd_and_hms(2024, 1, 3, 7, 30, 0).unwrap());
        assert!(grid.slot_time(&Tz::UTC, date(2024, 1, 1), 7, 0).is_none());
    }

    #[test]
    fn test_parse_time_zone() {
        assert_eq!(parse_time_zone("Europe/Zurich"), Ok(Tz::Europe__Zurich));
        assert!(parse_time_zone("Mars/Olympus").is_err());
    }
}
