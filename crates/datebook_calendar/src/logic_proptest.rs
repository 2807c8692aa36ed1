#[cfg(test)]
mod tests {
    use crate::logic::{check_slot, resolve_available_dates, AvailabilityPolicy, TimeBand};
    use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
    use chrono_tz::Tz;
    use proptest::prelude::*;

    fn base_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    // Busy periods starting `offset_hours` after the base date, each `duration_hours` long
    fn create_busy_periods(
        offsets: &[(i64, i64)],
    ) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
        let base = base_date().and_hms_opt(0, 0, 0).unwrap().and_utc();
        offsets
            .iter()
            .map(|(offset_hours, duration_hours)| {
                let start = base + Duration::hours(*offset_hours);
                (start, start + Duration::hours((*duration_hours).max(1)))
            })
            .collect()
    }

    fn time_zone_strategy() -> impl Strategy<Value = Tz> {
        prop_oneof![
            Just(Tz::UTC),
            Just(Tz::Europe__Zurich),
            Just(Tz::America__New_York),
            Just(Tz::Asia__Tokyo),
        ]
    }

    proptest! {
        // Every offered date lies in the range, is a working day and the list is strictly ascending
        #[test]
        fn test_available_dates_within_range_and_sorted(
            start_offset in 0..365i64,
            length in 0..60i64,
            busy in prop::collection::vec((0..10_000i64, 1..48i64), 0..20),
            time_zone in time_zone_strategy(),
        ) {
            let start = base_date() + Duration::days(start_offset);
            let end = start + Duration::days(length);
            let busy = create_busy_periods(&busy);
            let policy = AvailabilityPolicy { time_zone, ..AvailabilityPolicy::default() };

            let dates = resolve_available_dates(start, end, &busy, &policy);

            for date in &dates {
                prop_assert!(*date >= start && *date <= end, "{} outside {}..={}", date, start, end);
                prop_assert!(
                    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
                    "weekend date {} offered", date
                );
            }
            for pair in dates.windows(2) {
                prop_assert!(pair[0] < pair[1], "dates not ascending: {:?}", pair);
            }
        }

        // Without busy periods every working day of the range is offered
        #[test]
        fn test_free_calendar_offers_every_working_day(
            start_offset in 0..365i64,
            length in 0..60i64,
        ) {
            let start = base_date() + Duration::days(start_offset);
            let end = start + Duration::days(length);
            let policy = AvailabilityPolicy::default();

            let dates = resolve_available_dates(start, end, &[], &policy);
            let expected = start
                .iter_days()
                .take_while(|d| *d <= end)
                .filter(|d| policy.allows(*d))
                .count();
            prop_assert_eq!(dates.len(), expected);
        }

        // A reversed range never yields dates
        #[test]
        fn test_reversed_range_is_empty(
            start_offset in 1..365i64,
            gap in 1..60i64,
        ) {
            let start = base_date() + Duration::days(start_offset + gap);
            let end = base_date() + Duration::days(start_offset);
            let dates = resolve_available_dates(start, end, &[], &AvailabilityPolicy::default());
            prop_assert!(dates.is_empty());
        }

        // A date is offered exactly when some band of it is free
        #[test]
        fn test_offered_dates_have_a_free_band(
            start_offset in 0..365i64,
            length in 0..14i64,
            busy in prop::collection::vec((0..10_000i64, 1..24i64), 0..30),
        ) {
            let start = base_date() + Duration::days(start_offset);
            let end = start + Duration::days(length);
            let busy = create_busy_periods(&busy);
            let policy = AvailabilityPolicy::default();

            let dates = resolve_available_dates(start, end, &busy, &policy);
            for date in start.iter_days().take_while(|d| *d <= end) {
                let any_band_free = policy.allows(date)
                    && TimeBand::ALL
                        .iter()
                        .any(|band| check_slot(date, Some(*band), &busy, &policy));
                prop_assert_eq!(dates.contains(&date), any_band_free);
            }
        }
    }
}
