#[cfg(test)]
mod tests {
    use crate::logic::utc_range;
    use crate::service::{MockCalendarService, DEFAULT_BLOCK_PROBABILITY};
    use chrono::{Duration as ChronoDuration, NaiveDate, TimeZone, Utc};
    use chrono_tz::Tz;
    use datebook_common::services::{CalendarEvent, CalendarService, CalendarServiceError};
    use datebook_config::CalendarConfig;
    use std::time::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(start: &str, end: &str) -> CalendarEvent {
        CalendarEvent {
            start_time: start.to_string(),
            end_time: end.to_string(),
            summary: "Date with Alex".to_string(),
            description: None,
            attendee_email: Some("alex@example.com".to_string()),
        }
    }

    #[test]
    fn test_block_probability_is_clamped() {
        let no_delay = Duration::ZERO;
        assert_eq!(
            MockCalendarService::new(Tz::UTC, 2.0, no_delay).block_probability(),
            1.0
        );
        assert_eq!(
            MockCalendarService::new(Tz::UTC, -0.5, no_delay).block_probability(),
            0.0
        );
        assert_eq!(
            MockCalendarService::new(Tz::UTC, f64::NAN, no_delay).block_probability(),
            DEFAULT_BLOCK_PROBABILITY
        );
    }

    #[test]
    fn test_from_config_defaults() {
        let service = MockCalendarService::from_config(&CalendarConfig::default(), Tz::UTC);
        assert_eq!(service.block_probability(), DEFAULT_BLOCK_PROBABILITY);

        let config = CalendarConfig {
            block_probability: Some(0.0),
            ..CalendarConfig::default()
        };
        let service = MockCalendarService::from_config(&config, Tz::UTC);
        assert_eq!(service.block_probability(), 0.0);
    }

    #[tokio::test]
    async fn test_always_blocked_reports_every_day() {
        let service = MockCalendarService::new(Tz::UTC, 1.0, Duration::ZERO);
        let (from, to) = utc_range(date(2024, 6, 3), date(2024, 6, 9), &Tz::UTC);

        let busy = service.get_busy_times("primary", from, to).await.unwrap();

        assert_eq!(busy.len(), 7);
        assert_eq!(busy[0].0, from);
        assert_eq!(busy[6].1, to);
        for (start, end) in &busy {
            assert_eq!(*end - *start, ChronoDuration::days(1));
        }
    }

    #[tokio::test]
    async fn test_never_blocked_reports_nothing() {
        let service = MockCalendarService::new(Tz::UTC, 0.0, Duration::ZERO);
        let (from, to) = utc_range(date(2024, 6, 1), date(2024, 6, 30), &Tz::UTC);

        let busy = service.get_busy_times("primary", from, to).await.unwrap();
        assert!(busy.is_empty());
    }

    #[tokio::test]
    async fn test_blocked_days_follow_local_midnight() {
        let tz = Tz::Europe__Zurich;
        let service = MockCalendarService::new(tz, 1.0, Duration::ZERO);
        let (from, to) = utc_range(date(2024, 6, 5), date(2024, 6, 5), &tz);

        let busy = service.get_busy_times("primary", from, to).await.unwrap();

        assert_eq!(
            busy,
            vec![(
                Utc.with_ymd_and_hms(2024, 6, 4, 22, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 6, 5, 22, 0, 0).unwrap(),
            )]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_event_confirms_after_delay() {
        let service = MockCalendarService::new(Tz::UTC, 0.3, Duration::from_millis(1000));

        let result = service
            .create_event(
                "primary",
                event("2024-06-03T17:00:00+00:00", "2024-06-03T21:00:00+00:00"),
            )
            .await
            .unwrap();

        assert_eq!(result.status, "confirmed");
        assert!(result.event_id.unwrap().starts_with("mock_"));
    }

    #[tokio::test]
    async fn test_create_event_rejects_bad_times() {
        let service = MockCalendarService::new(Tz::UTC, 0.3, Duration::ZERO);

        let unparsable = service
            .create_event("primary", event("tomorrow", "2024-06-03T21:00:00+00:00"))
            .await;
        assert!(matches!(
            unparsable,
            Err(CalendarServiceError::TimeParseError(_))
        ));

        let reversed = service
            .create_event(
                "primary",
                event("2024-06-03T21:00:00+00:00", "2024-06-03T17:00:00+00:00"),
            )
            .await;
        assert!(matches!(reversed, Err(CalendarServiceError::Rejected(_))));
    }

    #[tokio::test]
    async fn test_skipped_day_is_not_reported() {
        let tz = Tz::Pacific__Apia;
        let service = MockCalendarService::new(tz, 1.0, Duration::ZERO);
        let (from, to) = utc_range(date(2011, 12, 29), date(2011, 12, 31), &tz);

        let busy = service.get_busy_times("primary", from, to).await.unwrap();

        // 2011-12-30 never happened in Samoa
        assert_eq!(busy.len(), 2);
        assert_eq!(busy[0].0, from);
        assert_eq!(busy[0].1, busy[1].0);
        assert_eq!(busy[1].1, to);
    }
}
