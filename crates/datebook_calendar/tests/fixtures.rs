//! Test fixtures for the booking API tests
//!
//! Factory functions for configs, routers and a provider that always fails.
#![allow(dead_code)]

use axum::Router;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use datebook_calendar::routes::routes_with_service;
use datebook_calendar::service::MockCalendarService;
use datebook_common::services::{
    BoxFuture, BusyPeriod, CalendarEvent, CalendarEventResult, CalendarService,
    CalendarServiceError,
};
use datebook_config::{AppConfig, CalendarConfig, ServerConfig};
use std::sync::Arc;
use std::time::Duration;

/// Creates an AppConfig with the calendar enabled or disabled
pub fn create_mock_config(use_calendar: bool) -> Arc<AppConfig> {
    Arc::new(AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
        },
        log_level: Some("debug".to_string()),
        use_calendar,
        calendar: Some(CalendarConfig {
            time_zone: Some("UTC".to_string()),
            booking_delay_ms: Some(0),
            ..CalendarConfig::default()
        }),
    })
}

/// Router over the mock provider with a fixed block probability and no delay
pub fn create_router(block_probability: f64) -> Router {
    let service = MockCalendarService::new(Tz::UTC, block_probability, Duration::ZERO);
    routes_with_service(create_mock_config(true), Arc::new(service)).expect("valid test config")
}

/// Router with the calendar switched off in config
pub fn create_disabled_router() -> Router {
    let service = MockCalendarService::new(Tz::UTC, 0.0, Duration::ZERO);
    routes_with_service(create_mock_config(false), Arc::new(service)).expect("valid test config")
}

/// Router whose provider fails every call
pub fn create_failing_router() -> Router {
    routes_with_service(create_mock_config(true), Arc::new(FailingCalendar))
        .expect("valid test config")
}

/// Provider that reports an API error for every call
pub struct FailingCalendar;

impl CalendarService for FailingCalendar {
    fn get_busy_times(
        &self,
        _calendar_id: &str,
        _start_time: DateTime<Utc>,
        _end_time: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<BusyPeriod>, CalendarServiceError> {
        Box::pin(async {
            Err(CalendarServiceError::ApiError(
                "credentials revoked".to_string(),
            ))
        })
    }

    fn create_event(
        &self,
        _calendar_id: &str,
        _event: CalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, CalendarServiceError> {
        Box::pin(async {
            Err(CalendarServiceError::ApiError(
                "credentials revoked".to_string(),
            ))
        })
    }
}
