// --- File: crates/datebook_calendar/src/routes.rs ---

use crate::handlers::{
    book_date_handler, check_slot_handler, get_availability_handler, get_suggestions_handler,
    CalendarState,
};
use crate::logic::AvailabilityPolicy;
use crate::service::MockCalendarService;
use axum::{
    routing::{get, post},
    Router,
};
use datebook_common::services::CalendarService;
use datebook_common::DatebookError;
use datebook_config::AppConfig;
use std::sync::Arc;
use tracing::{info, warn};

/// Creates the router for the booking feature, backed by the mock provider.
///
/// Fails when the calendar section names an unknown time zone.
pub fn routes(config: Arc<AppConfig>) -> Result<Router, DatebookError> {
    let calendar = config.calendar.clone().unwrap_or_default();
    if !calendar.has_credentials() {
        warn!("Calendar credentials missing; serving mock availability");
    }
    let policy = AvailabilityPolicy::from_config(&calendar)?;
    let service = MockCalendarService::from_config(&calendar, policy.time_zone);
    info!(
        "Mock calendar '{}' in {} (block probability {})",
        calendar.calendar_id,
        policy.time_zone,
        service.block_probability()
    );
    Ok(router(config, Arc::new(service), policy))
}

/// Creates the router over any calendar provider.
pub fn routes_with_service(
    config: Arc<AppConfig>,
    service: Arc<dyn CalendarService>,
) -> Result<Router, DatebookError> {
    let policy = match config.calendar.as_ref() {
        Some(calendar) => AvailabilityPolicy::from_config(calendar)?,
        None => AvailabilityPolicy::default(),
    };
    Ok(router(config, service, policy))
}

fn router(
    config: Arc<AppConfig>,
    service: Arc<dyn CalendarService>,
    policy: AvailabilityPolicy,
) -> Router {
    let state = Arc::new(CalendarState::new(config, service, policy));

    Router::new()
        .route(
            "/booking",
            get(get_availability_handler).post(book_date_handler),
        )
        .route("/availability", get(get_availability_handler))
        .route("/availability/check", get(check_slot_handler))
        .route("/book", post(book_date_handler))
        .route("/suggestions", get(get_suggestions_handler))
        .with_state(state)
}
