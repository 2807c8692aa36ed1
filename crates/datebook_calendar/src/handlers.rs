// File: crates/datebook_calendar/src/handlers.rs
use crate::logic::{
    date_suggestions, format_date, get_available_dates, is_slot_available, parse_date_param,
    record_booking, AvailabilityPolicy, AvailabilityQuery, AvailabilityResponse, BookingPayload,
    BookingResponse, SlotCheckQuery, SlotCheckResponse, SuggestionsResponse, TimeBand,
};
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    response::Json,
};
use chrono::Utc;
use datebook_common::services::CalendarService;
use datebook_common::{config_error, log_result, unavailable, validation_error, DatebookError};
use datebook_config::AppConfig;
use std::sync::Arc;
use tracing::info;

// Shared state needed by the calendar handlers
#[derive(Clone)]
pub struct CalendarState {
    pub config: Arc<AppConfig>,
    pub service: Arc<dyn CalendarService>,
    pub policy: AvailabilityPolicy,
}

impl CalendarState {
    pub fn new(
        config: Arc<AppConfig>,
        service: Arc<dyn CalendarService>,
        policy: AvailabilityPolicy,
    ) -> Self {
        Self {
            config,
            service,
            policy,
        }
    }

    /// The configured calendar, or the error to answer with when the calendar
    /// is switched off or not configured.
    fn calendar_id(&self) -> Result<&str, DatebookError> {
        if !self.config.use_calendar {
            return Err(unavailable("Calendar service is disabled."));
        }
        self.config
            .calendar
            .as_ref()
            .map(|calendar| calendar.calendar_id.as_str())
            .ok_or_else(|| config_error("calendar section missing in AppConfig"))
    }
}

/// Handler to list the bookable dates of a range.
#[axum::debug_handler]
pub async fn get_availability_handler(
    State(state): State<Arc<CalendarState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, DatebookError> {
    let calendar_id = state.calendar_id()?;
    let (start, end) = query.date_range(&state.policy.time_zone)?;
    info!("Availability requested for {} to {}", start, end);

    let dates = get_available_dates(
        state.service.as_ref(),
        calendar_id,
        start,
        end,
        &state.policy,
    )
    .await?;

    Ok(Json(AvailabilityResponse {
        available_dates: dates.into_iter().map(format_date).collect(),
    }))
}

/// Handler to check one date, optionally for one time band.
#[axum::debug_handler]
pub async fn check_slot_handler(
    State(state): State<Arc<CalendarState>>,
    Query(query): Query<SlotCheckQuery>,
) -> Result<Json<SlotCheckResponse>, DatebookError> {
    let calendar_id = state.calendar_id()?;
    let raw_date = query
        .date
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| validation_error("Date is required"))?;
    let date = parse_date_param(&raw_date, &state.policy.time_zone)
        .ok_or_else(|| validation_error(format!("Invalid date '{}'", raw_date)))?;
    let band = match query.time.filter(|t| !t.trim().is_empty()) {
        Some(raw) => Some(raw.parse::<TimeBand>()?),
        None => None,
    };

    let available = is_slot_available(
        state.service.as_ref(),
        calendar_id,
        date,
        band,
        &state.policy,
    )
    .await?;

    Ok(Json(SlotCheckResponse {
        date: format_date(date),
        time: band,
        available,
    }))
}

/// Handler to book a date.
#[axum::debug_handler]
pub async fn book_date_handler(
    State(state): State<Arc<CalendarState>>,
    payload: Result<Json<BookingPayload>, JsonRejection>,
) -> Result<Json<BookingResponse>, DatebookError> {
    let calendar_id = state.calendar_id()?;
    let Json(payload) = payload.map_err(|rejection| {
        info!("Rejected booking body: {}", rejection.body_text());
        DatebookError::ParseError(rejection.body_text())
    })?;
    let request = payload.into_request(&state.policy.time_zone)?;

    let confirmation = log_result(
        record_booking(
            state.service.as_ref(),
            calendar_id,
            &request,
            &state.policy,
        )
        .await,
        "Booking recorded",
        "Booking failed",
    )?;

    Ok(Json(BookingResponse {
        success: true,
        message: "Date booked successfully!".to_string(),
        booking_id: confirmation.booking_id,
    }))
}

/// Handler returning date ideas starting from today in the calendar's zone.
#[axum::debug_handler]
pub async fn get_suggestions_handler(
    State(state): State<Arc<CalendarState>>,
) -> Json<SuggestionsResponse> {
    let today = Utc::now()
        .with_timezone(&state.policy.time_zone)
        .date_naive();
    Json(SuggestionsResponse {
        suggestions: date_suggestions(today),
    })
}
