// File: crates/datebook_calendar/src/doc.rs

#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::logic::{
    AvailabilityQuery, AvailabilityResponse, BookingPayload, BookingResponse, DateSuggestion,
    SlotCheckQuery, SlotCheckResponse, SuggestionsResponse, TimeBand,
};

#[utoipa::path(
    get,
    path = "/booking",
    params(
        ("start" = String, Query, description = "First date, YYYY-MM-DD or RFC 3339", example = "2024-06-01"),
        ("end" = String, Query, description = "Last date (inclusive), YYYY-MM-DD or RFC 3339", example = "2024-06-30")
    ),
    responses(
        (status = 200, description = "Available dates in ascending order", body = AvailabilityResponse,
         example = json!({ "availableDates": ["2024-06-03", "2024-06-04", "2024-06-06"] })
        ),
        (status = 400, description = "Start or end missing, not a date, or range longer than 366 days",
         example = json!({ "error": "Start and end dates are required" })
        ),
        (status = 500, description = "Calendar provider failure",
         example = json!({ "error": "Internal server error" })
        ),
        (status = 503, description = "Calendar disabled by configuration",
         example = json!({ "error": "Calendar service is disabled." })
        )
    ),
    tag = "booking"
)]
fn doc_get_availability_handler() {}

#[utoipa::path(
    get,
    path = "/availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Same as GET /booking", body = AvailabilityResponse),
        (status = 400, description = "Start or end missing, not a date, or range longer than 366 days",
         example = json!({ "error": "Date range must not exceed 366 days" })
        )
    ),
    tag = "booking"
)]
fn doc_get_availability_alias_handler() {}

#[utoipa::path(
    get,
    path = "/availability/check",
    params(SlotCheckQuery),
    responses(
        (status = 200, description = "Whether the slot can be booked", body = SlotCheckResponse,
         example = json!({ "date": "2024-06-03", "time": "evening", "available": true })
        ),
        (status = 400, description = "Missing date or unknown time band",
         example = json!({ "error": "Date is required" })
        )
    ),
    tag = "booking"
)]
fn doc_check_slot_handler() {}

#[utoipa::path(
    post,
    path = "/booking",
    request_body(content = BookingPayload, example = json!({
        "date": "2024-06-03",
        "time": "evening",
        "name": "Alex",
        "email": "alex@example.com",
        "phone": "+41 79 000 00 00",
        "message": "Looking forward to it"
    })),
    responses(
        (status = 200, description = "Booking recorded", body = BookingResponse,
         example = json!({
             "success": true,
             "message": "Date booked successfully!",
             "bookingId": "booking_1717420800000_3f2a9c1d"
         })
        ),
        (status = 400, description = "date, name or email missing",
         example = json!({ "error": "Missing required fields" })
        ),
        (status = 500, description = "Booking failed",
         example = json!({ "error": "Internal server error" })
        )
    ),
    tag = "booking"
)]
fn doc_book_date_handler() {}

#[utoipa::path(
    post,
    path = "/book",
    request_body = BookingPayload,
    responses(
        (status = 200, description = "Same as POST /booking", body = BookingResponse),
        (status = 400, description = "date, name or email missing",
         example = json!({ "error": "Missing required fields" })
        )
    ),
    tag = "booking"
)]
fn doc_book_alias_handler() {}

#[utoipa::path(
    get,
    path = "/suggestions",
    responses(
        (status = 200, description = "Date ideas relative to today", body = SuggestionsResponse)
    ),
    tag = "booking"
)]
fn doc_get_suggestions_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_get_availability_handler,
        doc_get_availability_alias_handler,
        doc_check_slot_handler,
        doc_book_date_handler,
        doc_book_alias_handler,
        doc_get_suggestions_handler
    ),
    components(
        schemas(
            AvailabilityQuery,
            AvailabilityResponse,
            SlotCheckQuery,
            SlotCheckResponse,
            BookingPayload,
            BookingResponse,
            DateSuggestion,
            SuggestionsResponse,
            TimeBand
        )
    ),
    tags(
        (name = "booking", description = "Date availability and booking API")
    ),
    servers(
        (url = "/api", description = "Datebook API server")
    )
)]
pub struct BookingApiDoc;
