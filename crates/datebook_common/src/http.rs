// --- File: crates/datebook_common/src/http.rs ---
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::error::{DatebookError, HttpStatusCode};

/// Message returned in place of any server-side error detail.
pub const GENERIC_SERVER_ERROR: &str = "Internal server error";

/// Extension trait for DatebookError to convert it to an Axum HTTP response.
pub trait IntoHttpResponse {
    /// Converts the error into an Axum HTTP response.
    fn into_http_response(self) -> Response;
}

impl IntoHttpResponse for DatebookError {
    fn into_http_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Server-side failures are logged here and never leak to the caller.
        let error_message = if status_code.is_server_error() {
            error!("Request failed with {}: {}", status_code.as_u16(), self);
            match self {
                DatebookError::UnavailableError(message) => message,
                _ => GENERIC_SERVER_ERROR.to_string(),
            }
        } else {
            self.to_string()
        };

        (status_code, Json(json!({ "error": error_message }))).into_response()
    }
}

/// Implement IntoResponse for DatebookError to make it easier to use in Axum handlers.
impl IntoResponse for DatebookError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}
