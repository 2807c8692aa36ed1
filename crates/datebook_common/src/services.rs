// --- File: crates/datebook_common/src/services.rs ---
//! Calendar provider abstraction.
//!
//! Request handling only ever talks to a `CalendarService`, so the mock
//! provider can be swapped for a real client without touching the handlers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

use crate::error::{external_service_error, DatebookError};

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A busy interval reported by the provider, `[start, end)`.
pub type BusyPeriod = (DateTime<Utc>, DateTime<Utc>);

/// Errors a calendar provider can report.
#[derive(Error, Debug)]
pub enum CalendarServiceError {
    #[error("Calendar API error: {0}")]
    ApiError(String),
    #[error("Failed to parse time: {0}")]
    TimeParseError(String),
    #[error("Calendar provider rejected the event: {0}")]
    Rejected(String),
}

impl From<CalendarServiceError> for DatebookError {
    fn from(err: CalendarServiceError) -> Self {
        external_service_error("calendar", err)
    }
}

/// The two operations the booking flow needs from a calendar provider.
pub trait CalendarService: Send + Sync {
    /// Get busy time intervals within `[start_time, end_time)`, sorted by start.
    fn get_busy_times(
        &self,
        calendar_id: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<BusyPeriod>, CalendarServiceError>;

    /// Create a calendar event.
    fn create_event(
        &self,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, CalendarServiceError>;
}

/// An event to be written to the provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarEvent {
    /// The start time of the event (RFC 3339).
    pub start_time: String,
    /// The end time of the event (RFC 3339).
    pub end_time: String,
    /// The summary or title of the event.
    pub summary: String,
    /// An optional description of the event.
    pub description: Option<String>,
    /// Address of the person who booked.
    pub attendee_email: Option<String>,
}

/// Represents the result of a calendar event operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEventResult {
    /// The ID of the event.
    pub event_id: Option<String>,
    /// The status of the event.
    pub status: String,
}
