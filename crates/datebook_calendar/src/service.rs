// --- File: crates/datebook_calendar/src/service.rs ---
//! Mock calendar provider.
//!
//! Stands in for a real calendar client behind the `CalendarService` trait:
//! whole days are randomly reported busy, and event creation always succeeds
//! after a simulated round trip.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use datebook_common::services::{
    BoxFuture, BusyPeriod, CalendarEvent, CalendarEventResult, CalendarService,
    CalendarServiceError,
};
use datebook_config::CalendarConfig;
use ring::rand::{SecureRandom, SystemRandom};
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::logic::day_boundary;

/// Share of days reported busy when the config does not say otherwise.
pub const DEFAULT_BLOCK_PROBABILITY: f64 = 0.3;
pub const DEFAULT_BOOKING_DELAY_MS: u64 = 1000;

pub struct MockCalendarService {
    time_zone: Tz,
    block_probability: f64,
    booking_delay: Duration,
    rng: SystemRandom,
}

impl MockCalendarService {
    /// `block_probability` is clamped to `[0, 1]`.
    pub fn new(time_zone: Tz, block_probability: f64, booking_delay: Duration) -> Self {
        let block_probability = if block_probability.is_nan() {
            DEFAULT_BLOCK_PROBABILITY
        } else {
            block_probability.clamp(0.0, 1.0)
        };
        Self {
            time_zone,
            block_probability,
            booking_delay,
            rng: SystemRandom::new(),
        }
    }

    pub fn from_config(config: &CalendarConfig, time_zone: Tz) -> Self {
        Self::new(
            time_zone,
            config
                .block_probability
                .unwrap_or(DEFAULT_BLOCK_PROBABILITY),
            Duration::from_millis(config.booking_delay_ms.unwrap_or(DEFAULT_BOOKING_DELAY_MS)),
        )
    }

    pub fn block_probability(&self) -> f64 {
        self.block_probability
    }

    /// Uniform draw in `[0, 1)`.
    fn roll(&self) -> Option<f64> {
        let mut bytes = [0u8; 4];
        self.rng.fill(&mut bytes).ok()?;
        Some(f64::from(u32::from_le_bytes(bytes)) / (f64::from(u32::MAX) + 1.0))
    }

    fn is_day_blocked(&self) -> bool {
        if self.block_probability <= 0.0 {
            return false;
        }
        if self.block_probability >= 1.0 {
            return true;
        }
        match self.roll() {
            Some(draw) => draw < self.block_probability,
            None => {
                warn!("System RNG unavailable, reporting day as free");
                false
            }
        }
    }

    /// One all-day busy period per blocked local day overlapping the range.
    /// Days the zone skipped are empty and never reported.
    fn busy_days(&self, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Vec<BusyPeriod> {
        let tz = self.time_zone;
        let mut busy = Vec::new();
        let mut day = start_time.with_timezone(&tz).date_naive();

        loop {
            let day_start = day_boundary(day, &tz);
            if day_start >= end_time {
                break;
            }
            let Some(next) = day.succ_opt() else {
                break;
            };
            let day_end = day_boundary(next, &tz);
            if day_end > day_start && self.is_day_blocked() {
                busy.push((day_start, day_end));
            }
            day = next;
        }
        busy
    }
}

impl CalendarService for MockCalendarService {
    fn get_busy_times(
        &self,
        calendar_id: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<BusyPeriod>, CalendarServiceError> {
        let busy = self.busy_days(start_time, end_time);
        debug!(
            "Mock calendar '{}': {} blocked days between {} and {}",
            calendar_id,
            busy.len(),
            start_time,
            end_time
        );
        Box::pin(async move { Ok(busy) })
    }

    fn create_event(
        &self,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, CalendarServiceError> {
        let calendar_id = calendar_id.to_string();
        let delay = self.booking_delay;

        Box::pin(async move {
            let start = DateTime::parse_from_rfc3339(&event.start_time)
                .map_err(|e| CalendarServiceError::TimeParseError(e.to_string()))?;
            let end = DateTime::parse_from_rfc3339(&event.end_time)
                .map_err(|e| CalendarServiceError::TimeParseError(e.to_string()))?;
            if end <= start {
                return Err(CalendarServiceError::Rejected(
                    "end time must be after start time".to_string(),
                ));
            }

            info!(
                "Creating booking event in '{}': {} ({} - {})",
                calendar_id, event.summary, event.start_time, event.end_time
            );
            // Simulated provider round trip.
            tokio::time::sleep(delay).await;

            Ok(CalendarEventResult {
                event_id: Some(format!("mock_{}", Uuid::new_v4())),
                status: "confirmed".to_string(),
            })
        })
    }
}
