// --- File: crates/datebook_calendar/src/logic.rs ---
use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
    Weekday,
};
use chrono_tz::Tz;
use datebook_common::services::{BusyPeriod, CalendarEvent, CalendarService, CalendarServiceError};
use datebook_common::{config_error, validation_error, DatebookError};
use datebook_config::CalendarConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

// --- Error Handling ---
#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Missing required fields")]
    MissingFields,
    #[error("{0}")]
    InvalidField(String),
    #[error("Calendar service error: {0}")]
    Calendar(#[from] CalendarServiceError),
}

impl From<BookingError> for DatebookError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Calendar(e) => e.into(),
            other => validation_error(other),
        }
    }
}

// --- Domain Types ---

/// Coarse time-of-day band a visitor can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum TimeBand {
    Morning,
    Afternoon,
    #[default]
    Evening,
    Night,
}

impl TimeBand {
    pub const ALL: [TimeBand; 4] = [
        TimeBand::Morning,
        TimeBand::Afternoon,
        TimeBand::Evening,
        TimeBand::Night,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TimeBand::Morning => "morning",
            TimeBand::Afternoon => "afternoon",
            TimeBand::Evening => "evening",
            TimeBand::Night => "night",
        }
    }

    /// Local wall-clock hours `[start, end)` covered by the band.
    pub fn hours(self) -> (u32, u32) {
        match self {
            TimeBand::Morning => (9, 12),
            TimeBand::Afternoon => (12, 17),
            TimeBand::Evening => (17, 21),
            TimeBand::Night => (21, 23),
        }
    }

    /// The band on `date` in `tz`, as a UTC interval. `None` when the zone
    /// skipped that part of the day.
    pub fn window(self, date: NaiveDate, tz: &Tz) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let (start_hour, end_hour) = self.hours();
        let at = |hour: u32| {
            local_to_utc(
                tz,
                date.and_time(NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or_default()),
            )
        };
        Some((at(start_hour)?, at(end_hour)?))
    }
}

impl fmt::Display for TimeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeBand {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "morning" => Ok(TimeBand::Morning),
            "afternoon" => Ok(TimeBand::Afternoon),
            "evening" => Ok(TimeBand::Evening),
            "night" => Ok(TimeBand::Night),
            _ => Err(BookingError::InvalidField(format!(
                "Unknown time preference '{}'",
                s
            ))),
        }
    }
}

/// A candidate date plus a time band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub date: NaiveDate,
    pub time_band: TimeBand,
}

/// A validated-on-use booking request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub slot: Slot,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub note: Option<String>,
}

impl BookingRequest {
    /// Name and email must contain something other than whitespace.
    pub fn validate(&self) -> Result<(), BookingError> {
        if self.contact_name.trim().is_empty() || self.contact_email.trim().is_empty() {
            return Err(BookingError::MissingFields);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingConfirmation {
    /// Opaque confirmation token handed back to the visitor.
    pub booking_id: String,
    pub event_id: Option<String>,
}

/// Which dates may be offered at all, and in which zone dates are read.
#[derive(Debug, Clone)]
pub struct AvailabilityPolicy {
    pub working_days: Vec<Weekday>,
    pub time_zone: Tz,
}

impl Default for AvailabilityPolicy {
    fn default() -> Self {
        Self {
            working_days: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
            time_zone: Tz::UTC,
        }
    }
}

impl AvailabilityPolicy {
    /// Fails on a time zone name that is not in the IANA database.
    pub fn from_config(config: &CalendarConfig) -> Result<Self, DatebookError> {
        let defaults = Self::default();
        let time_zone = match config.time_zone.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.parse::<Tz>().map_err(|_| {
                config_error(format!("Unknown time zone '{}' in calendar.time_zone", name))
            })?,
            _ => defaults.time_zone,
        };
        let working_days = match config.working_days.as_deref() {
            Some(days) => parse_working_days(days),
            None => defaults.working_days,
        };
        Ok(Self {
            working_days,
            time_zone,
        })
    }

    pub fn allows(&self, date: NaiveDate) -> bool {
        self.working_days.contains(&date.weekday())
    }
}

/// Parses short or long weekday names; unknown entries are skipped with a warning.
pub fn parse_working_days(days: &[String]) -> Vec<Weekday> {
    days.iter()
        .filter_map(|day| match day.trim().parse::<Weekday>() {
            Ok(weekday) => Some(weekday),
            Err(_) => {
                warn!("Ignoring unknown working day '{}'", day);
                None
            }
        })
        .collect()
}

// --- Time Helpers ---

/// Resolves a local wall-clock time to UTC.
///
/// Ambiguous times take the earlier instant; times inside a DST gap are moved
/// forward by an hour. `None` when the zone skipped the time entirely, as for
/// whole days dropped at a date line change.
pub fn local_to_utc(tz: &Tz, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => tz
            .from_local_datetime(&(local + Duration::hours(1)))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc)),
    }
}

fn local_midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::default())
}

/// Whether `date` happened at all in `tz`.
pub fn day_exists(date: NaiveDate, tz: &Tz) -> bool {
    local_to_utc(tz, local_midnight(date)).is_some()
}

/// First instant of `date` in `tz`, or of the next day that exists there.
pub fn day_boundary(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    date.iter_days()
        .take(3)
        .find_map(|day| local_to_utc(tz, local_midnight(day)))
        .unwrap_or_else(|| Utc.from_utc_datetime(&local_midnight(date)))
}

/// UTC bounds covering the local days `start..=end`.
pub fn utc_range(start: NaiveDate, end: NaiveDate, tz: &Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let after_end = end.succ_opt().unwrap_or(end);
    (day_boundary(start, tz), day_boundary(after_end, tz))
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp, which is read in `tz`.
pub fn parse_date_param(raw: &str, tz: &Tz) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(tz).date_naive())
    })
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

// --- Availability Logic ---

/// Longest range, in days, an availability query may span.
pub const MAX_RANGE_DAYS: i64 = 366;

/// Busy periods sorted by start plus the running maximum of their ends, so an
/// overlap query is a binary search.
struct BusyIndex {
    periods: Vec<BusyPeriod>,
    max_end: Vec<DateTime<Utc>>,
}

impl BusyIndex {
    fn new(busy: &[BusyPeriod]) -> Self {
        let mut periods = busy.to_vec();
        periods.sort_by_key(|(start, _)| *start);
        let mut max_end: Vec<DateTime<Utc>> = Vec::with_capacity(periods.len());
        for (_, end) in &periods {
            let running = max_end.last().map_or(*end, |max| (*max).max(*end));
            max_end.push(running);
        }
        Self { periods, max_end }
    }

    fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        let starting_before_end = self
            .periods
            .partition_point(|(busy_start, _)| *busy_start < end);
        starting_before_end > 0 && self.max_end[starting_before_end - 1] > start
    }
}

fn band_free(
    date: NaiveDate,
    band: TimeBand,
    busy: &BusyIndex,
    policy: &AvailabilityPolicy,
) -> bool {
    match band.window(date, &policy.time_zone) {
        Some((start, end)) => !busy.overlaps(start, end),
        None => false,
    }
}

fn slot_free(
    date: NaiveDate,
    band: Option<TimeBand>,
    busy: &BusyIndex,
    policy: &AvailabilityPolicy,
) -> bool {
    if !policy.allows(date) || !day_exists(date, &policy.time_zone) {
        return false;
    }
    match band {
        Some(band) => band_free(date, band, busy, policy),
        None => TimeBand::ALL
            .iter()
            .any(|band| band_free(date, *band, busy, policy)),
    }
}

/// A slot is available on a working day when its band is free; without a
/// band, when any band of the day is free. Days the zone skipped never are.
pub fn check_slot(
    date: NaiveDate,
    band: Option<TimeBand>,
    busy: &[BusyPeriod],
    policy: &AvailabilityPolicy,
) -> bool {
    slot_free(date, band, &BusyIndex::new(busy), policy)
}

/// Dates in `[start, end]`, ascending, that pass [`check_slot`] without a band.
/// Empty when `start > end`.
pub fn resolve_available_dates(
    start: NaiveDate,
    end: NaiveDate,
    busy: &[BusyPeriod],
    policy: &AvailabilityPolicy,
) -> Vec<NaiveDate> {
    if start > end {
        return Vec::new();
    }
    let busy = BusyIndex::new(busy);
    start
        .iter_days()
        .take_while(|date| *date <= end)
        .filter(|date| slot_free(*date, None, &busy, policy))
        .collect()
}

/// Rejects ranges spanning more than [`MAX_RANGE_DAYS`]. Reversed ranges pass.
pub fn check_range_length(start: NaiveDate, end: NaiveDate) -> Result<(), DatebookError> {
    if (end - start).num_days() >= MAX_RANGE_DAYS {
        return Err(validation_error(format!(
            "Date range must not exceed {} days",
            MAX_RANGE_DAYS
        )));
    }
    Ok(())
}

/// Asks the provider for busy periods and resolves the available dates.
///
/// Ranges longer than [`MAX_RANGE_DAYS`] are cut to that length.
pub async fn get_available_dates(
    service: &dyn CalendarService,
    calendar_id: &str,
    start: NaiveDate,
    end: NaiveDate,
    policy: &AvailabilityPolicy,
) -> Result<Vec<NaiveDate>, CalendarServiceError> {
    if start > end {
        debug!("Empty range {} > {}, not querying the calendar", start, end);
        return Ok(Vec::new());
    }
    let last = start
        .checked_add_signed(Duration::days(MAX_RANGE_DAYS - 1))
        .unwrap_or(NaiveDate::MAX);
    if end > last {
        warn!("Range {} to {} cut to end at {}", start, end, last);
    }
    let end = end.min(last);
    let (from, to) = utc_range(start, end, &policy.time_zone);
    let busy = service.get_busy_times(calendar_id, from, to).await?;
    debug!("{} busy periods between {} and {}", busy.len(), from, to);
    Ok(resolve_available_dates(start, end, &busy, policy))
}

/// Checks a single date, optionally narrowed to one band.
pub async fn is_slot_available(
    service: &dyn CalendarService,
    calendar_id: &str,
    date: NaiveDate,
    band: Option<TimeBand>,
    policy: &AvailabilityPolicy,
) -> Result<bool, CalendarServiceError> {
    if !policy.allows(date) {
        return Ok(false);
    }
    let (from, to) = utc_range(date, date, &policy.time_zone);
    let busy = service.get_busy_times(calendar_id, from, to).await?;
    Ok(check_slot(date, band, &busy, policy))
}

// --- Booking Logic ---

/// `booking_<unix millis>_<8 hex chars>`
pub fn new_booking_token() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("booking_{}_{}", Utc::now().timestamp_millis(), &suffix[..8])
}

/// The provider event written for a booking request.
pub fn booking_event(request: &BookingRequest, tz: &Tz) -> Result<CalendarEvent, BookingError> {
    let (start, end) = request
        .slot
        .time_band
        .window(request.slot.date, tz)
        .ok_or_else(|| {
            BookingError::InvalidField(format!(
                "Date {} does not exist in {}",
                format_date(request.slot.date),
                tz
            ))
        })?;
    let name = request.contact_name.trim();
    let email = request.contact_email.trim();

    let mut lines = vec![
        format!("Contact: {} <{}>", name, email),
        format!("Time preference: {}", request.slot.time_band),
    ];
    if let Some(phone) = &request.contact_phone {
        lines.push(format!("Phone: {}", phone));
    }
    if let Some(note) = &request.note {
        lines.push(format!("Message: {}", note));
    }

    Ok(CalendarEvent {
        start_time: start.with_timezone(tz).to_rfc3339(),
        end_time: end.with_timezone(tz).to_rfc3339(),
        summary: format!("Date with {}", name),
        description: Some(lines.join("\n")),
        attendee_email: Some(email.to_string()),
    })
}

/// Validates the request, writes the event and hands out a confirmation token.
///
/// Availability is not re-checked and identical requests are not
/// deduplicated: every accepted call produces a new token.
pub async fn record_booking(
    service: &dyn CalendarService,
    calendar_id: &str,
    request: &BookingRequest,
    policy: &AvailabilityPolicy,
) -> Result<BookingConfirmation, BookingError> {
    request.validate()?;

    let event = booking_event(request, &policy.time_zone)?;
    let result = service.create_event(calendar_id, event).await?;

    let confirmation = BookingConfirmation {
        booking_id: new_booking_token(),
        event_id: result.event_id,
    };
    info!(
        "Booked {} ({}) as {} (event {:?})",
        format_date(request.slot.date),
        request.slot.time_band,
        confirmation.booking_id,
        confirmation.event_id
    );
    Ok(confirmation)
}

// --- Suggestions ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct DateSuggestion {
    #[cfg_attr(feature = "openapi", schema(example = "coffee"))]
    pub id: String,
    #[cfg_attr(feature = "openapi", schema(example = "Coffee Date"))]
    pub title: String,
    pub description: String,
    #[cfg_attr(feature = "openapi", schema(example = "2024-06-05"))]
    pub date: String,
}

/// Ready-made date ideas relative to `today`.
pub fn date_suggestions(today: NaiveDate) -> Vec<DateSuggestion> {
    let days_until_saturday = (6 - today.weekday().num_days_from_sunday()) % 7;
    let ideas: [(&str, &str, &str, i64); 6] = [
        (
            "weekend",
            "This Weekend",
            "Perfect for a relaxing time together",
            i64::from(days_until_saturday),
        ),
        ("coffee", "Coffee Date", "Let's grab coffee and chat", 2),
        ("photo", "Photo Walk", "Explore the city and capture memories", 3),
        ("dinner", "Romantic Dinner", "Fine dining and great conversation", 5),
        ("music", "Music Night", "Live music and dancing", 7),
        ("surprise", "Surprise Date", "Let me plan something special", 7),
    ];

    ideas
        .iter()
        .map(|(id, title, description, offset)| DateSuggestion {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            date: format_date(today + Duration::days(*offset)),
        })
        .collect()
}

// --- Data Structures ---

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct AvailabilityQuery {
    /// First date of the range, `YYYY-MM-DD` or RFC 3339
    #[cfg_attr(feature = "openapi", schema(example = "2024-06-01"))]
    pub start: Option<String>,
    /// Last date of the range (inclusive), `YYYY-MM-DD` or RFC 3339
    #[cfg_attr(feature = "openapi", schema(example = "2024-06-30"))]
    pub end: Option<String>,
}

impl AvailabilityQuery {
    /// Both bounds, parsed in `tz`. The range may span at most
    /// [`MAX_RANGE_DAYS`] days.
    pub fn date_range(&self, tz: &Tz) -> Result<(NaiveDate, NaiveDate), DatebookError> {
        let (Some(start), Some(end)) = (non_empty(self.start.clone()), non_empty(self.end.clone()))
        else {
            return Err(validation_error("Start and end dates are required"));
        };
        let start_date = parse_date_param(&start, tz)
            .ok_or_else(|| validation_error(format!("Invalid start date '{}'", start)))?;
        let end_date = parse_date_param(&end, tz)
            .ok_or_else(|| validation_error(format!("Invalid end date '{}'", end)))?;
        check_range_length(start_date, end_date)?;
        Ok((start_date, end_date))
    }
}

#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    #[cfg_attr(feature = "openapi", schema(example = json!(["2024-06-03", "2024-06-05"])))]
    pub available_dates: Vec<String>,
}

#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct SlotCheckQuery {
    /// Date to check, `YYYY-MM-DD` or RFC 3339
    #[cfg_attr(feature = "openapi", schema(example = "2024-06-03"))]
    pub date: Option<String>,
    /// Optional band: morning, afternoon, evening or night
    #[cfg_attr(feature = "openapi", schema(example = "evening"))]
    pub time: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SlotCheckResponse {
    pub date: String,
    pub time: Option<TimeBand>,
    pub available: bool,
}

/// Booking form as posted by the client. Every field is optional on the wire
/// so that missing fields turn into a 400 rather than a deserialization error.
#[derive(Deserialize, Debug, Default, Clone)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BookingPayload {
    #[cfg_attr(feature = "openapi", schema(example = "2024-06-03"))]
    pub date: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "evening"))]
    pub time: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "Alex"))]
    pub name: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "alex@example.com"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
}

impl BookingPayload {
    /// Checks presence of `date`, `name` and `email` and parses date and band.
    /// A missing or empty `time` means evening.
    pub fn into_request(self, tz: &Tz) -> Result<BookingRequest, BookingError> {
        let (Some(raw_date), Some(name), Some(email)) = (
            non_empty(self.date),
            non_empty(self.name),
            non_empty(self.email),
        ) else {
            return Err(BookingError::MissingFields);
        };

        let date = parse_date_param(&raw_date, tz)
            .ok_or_else(|| BookingError::InvalidField(format!("Invalid date '{}'", raw_date)))?;
        let time_band = match non_empty(self.time) {
            Some(raw) => raw.parse()?,
            None => TimeBand::default(),
        };

        Ok(BookingRequest {
            slot: Slot { date, time_band },
            contact_name: name,
            contact_email: email,
            contact_phone: non_empty(self.phone),
            note: non_empty(self.message),
        })
    }
}

#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub success: bool,
    #[cfg_attr(feature = "openapi", schema(example = "Date booked successfully!"))]
    pub message: String,
    #[cfg_attr(feature = "openapi", schema(example = "booking_1717420800000_3f2a9c1d"))]
    pub booking_id: String,
}

#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SuggestionsResponse {
    pub suggestions: Vec<DateSuggestion>,
}
