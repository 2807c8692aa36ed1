// --- File: crates/datebook_config/src/models.rs ---

use serde::{Deserialize, Serialize};

/// Calendar used when neither the config files nor `GOOGLE_CALENDAR_ID` name one.
pub const DEFAULT_CALENDAR_ID: &str = "primary";

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Calendar Config ---
// The provider credentials are optional: the mock provider runs without them,
// a real provider client would refuse to start.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CalendarConfig {
    #[serde(default = "default_calendar_id")]
    pub calendar_id: String, // DATEBOOK__CALENDAR__CALENDAR_ID or GOOGLE_CALENDAR_ID
    #[serde(default)]
    pub client_email: Option<String>, // GOOGLE_CLIENT_EMAIL
    #[serde(default, skip_serializing)]
    pub private_key: Option<String>, // GOOGLE_PRIVATE_KEY, never serialized back out
    /// IANA zone name, e.g. "Europe/Zurich". Defaults to UTC.
    #[serde(default)]
    pub time_zone: Option<String>,
    /// Short weekday names ("Mon" .. "Sun"). Defaults to Mon-Fri.
    #[serde(default)]
    pub working_days: Option<Vec<String>>,
    /// Chance that the mock provider reports a whole day as busy.
    #[serde(default)]
    pub block_probability: Option<f64>,
    /// Simulated latency of the mock provider's create call.
    #[serde(default)]
    pub booking_delay_ms: Option<u64>,
}

fn default_calendar_id() -> String {
    DEFAULT_CALENDAR_ID.to_string()
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            calendar_id: default_calendar_id(),
            client_email: None,
            private_key: None,
            time_zone: None,
            working_days: None,
            block_probability: None,
            booking_delay_ms: None,
        }
    }
}

impl CalendarConfig {
    /// True when both service-account fields are present and non-empty.
    pub fn has_credentials(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.client_email) && present(&self.private_key)
    }
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    #[serde(default)]
    pub log_level: Option<String>,

    // --- Runtime Flags ---
    #[serde(default)]
    pub use_calendar: bool,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub calendar: Option<CalendarConfig>,
}
