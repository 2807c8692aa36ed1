//! Environment variable handling for Datebook.
//!
//! Everything structural is read through the `config` crate using the
//! `DATEBOOK__SECTION__KEY` pattern. The calendar provider credentials are
//! additionally accepted under the plain names a Google service account setup
//! uses, so an existing `.env` keeps working.

use std::env;

use crate::models::{AppConfig, CalendarConfig};

/// The default prefix for configuration environment variables
pub const DEFAULT_PREFIX: &str = "DATEBOOK";

/// The separator for configuration environment variables
pub const CONFIG_SEPARATOR: &str = "__";

pub const CALENDAR_ID_VAR: &str = "GOOGLE_CALENDAR_ID";
pub const CLIENT_EMAIL_VAR: &str = "GOOGLE_CLIENT_EMAIL";
pub const PRIVATE_KEY_VAR: &str = "GOOGLE_PRIVATE_KEY";

/// Get the prefix for configuration environment variables
pub fn get_config_prefix() -> String {
    env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string())
}

/// Convert a configuration path to an environment variable name
///
/// # Arguments
///
/// * `path` - The configuration path (e.g., "server.port")
///
/// # Returns
///
/// The environment variable name (e.g., "DATEBOOK__SERVER__PORT")
pub fn config_path_to_env_var(path: &str) -> String {
    let prefix = get_config_prefix();
    let path = path.replace('.', CONFIG_SEPARATOR);
    format!("{}{}{}", prefix, CONFIG_SEPARATOR, path).to_uppercase()
}

/// Private keys pasted into a single env line carry literal `\n` sequences.
pub fn normalize_private_key(raw: &str) -> String {
    raw.replace("\\n", "\n")
}

/// Applies `GOOGLE_*` overrides from the process environment.
pub fn apply_calendar_env_overrides(config: AppConfig) -> AppConfig {
    apply_calendar_overrides(config, |name| env::var(name).ok())
}

/// Applies `GOOGLE_*` overrides using `lookup` to resolve variable names.
///
/// Empty values are ignored. A missing `calendar` section is created when any
/// override is present.
pub fn apply_calendar_overrides<F>(mut config: AppConfig, lookup: F) -> AppConfig
where
    F: Fn(&str) -> Option<String>,
{
    let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    let calendar_id = read(CALENDAR_ID_VAR);
    let client_email = read(CLIENT_EMAIL_VAR);
    let private_key = read(PRIVATE_KEY_VAR).map(|k| normalize_private_key(&k));

    if calendar_id.is_none() && client_email.is_none() && private_key.is_none() {
        return config;
    }

    let calendar = config.calendar.get_or_insert_with(CalendarConfig::default);
    if let Some(id) = calendar_id {
        calendar.calendar_id = id;
    }
    if client_email.is_some() {
        calendar.client_email = client_email;
    }
    if private_key.is_some() {
        calendar.private_key = private_key;
    }
    config
}
