use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::PathBuf;
use tracing::debug;

pub mod env_vars;
pub mod models;
pub use models::*;

/// Loads the application configuration.
///
/// Sources, later ones winning:
/// 1. built-in defaults
/// 2. `$CONFIG_DIR/default.*` (optional, `CONFIG_DIR` defaults to `config`)
/// 3. `$CONFIG_DIR/$RUN_ENV.*` (optional, `RUN_ENV` defaults to `debug`)
/// 4. `DATEBOOK__SECTION__KEY` environment variables
/// 5. `GOOGLE_CALENDAR_ID`, `GOOGLE_CLIENT_EMAIL`, `GOOGLE_PRIVATE_KEY`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env_vars::get_config_prefix();
    let config_dir = PathBuf::from(env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string()));

    let default_path = config_dir.join("default");
    let env_path = config_dir.join(&run_env);
    debug!(
        "Loading config from {} and {} (override e.g. with {})",
        default_path.display(),
        env_path.display(),
        env_vars::config_path_to_env_var("server.port")
    );

    let builder = with_defaults(Config::builder())?
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(
            Environment::with_prefix(&prefix)
                .separator(env_vars::CONFIG_SEPARATOR)
                .try_parsing(true),
        );

    let raw_config: AppConfig = builder.build()?.try_deserialize()?;
    Ok(env_vars::apply_calendar_env_overrides(raw_config))
}

/// Registers the values used when no file or variable sets them.
pub fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    builder
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 3000_i64)?
        .set_default("log_level", "info")?
        .set_default("use_calendar", true)?
        .set_default("calendar.calendar_id", DEFAULT_CALENDAR_ID)
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Loads the dotenv file into the process environment, once.
///
/// The path is taken from `DOTENV_OVERRIDE`, then from a first command line
/// argument starting with `.env`, and falls back to `.env`. A missing file is
/// not an error. Returns the path that was used.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env_vars::{
        apply_calendar_overrides, normalize_private_key, CALENDAR_ID_VAR, CLIENT_EMAIL_VAR,
        PRIVATE_KEY_VAR,
    };
    use std::collections::HashMap;

    fn defaults_only() -> AppConfig {
        with_defaults(Config::builder())
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults_deserialize() {
        let config = defaults_only();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.log_level.as_deref(), Some("info"));
        assert!(config.use_calendar);
        let calendar = config.calendar.expect("calendar section from defaults");
        assert_eq!(calendar.calendar_id, "primary");
        assert!(!calendar.has_credentials());
    }

    #[test]
    fn test_google_overrides_fill_calendar_section() {
        let vars: HashMap<&str, &str> = [
            (CALENDAR_ID_VAR, "dates@example.com"),
            (CLIENT_EMAIL_VAR, "svc@project.iam.gserviceaccount.com"),
            (PRIVATE_KEY_VAR, "-----BEGIN-----\\nabc\\n-----END-----"),
        ]
        .into_iter()
        .collect();

        let mut config = defaults_only();
        config.calendar = None;
        let config = apply_calendar_overrides(config, |name| {
            vars.get(name).map(|v| v.to_string())
        });

        let calendar = config.calendar.unwrap();
        assert_eq!(calendar.calendar_id, "dates@example.com");
        assert!(calendar.has_credentials());
        assert_eq!(
            calendar.private_key.as_deref(),
            Some("-----BEGIN-----\nabc\n-----END-----")
        );
    }

    #[test]
    fn test_empty_overrides_are_ignored() {
        let config = apply_calendar_overrides(defaults_only(), |name| {
            (name == CALENDAR_ID_VAR).then(|| "  ".to_string())
        });

        assert_eq!(config.calendar.unwrap().calendar_id, "primary");
    }

    #[test]
    fn test_normalize_private_key() {
        assert_eq!(normalize_private_key("a\\nb"), "a\nb");
        assert_eq!(normalize_private_key("plain"), "plain");
    }

    #[test]
    fn test_config_path_to_env_var() {
        // PREFIX is not set by the test harness
        if env::var("PREFIX").is_err() {
            assert_eq!(
                env_vars::config_path_to_env_var("calendar.time_zone"),
                "DATEBOOK__CALENDAR__TIME_ZONE"
            );
        }
    }
}
