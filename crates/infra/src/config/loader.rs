//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the required ones are missing, falls back to a config file
//! 3. Searches several paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `SHIFTCLOCK_DB_PATH`: Database file path (required)
//! - `SHIFTCLOCK_DB_POOL_SIZE`: Connection pool size (required)
//! - `SHIFTCLOCK_TIMEZONE_API_URL`: TimezoneDB base URL
//! - `SHIFTCLOCK_TIMEZONE_TIMEOUT_MS`: External lookup timeout
//! - `SHIFTCLOCK_DEFAULT_PAGE_SIZE`: Default list page size
//! - `SHIFTCLOCK_LOG_LEVEL`: Log filter directive (e.g. `info`)
//! - `SHIFTCLOCK_LOG_JSON`: Emit JSON logs (true/false)
//! - `TIMEZONEDB_API_KEY`: TimezoneDB credential; enables the lookup tier
//!
//! `TIMEZONEDB_API_KEY` is also applied on top of a file-loaded config, so
//! the credential never has to live in a file.
//!
//! ## File Locations
//! The loader searches `config.{json,toml}` and `shiftclock.{json,toml}` in
//! the working directory and its two parents, then next to the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use shiftclock_domain::constants::TIMEZONEDB_API_KEY_ENV;
use shiftclock_domain::{
    Config, DatabaseConfig, LoggingConfig, Result, ShiftClockError, ShiftConfig, TimezoneConfig,
};

const CONFIG_FILE_NAMES: &[&str] =
    &["config.json", "config.toml", "shiftclock.json", "shiftclock.toml"];

/// Load configuration, environment first, then file.
///
/// # Errors
/// Returns `ShiftClockError::Config` if neither source yields a valid
/// configuration.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// `SHIFTCLOCK_DB_PATH` and `SHIFTCLOCK_DB_POOL_SIZE` are required; every
/// other setting falls back to its default.
pub fn load_from_env() -> Result<Config> {
    let database = DatabaseConfig {
        path: env_var("SHIFTCLOCK_DB_PATH")?,
        pool_size: env_parse("SHIFTCLOCK_DB_POOL_SIZE", "pool size")?,
    };

    let defaults = TimezoneConfig::default();
    let timezone = TimezoneConfig {
        api_key: env_api_key(),
        api_base_url: env_opt("SHIFTCLOCK_TIMEZONE_API_URL").unwrap_or(defaults.api_base_url),
        timeout_ms: env_parse_or(
            "SHIFTCLOCK_TIMEZONE_TIMEOUT_MS",
            "timezone timeout",
            defaults.timeout_ms,
        )?,
        max_match_distance_km: defaults.max_match_distance_km,
    };

    let shifts = ShiftConfig {
        default_page_size: env_parse_or(
            "SHIFTCLOCK_DEFAULT_PAGE_SIZE",
            "default page size",
            ShiftConfig::default().default_page_size,
        )?,
    };

    let log_defaults = LoggingConfig::default();
    let logging = LoggingConfig {
        level: env_opt("SHIFTCLOCK_LOG_LEVEL").unwrap_or(log_defaults.level),
        json: env_bool("SHIFTCLOCK_LOG_JSON", log_defaults.json),
    };

    Ok(Config { database, timezone, shifts, logging })
}

/// Load configuration from a file
///
/// If `path` is `None`, searches the standard locations via
/// [`discover_config_path`]. Format is chosen by extension.
///
/// # Errors
/// Returns `ShiftClockError::Config` if the file is missing, unreadable or
/// malformed.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) if p.exists() => p,
        Some(p) => {
            return Err(ShiftClockError::Config(format!(
                "Config file not found: {}",
                p.display()
            )))
        }
        None => discover_config_path().ok_or_else(|| {
            ShiftClockError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ShiftClockError::Config(format!("Failed to read config file: {e}")))?;

    let mut config = parse_config(&contents, &config_path)?;
    if let Some(key) = env_api_key() {
        config.timezone.api_key = Some(key);
    }
    Ok(config)
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ShiftClockError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ShiftClockError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(ShiftClockError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// First existing config file among the standard locations.
pub fn discover_config_path() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }
    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf))
    {
        dirs.push(exe_dir);
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| ShiftClockError::Config(format!("Missing required environment variable: {key}")))
}

/// Non-empty value of an optional variable.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn env_api_key() -> Option<String> {
    env_opt(TIMEZONEDB_API_KEY_ENV)
}

fn env_parse<T>(key: &str, what: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_var(key)?
        .trim()
        .parse::<T>()
        .map_err(|e| ShiftClockError::Config(format!("Invalid {what}: {e}")))
}

fn env_parse_or<T>(key: &str, what: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_opt(key) {
        Some(_) => env_parse(key, what),
        None => Ok(default),
    }
}

/// Parse a boolean flag
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
