//! Configuration management

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DB_POOL_SIZE, DEFAULT_PAGE_SIZE, DEFAULT_TIMEZONE_LOOKUP_TIMEOUT_MS,
    DEFAULT_ZONE_MATCH_DISTANCE_KM, TIMEZONEDB_API_URL,
};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub timezone: TimezoneConfig,
    #[serde(default)]
    pub shifts: ShiftConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: "shiftclock.db".to_string(), pool_size: DEFAULT_DB_POOL_SIZE }
    }
}

/// Timezone resolution configuration
///
/// The external lookup tier is only consulted when `api_key` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimezoneConfig {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub timeout_ms: u64,
    pub max_match_distance_km: f64,
}

impl Default for TimezoneConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: TIMEZONEDB_API_URL.to_string(),
            timeout_ms: DEFAULT_TIMEZONE_LOOKUP_TIMEOUT_MS,
            max_match_distance_km: DEFAULT_ZONE_MATCH_DISTANCE_KM,
        }
    }
}

/// Shift query configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShiftConfig {
    pub default_page_size: u32,
}

impl Default for ShiftConfig {
    fn default() -> Self {
        Self { default_page_size: DEFAULT_PAGE_SIZE }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}
