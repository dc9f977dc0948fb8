//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Geodesy
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

// Timezones
pub const FALLBACK_TIMEZONE: &str = "UTC";
pub const DEFAULT_LOCAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DEFAULT_ZONE_MATCH_DISTANCE_KM: f64 = 1_500.0;
pub const TIMEZONEDB_API_URL: &str = "http://api.timezonedb.com";
pub const DEFAULT_TIMEZONE_LOOKUP_TIMEOUT_MS: u64 = 3_000;
pub const TIMEZONEDB_API_KEY_ENV: &str = "TIMEZONEDB_API_KEY";

// Shift validation
pub const MIN_GEOFENCE_RADIUS_METERS: u32 = 1;
pub const MAX_WEEKDAY_CODE_LENGTH: usize = 3;
pub const MAX_TIMEZONE_ID_LENGTH: usize = 100;

// Queries
pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 15;

// Storage
pub const DEFAULT_DB_POOL_SIZE: u32 = 8;
