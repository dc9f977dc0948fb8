//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for ShiftClock
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum ShiftClockError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(
        "Outside the allowed radius for this location: {distance_meters:.1}m from center, \
         limit {radius_meters}m"
    )]
    GeofenceViolation { distance_meters: f64, radius_meters: u32 },

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ShiftClockError {
    /// Whether the error was caused by the caller's request rather than a
    /// server-side failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::InvalidInput(_)
                | Self::GeofenceViolation { .. }
                | Self::InvalidTransition(_)
        )
    }
}

/// Result type alias for ShiftClock operations
pub type Result<T> = std::result::Result<T, ShiftClockError>;
