//! TimezoneDB API wire types

use serde::{Deserialize, Serialize};

/// Status value of a successful lookup
pub const STATUS_OK: &str = "OK";

/// Response body of `GET /v2.1/get-time-zone`
///
/// Only the fields the lookup needs are decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimezoneDbResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub zone_name: Option<String>,
}

impl TimezoneDbResponse {
    /// The zone identifier, when the response is a usable answer.
    pub fn zone(&self) -> Option<&str> {
        if self.status != STATUS_OK {
            return None;
        }
        self.zone_name.as_deref().map(str::trim).filter(|zone| !zone.is_empty())
    }
}
