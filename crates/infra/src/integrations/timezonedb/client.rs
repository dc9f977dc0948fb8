//! TimezoneDB API client for coordinate-to-zone lookups

use std::time::Duration;

use async_trait::async_trait;
use shiftclock_core::TimezoneLookup;
use shiftclock_domain::{Coordinate, Result, ShiftClockError, TimezoneConfig};
use tracing::debug;
use url::Url;

use super::types::TimezoneDbResponse;
use crate::http::HttpClient;

const LOOKUP_PATH: &str = "v2.1/get-time-zone";
const LOOKUP_ATTEMPTS: u32 = 2;
const MAX_RETRY_BACKOFF: Duration = Duration::from_millis(50);

/// Per-attempt timeout and retry backoff such that every attempt plus the
/// pause between them fits inside the resolver's overall `timeout_ms`.
fn attempt_budget(timeout_ms: u64) -> (Duration, Duration) {
    let total = Duration::from_millis(timeout_ms.max(1));
    let backoff = (total / 10).min(MAX_RETRY_BACKOFF);
    let per_attempt = (total - backoff) / LOOKUP_ATTEMPTS;
    (per_attempt.max(Duration::from_millis(1)), backoff)
}

/// TimezoneDB `get-time-zone` client
pub struct TimezoneDbClient {
    http_client: HttpClient,
    api_key: String,
    endpoint: Url,
}

impl TimezoneDbClient {
    /// Create a client against `base_url` (e.g. `http://api.timezonedb.com`).
    pub fn new(api_key: String, base_url: &str, http_client: HttpClient) -> Result<Self> {
        let base = Url::parse(base_url).map_err(|err| {
            ShiftClockError::Config(format!("invalid timezone API url '{base_url}': {err}"))
        })?;
        let endpoint = base.join(LOOKUP_PATH).map_err(|err| {
            ShiftClockError::Config(format!("invalid timezone API url '{base_url}': {err}"))
        })?;
        Ok(Self { http_client, api_key, endpoint })
    }

    /// Build a client from configuration. `None` when no API key is set,
    /// which disables the lookup tier.
    pub fn from_config(config: &TimezoneConfig) -> Result<Option<Self>> {
        let Some(api_key) = config.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
        else {
            return Ok(None);
        };

        let (per_attempt, backoff) = attempt_budget(config.timeout_ms);
        let http_client = HttpClient::builder()
            .timeout(per_attempt)
            .max_attempts(LOOKUP_ATTEMPTS as usize)
            .base_backoff(backoff)
            .build()?;

        Self::new(api_key.to_string(), &config.api_base_url, http_client).map(Some)
    }

    fn request_url(&self, coordinate: Coordinate) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("key", &self.api_key)
            .append_pair("format", "json")
            .append_pair("by", "position")
            .append_pair("lat", &coordinate.latitude.to_string())
            .append_pair("lng", &coordinate.longitude.to_string());
        url
    }
}

#[async_trait]
impl TimezoneLookup for TimezoneDbClient {
    async fn lookup_timezone(&self, coordinate: Coordinate) -> Result<Option<String>> {
        let response: TimezoneDbResponse =
            self.http_client.get_json(self.request_url(coordinate)).await?;

        match response.zone() {
            Some(zone) => Ok(Some(zone.to_string())),
            None => {
                debug!(status = %response.status, message = %response.message, "timezonedb had no answer");
                Ok(None)
            }
        }
    }
}
