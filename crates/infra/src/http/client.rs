//! Retrying HTTP client used by external lookups

use std::time::Duration;

use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shiftclock_domain::{Result, ShiftClockError};
use tracing::debug;
use url::Url;

use crate::errors::InfraError;

const DEFAULT_USER_AGENT: &str = concat!("shiftclock/", env!("CARGO_PKG_VERSION"));

/// HTTP client with a per-request timeout and retries on transport failures
/// and 5xx responses.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    max_attempts: usize,
    base_backoff: Duration,
}

impl HttpClient {
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client.request(method, url)
    }

    /// GET `url` and decode a JSON body. Non-success statuses (after
    /// retries) become domain errors.
    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.send(self.request(Method::GET, url)).await?;
        let response = response.error_for_status().map_err(InfraError::from)?;
        let body = response.json::<T>().await.map_err(InfraError::from)?;
        Ok(body)
    }

    /// Execute `builder`, retrying while attempts remain.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let request = builder
                .try_clone()
                .ok_or_else(|| ShiftClockError::Internal("request body is not cloneable".into()))?
                .build()
                .map_err(InfraError::from)?;
            let url = request.url().clone();
            debug!(attempt, url = %redact(&url), "sending HTTP request");

            let retries_left = attempt < attempts;
            match self.client.execute(request).await {
                Ok(response) if response.status().is_server_error() && retries_left => {
                    debug!(attempt, status = %response.status(), "retrying after server error");
                }
                Ok(response) => return Ok(response),
                Err(err) if retries_left && is_transient(&err) => {
                    debug!(attempt, error = %err, "retrying after transport error");
                }
                Err(err) => return Err(InfraError::from(err).into()),
            }

            let delay = self.backoff(attempt);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }

    /// Exponential backoff after the `attempt`-th try, capped at 2^8.
    fn backoff(&self, attempt: usize) -> Duration {
        let exponent = attempt.saturating_sub(1).min(8) as u32;
        self.base_backoff.saturating_mul(1u32 << exponent)
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
    user_agent: String,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_attempts: 2,
            base_backoff: Duration::from_millis(100),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Total number of attempts (initial try + retries).
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    pub fn build(self) -> Result<HttpClient> {
        let client = ReqwestClient::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent)
            .no_proxy()
            .build()
            .map_err(InfraError::from)?;

        Ok(HttpClient { client, max_attempts: self.max_attempts, base_backoff: self.base_backoff })
    }
}

fn is_transient(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}

/// The URL without its query string, which may carry credentials.
fn redact(url: &Url) -> String {
    let mut clean = url.clone();
    clean.set_query(None);
    clean.to_string()
}
