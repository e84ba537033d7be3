//! GET requests with a bounded, exponential retry policy.
//!
//! Retried:
//! - transport failures (connection refused, timeouts, DNS)
//! - 5xx responses
//!
//! Returned as-is, without retrying:
//! - 2xx and 4xx responses

use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use crate::error::WeatherError;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(800);

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_server_error(&self) -> bool {
        self.status >= 500
    }

    pub fn json(&self) -> Result<serde_json::Value, WeatherError> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// A request never produced a response.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(String);

impl TransportError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self(err.to_string())
    }
}

#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn get(
        &self,
        url: &str,
        params: &[(&str, String)],
        timeout: Duration,
    ) -> Result<RawResponse, TransportError>;
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self { http: Client::new() }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(
        &self,
        url: &str,
        params: &[(&str, String)],
        timeout: Duration,
    ) -> Result<RawResponse, TransportError> {
        let res = self.http.get(url).query(params).timeout(timeout).send().await?;

        let status = res.status().as_u16();
        let body = res.text().await?;

        Ok(RawResponse { status, body })
    }
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    timeout: Duration,
    base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            timeout: DEFAULT_TIMEOUT,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    /// `max_attempts` counts the first request too and must be at least 1.
    pub fn new(max_attempts: u32, timeout: Duration) -> Result<Self, WeatherError> {
        if max_attempts == 0 {
            return Err(WeatherError::InvalidConfig("max_retries must be at least 1".into()));
        }
        if timeout.is_zero() {
            return Err(WeatherError::InvalidConfig("timeout must be positive".into()));
        }

        Ok(Self { max_attempts, timeout, base_delay: DEFAULT_BASE_DELAY })
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Delay after failed attempt `attempt` (0-based): `base_delay * 2^attempt`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        2u32.checked_pow(attempt)
            .and_then(|factor| self.base_delay.checked_mul(factor))
            .unwrap_or(Duration::MAX)
    }
}

/// Issue a GET, retrying retryable failures according to `policy`.
///
/// When every attempt fails, the last failure is reported as
/// [`WeatherError::Network`].
pub async fn get_with_retry(
    transport: &dyn Transport,
    url: &str,
    params: &[(&str, String)],
    policy: &RetryPolicy,
) -> Result<RawResponse, WeatherError> {
    let mut last_error = String::new();

    for attempt in 0..policy.max_attempts {
        if attempt > 0 {
            let delay = policy.delay_for_attempt(attempt - 1);
            tracing::debug!(url, attempt, ?delay, "backing off before retry");
            tokio::time::sleep(delay).await;
        }

        match transport.get(url, params, policy.timeout).await {
            Ok(res) if res.is_server_error() => {
                tracing::warn!(
                    url,
                    status = res.status,
                    "attempt {} of {} hit a server error",
                    attempt + 1,
                    policy.max_attempts
                );
                last_error = format!("server {}", res.status);
            }
            Ok(res) => return Ok(res),
            Err(err) => {
                tracing::warn!(
                    url,
                    error = %err,
                    "attempt {} of {} failed",
                    attempt + 1,
                    policy.max_attempts
                );
                last_error = err.to_string();
            }
        }
    }

    tracing::error!(url, "all {} attempts exhausted", policy.max_attempts);
    Err(WeatherError::Network(last_error))
}
