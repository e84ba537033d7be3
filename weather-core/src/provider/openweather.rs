use std::{fmt, sync::Arc, time::Duration};

use serde::Deserialize;
use serde_json::Value;

use crate::{
    cache::TtlCache,
    error::WeatherError,
    model::Coordinate,
    retry::{RawResponse, ReqwestTransport, RetryPolicy, Transport, get_with_retry},
};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Entries requested from the forecast endpoint; local truncation keeps 8.
const FORECAST_COUNT: u32 = 10;

/// The three OpenWeather endpoints this client talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub geocode: String,
    pub weather: String,
    pub forecast: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::with_base(DEFAULT_BASE_URL)
    }
}

impl Endpoints {
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            geocode: format!("{base}/geo/1.0/direct"),
            weather: format!("{base}/data/2.5/weather"),
            forecast: format!("{base}/data/2.5/forecast"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwGeocodeHit {
    lat: f64,
    lon: f64,
}

pub struct OpenWeatherClient {
    api_key: String,
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
    endpoints: Endpoints,
    geocode_cache: TtlCache<String, Option<Coordinate>>,
    current_cache: TtlCache<(u64, u64), Value>,
    forecast_cache: TtlCache<(u64, u64), Value>,
}

impl fmt::Debug for OpenWeatherClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenWeatherClient")
            .field("api_key", &"<redacted>")
            .field("policy", &self.policy)
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self::builder(api_key).build()
    }

    pub fn builder(api_key: String) -> OpenWeatherClientBuilder {
        OpenWeatherClientBuilder {
            api_key,
            transport: None,
            policy: RetryPolicy::default(),
            endpoints: Endpoints::default(),
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }

    /// Resolve a city name to the provider's top match.
    ///
    /// `Ok(None)` means the provider knows no such place, which is an ordinary
    /// outcome rather than a failure.
    pub async fn geocode(&self, city: &str) -> Result<Option<Coordinate>, WeatherError> {
        let key = city.trim().to_string();
        self.geocode_cache
            .get_or_try_compute(key, || async {
                let params = [
                    ("q", city.trim().to_string()),
                    ("limit", "1".to_string()),
                    ("appid", self.api_key.clone()),
                ];
                let res = self.get_json(&self.endpoints.geocode, &params).await?;
                let hits: Vec<OwGeocodeHit> = serde_json::from_value(res)?;

                let found = hits.first().map(|hit| Coordinate::new(hit.lat, hit.lon));
                tracing::debug!(city, ?found, "geocoded");
                Ok::<_, WeatherError>(found)
            })
            .await
    }

    pub async fn fetch_current(&self, at: Coordinate) -> Result<Value, WeatherError> {
        self.current_cache
            .get_or_try_compute(at.cache_key(), || async {
                let params = self.coordinate_params(at, &[]);
                self.get_json(&self.endpoints.weather, &params).await
            })
            .await
    }

    pub async fn fetch_forecast(&self, at: Coordinate) -> Result<Value, WeatherError> {
        self.forecast_cache
            .get_or_try_compute(at.cache_key(), || async {
                let params = self.coordinate_params(at, &[("cnt", FORECAST_COUNT.to_string())]);
                self.get_json(&self.endpoints.forecast, &params).await
            })
            .await
    }

    fn coordinate_params(
        &self,
        at: Coordinate,
        extra: &[(&'static str, String)],
    ) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("lat", query_float(at.lat)),
            ("lon", query_float(at.lon)),
            ("appid", self.api_key.clone()),
            ("units", "metric".to_string()),
        ];
        params.extend_from_slice(extra);
        params
    }

    async fn get_json(&self, url: &str, params: &[(&str, String)]) -> Result<Value, WeatherError> {
        let res = get_with_retry(self.transport.as_ref(), url, params, &self.policy).await?;
        ensure_success(&res)?;
        res.json()
    }
}

/// Decimal text that always keeps a fractional part: `1.0`, not `1`.
fn query_float(v: f64) -> String {
    format!("{v:?}")
}

fn ensure_success(res: &RawResponse) -> Result<(), WeatherError> {
    if res.is_success() {
        return Ok(());
    }

    tracing::warn!(status = res.status, body = %truncate_body(&res.body), "provider rejected request");
    Err(WeatherError::Provider { status: res.status })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

pub struct OpenWeatherClientBuilder {
    api_key: String,
    transport: Option<Arc<dyn Transport>>,
    policy: RetryPolicy,
    endpoints: Endpoints,
    cache_ttl: Duration,
}

impl OpenWeatherClientBuilder {
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn build(self) -> OpenWeatherClient {
        OpenWeatherClient {
            api_key: self.api_key,
            transport: self.transport.unwrap_or_else(|| Arc::new(ReqwestTransport::new())),
            policy: self.policy,
            endpoints: self.endpoints,
            geocode_cache: TtlCache::new(self.cache_ttl),
            current_cache: TtlCache::new(self.cache_ttl),
            forecast_cache: TtlCache::new(self.cache_ttl),
        }
    }
}
