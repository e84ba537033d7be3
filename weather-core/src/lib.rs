//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - HTTP retrieval with retry/backoff and a TTL response cache
//! - Normalization of OpenWeather payloads into metric records
//! - Unit conversion and display-unit views over those records
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod retry;
pub mod service;
pub mod units;

pub use config::Config;
pub use error::{Severity, WeatherError};
pub use model::{
    Coordinate, CurrentConditions, CurrentReading, ForecastPoint, ForecastReading, UnitSystem,
    WeatherReport,
};
pub use provider::OpenWeatherClient;
pub use service::WeatherService;
