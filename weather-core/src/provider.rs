//! Weather data providers.
//!
//! Only OpenWeather is supported; its client owns retrieval and response caching.

pub mod openweather;

pub use openweather::{Endpoints, OpenWeatherClient, OpenWeatherClientBuilder};
