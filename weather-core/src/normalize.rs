//! Flatten OpenWeather payloads into fixed-shape records.
//!
//! Any field may be missing at any depth; missing text becomes `"n/a"` (or an
//! empty place/country/timestamp) and missing numbers become `None`. An
//! explicit `null` counts as missing, for objects, lists and list entries alike.
//! A field that is present but has the wrong JSON type is a malformed payload.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::{
    error::WeatherError,
    model::{CurrentConditions, ForecastPoint},
    units::mps_to_kph,
};

/// Forecast slots kept from the provider list: 8 × 3h covers the next day.
pub const FORECAST_POINTS: usize = 8;

const UNAVAILABLE: &str = "n/a";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwMain {
    temp: Option<f64>,
    feels_like: Option<f64>,
    /// Percent; some stations report it as a float.
    humidity: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwWeather {
    description: Option<String>,
    icon: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwWind {
    /// Meters per second.
    speed: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwCurrentResponse {
    name: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    main: OwMain,
    #[serde(deserialize_with = "null_as_default")]
    weather: Vec<Option<OwWeather>>,
    #[serde(deserialize_with = "null_as_default")]
    wind: OwWind,
    #[serde(deserialize_with = "null_as_default")]
    sys: OwSys,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwForecastEntry {
    dt_txt: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    main: OwMain,
    #[serde(deserialize_with = "null_as_default")]
    weather: Vec<Option<OwWeather>>,
    #[serde(deserialize_with = "null_as_default")]
    wind: OwWind,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwForecastResponse {
    #[serde(deserialize_with = "null_as_default")]
    list: Vec<Option<OwForecastEntry>>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn first(weather: &[Option<OwWeather>]) -> Option<&OwWeather> {
    weather.first().and_then(Option::as_ref)
}

fn description(weather: &[Option<OwWeather>]) -> String {
    first(weather)
        .and_then(|w| w.description.as_deref())
        .map(title_case)
        .unwrap_or_else(|| UNAVAILABLE.to_string())
}

fn icon(weather: &[Option<OwWeather>]) -> Option<String> {
    first(weather).and_then(|w| w.icon.clone())
}

fn humidity(pct: Option<f64>) -> Option<u8> {
    pct.map(|v| v.round().clamp(0.0, 100.0) as u8)
}

pub fn normalize_current(raw: &Value) -> Result<CurrentConditions, WeatherError> {
    let parsed = OwCurrentResponse::deserialize(raw)?;

    Ok(CurrentConditions {
        description: description(&parsed.weather),
        icon_code: icon(&parsed.weather),
        temp_c: parsed.main.temp,
        feels_like_c: parsed.main.feels_like,
        humidity_pct: humidity(parsed.main.humidity),
        wind_speed_kph: mps_to_kph(parsed.wind.speed),
        place_name: parsed.name.unwrap_or_default(),
        country_code: parsed.sys.country.unwrap_or_default(),
    })
}

/// The first [`FORECAST_POINTS`] entries, in provider order.
pub fn normalize_forecast(raw: &Value) -> Result<Vec<ForecastPoint>, WeatherError> {
    let parsed = OwForecastResponse::deserialize(raw)?;

    let points = parsed
        .list
        .into_iter()
        .take(FORECAST_POINTS)
        .map(Option::unwrap_or_default)
        .map(|entry| ForecastPoint {
            description: description(&entry.weather),
            icon_code: icon(&entry.weather),
            timestamp: entry.dt_txt.unwrap_or_default(),
            temp_c: entry.main.temp,
            wind_speed_kph: mps_to_kph(entry.wind.speed),
        })
        .collect();

    Ok(points)
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;

    for ch in text.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }

    out
}
