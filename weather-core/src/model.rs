use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::units::{celsius_to_fahrenheit, kph_to_mph};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Exact-bit key, so the same provider coordinate always hits the same cache slot.
    pub fn cache_key(&self) -> (u64, u64) {
        (self.lat.to_bits(), self.lon.to_bits())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "°C",
            UnitSystem::Imperial => "°F",
        }
    }

    pub fn wind_label(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "km/h",
            UnitSystem::Imperial => "mph",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            UnitSystem::Metric => UnitSystem::Imperial,
            UnitSystem::Imperial => UnitSystem::Metric,
        }
    }

    fn temperature(&self, celsius: Option<f64>) -> Option<f64> {
        match self {
            UnitSystem::Metric => celsius,
            UnitSystem::Imperial => celsius_to_fahrenheit(celsius),
        }
    }

    fn wind(&self, kph: Option<f64>) -> Option<f64> {
        match self {
            UnitSystem::Metric => kph,
            UnitSystem::Imperial => kph_to_mph(kph),
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitSystem {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported: metric, imperial."
            )),
        }
    }
}

/// Current conditions, always in metric units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub description: String,
    pub icon_code: Option<String>,
    pub temp_c: Option<f64>,
    pub feels_like_c: Option<f64>,
    pub humidity_pct: Option<u8>,
    pub wind_speed_kph: Option<f64>,
    pub place_name: String,
    pub country_code: String,
}

/// One 3-hour forecast slot, always in metric units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Provider's `YYYY-MM-DD HH:MM:SS` text, passed through untouched.
    pub timestamp: String,
    pub temp_c: Option<f64>,
    pub description: String,
    pub icon_code: Option<String>,
    pub wind_speed_kph: Option<f64>,
}

/// Current conditions expressed in a chosen unit system.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentReading<'a> {
    pub units: UnitSystem,
    pub description: &'a str,
    pub icon_code: Option<&'a str>,
    pub temperature: Option<f64>,
    pub feels_like: Option<f64>,
    pub humidity_pct: Option<u8>,
    pub wind_speed: Option<f64>,
    pub place_name: &'a str,
    pub country_code: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastReading<'a> {
    pub units: UnitSystem,
    pub timestamp: &'a str,
    pub temperature: Option<f64>,
    pub description: &'a str,
    pub icon_code: Option<&'a str>,
    pub wind_speed: Option<f64>,
}

impl CurrentConditions {
    /// View these conditions in `units`. The record itself is never modified.
    pub fn in_units(&self, units: UnitSystem) -> CurrentReading<'_> {
        CurrentReading {
            units,
            description: &self.description,
            icon_code: self.icon_code.as_deref(),
            temperature: units.temperature(self.temp_c),
            feels_like: units.temperature(self.feels_like_c),
            humidity_pct: self.humidity_pct,
            wind_speed: units.wind(self.wind_speed_kph),
            place_name: &self.place_name,
            country_code: &self.country_code,
        }
    }
}

impl ForecastPoint {
    pub fn in_units(&self, units: UnitSystem) -> ForecastReading<'_> {
        ForecastReading {
            units,
            timestamp: &self.timestamp,
            temperature: units.temperature(self.temp_c),
            description: &self.description,
            icon_code: self.icon_code.as_deref(),
            wind_speed: units.wind(self.wind_speed_kph),
        }
    }
}

/// Everything one city query produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub current: CurrentConditions,
    pub forecast: Vec<ForecastPoint>,
}

impl WeatherReport {
    pub fn in_units(&self, units: UnitSystem) -> (CurrentReading<'_>, Vec<ForecastReading<'_>>) {
        let current = self.current.in_units(units);
        let forecast = self.forecast.iter().map(|p| p.in_units(units)).collect();
        (current, forecast)
    }
}
