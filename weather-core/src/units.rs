//! Temperature and wind speed conversions.
//!
//! Unknown values stay unknown: every function maps `None` to `None`.
//! Nothing here rounds; that is left to whoever displays the value.

const KPH_PER_MPS: f64 = 3.6;
const MPH_PER_KPH: f64 = 0.621371;

pub fn celsius_to_fahrenheit(c: Option<f64>) -> Option<f64> {
    c.map(|c| c * 9.0 / 5.0 + 32.0)
}

pub fn mps_to_kph(mps: Option<f64>) -> Option<f64> {
    mps.map(|v| v * KPH_PER_MPS)
}

pub fn kph_to_mph(kph: Option<f64>) -> Option<f64> {
    kph.map(|v| v * MPH_PER_KPH)
}
