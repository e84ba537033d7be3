//! Plain-text rendering of a weather report.
//!
//! Rendering only formats what it is given: values arrive already converted
//! into the requested unit system and are rounded here for display.

use std::fmt::Write;

use weather_core::{CurrentReading, ForecastReading, UnitSystem, WeatherReport};

const ATTRIBUTION: &str = "Data: OpenWeatherMap (Geocoding, Current, 5-day/3-hour Forecast)";
const UNAVAILABLE: &str = "n/a";

pub fn render_report(report: &WeatherReport, units: UnitSystem) -> String {
    let (current, forecast) = report.in_units(units);

    let mut out = render_current(&current);
    out.push('\n');
    out.push_str(&render_forecast(&forecast));
    out.push('\n');
    out.push_str(ATTRIBUTION);
    out.push('\n');
    out
}

pub fn render_current(now: &CurrentReading<'_>) -> String {
    let units = now.units;
    let mut out = String::new();

    let _ = writeln!(out, "{}", heading(now.place_name, now.country_code));
    let _ = writeln!(out, "  {:<10}{:<8}{}", "Now", fmt_deg(now.temperature, units), now.description);
    let _ = writeln!(out, "  {:<10}{}", "Feels", fmt_deg(now.feels_like, units));
    let _ = writeln!(out, "  {:<10}{}", "Humidity", fmt_humidity(now.humidity_pct));
    let _ = writeln!(out, "  {:<10}{} {}", "Wind", fmt_num(now.wind_speed), units.wind_label());

    out
}

pub fn render_forecast(rows: &[ForecastReading<'_>]) -> String {
    let mut out = String::from("Next 24 hours\n");

    for row in rows {
        let _ = writeln!(
            out,
            "  {:<10}{:<8}{:<24}{} {}",
            time_of_day(row.timestamp),
            fmt_deg(row.temperature, row.units),
            row.description,
            fmt_num(row.wind_speed),
            row.units.wind_label(),
        );
    }

    out
}

fn heading(place: &str, country: &str) -> String {
    let joined = format!("{place}, {country}");
    let trimmed = joined.trim_matches(|c| c == ',' || c == ' ');
    if trimmed.is_empty() { "Current".to_string() } else { trimmed.to_string() }
}

/// `"2025-06-01 15:00:00"` → `"15:00:00"`; anything without a space is shown as-is.
pub fn time_of_day(timestamp: &str) -> &str {
    match timestamp.split_once(' ') {
        Some((_, rest)) => rest.split(' ').next().unwrap_or(rest),
        None => timestamp,
    }
}

fn fmt_deg(v: Option<f64>, units: UnitSystem) -> String {
    match v {
        Some(v) => format!("{}{}", round(v), units.temperature_symbol()),
        None => UNAVAILABLE.to_string(),
    }
}

fn fmt_num(v: Option<f64>) -> String {
    v.map(|v| round(v).to_string()).unwrap_or_else(|| UNAVAILABLE.to_string())
}

fn fmt_humidity(v: Option<u8>) -> String {
    v.map(|v| format!("{v}%")).unwrap_or_else(|| UNAVAILABLE.to_string())
}

fn round(v: f64) -> i64 {
    v.round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use weather_core::{
        CurrentConditions, ForecastPoint, OpenWeatherClient, WeatherService,
        provider::Endpoints,
    };
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_report() -> WeatherReport {
        WeatherReport {
            current: CurrentConditions {
                description: "Scattered Clouds".into(),
                icon_code: Some("03d".into()),
                temp_c: Some(30.6),
                feels_like_c: Some(35.2),
                humidity_pct: Some(70),
                wind_speed_kph: Some(14.4),
                place_name: "Manila".into(),
                country_code: "PH".into(),
            },
            forecast: vec![
                ForecastPoint {
                    timestamp: "2025-06-01 15:00:00".into(),
                    temp_c: Some(29.4),
                    description: "Light Rain".into(),
                    icon_code: Some("10d".into()),
                    wind_speed_kph: Some(10.0),
                },
                ForecastPoint {
                    timestamp: "soon".into(),
                    temp_c: None,
                    description: "n/a".into(),
                    icon_code: None,
                    wind_speed_kph: None,
                },
            ],
        }
    }

    #[test]
    fn metric_block_rounds_and_labels() {
        let out = render_report(&sample_report(), UnitSystem::Metric);

        assert!(out.starts_with("Manila, PH\n"));
        assert!(out.contains("31°C"));
        assert!(out.contains("35°C"));
        assert!(out.contains("70%"));
        assert!(out.contains("14 km/h"));
        assert!(out.contains("15:00:00"));
        assert!(out.contains("soon"));
        assert!(out.contains(ATTRIBUTION));
    }

    #[test]
    fn imperial_block_converts_from_the_same_report() {
        let report = sample_report();
        let metric = render_report(&report, UnitSystem::Metric);
        let imperial = render_report(&report, UnitSystem::Imperial);
        let imperial_again = render_report(&report, UnitSystem::Imperial);

        // 30.6°C = 87.08°F, 14.4 km/h = 8.95 mph
        assert!(imperial.contains("87°F"));
        assert!(imperial.contains("9 mph"));
        assert_eq!(imperial, imperial_again);
        assert_ne!(metric, imperial);
    }

    #[test]
    fn missing_values_render_as_unavailable() {
        let mut report = sample_report();
        report.current.humidity_pct = None;
        report.current.wind_speed_kph = None;

        let (current, _) = report.in_units(UnitSystem::Metric);
        let out = render_current(&current);

        assert!(out.contains("Humidity  n/a"));
        assert!(out.contains("Wind      n/a km/h"));
    }

    #[test]
    fn heading_falls_back_when_place_is_unknown() {
        assert_eq!(heading("", ""), "Current");
        assert_eq!(heading("Manila", ""), "Manila");
        assert_eq!(heading("", "PH"), "PH");
    }

    #[test]
    fn time_of_day_takes_clock_portion() {
        assert_eq!(time_of_day("2025-06-01 03:00:00"), "03:00:00");
        assert_eq!(time_of_day("03:00"), "03:00");
        assert_eq!(time_of_day(""), "");
    }

    #[tokio::test]
    async fn manila_end_to_end_in_both_unit_systems() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .and(query_param("q", "Manila"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{"lat": 14.6, "lon": 120.98}])),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "weather": [{"description": "few clouds", "icon": "02d"}],
                "main": {"temp": 30.4, "feels_like": 36.0, "humidity": 74},
                "wind": {"speed": 5.0},
                "name": "Manila",
                "sys": {"country": "PH"}
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "list": [{
                    "dt_txt": "2025-06-01 18:00:00",
                    "main": {"temp": 28.0},
                    "weather": [{"description": "light rain"}],
                    "wind": {"speed": 2.5}
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenWeatherClient::builder("KEY".into())
            .endpoints(Endpoints::with_base(&server.uri()))
            .build();
        let service = WeatherService::new(client);

        let report = service.lookup("Manila").await.unwrap();

        let metric = render_report(&report, UnitSystem::Metric);
        assert!(metric.contains("Manila, PH"));
        assert!(metric.contains("30°C"));
        assert!(metric.contains("Few Clouds"));
        assert!(metric.contains("18 km/h"));
        assert!(metric.contains("18:00:00"));

        // 30.4°C = 86.72°F, 18 km/h = 11.18 mph
        let imperial = render_report(&report, UnitSystem::Imperial);
        assert!(imperial.contains("87°F"));
        assert!(imperial.contains("11 mph"));
    }
}
