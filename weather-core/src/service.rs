use crate::{
    error::WeatherError,
    model::WeatherReport,
    normalize::{normalize_current, normalize_forecast},
    provider::openweather::OpenWeatherClient,
};

/// Turns a city name into a metric [`WeatherReport`].
#[derive(Debug)]
pub struct WeatherService {
    client: OpenWeatherClient,
}

impl WeatherService {
    pub fn new(client: OpenWeatherClient) -> Self {
        Self { client }
    }

    pub async fn lookup(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::EmptyCity);
        }

        let at = self
            .client
            .geocode(city)
            .await?
            .ok_or_else(|| WeatherError::CityNotFound(city.to_string()))?;

        let (current, forecast) =
            tokio::try_join!(self.client.fetch_current(at), self.client.fetch_forecast(at))?;

        let report = WeatherReport {
            current: normalize_current(&current)?,
            forecast: normalize_forecast(&forecast)?,
        };

        tracing::info!(
            city,
            lat = at.lat,
            lon = at.lon,
            forecast_points = report.forecast.len(),
            "weather report ready"
        );

        Ok(report)
    }
}
