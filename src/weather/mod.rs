//! Weather/Schedule Panel
//!
//! Current conditions and a 5-day/3-hour forecast from OpenWeatherMap, the
//! chart series derived from them, and the panel that switches between the
//! weather view and the booking calendar.

mod model;
mod panel;
mod series;

#[cfg(feature = "native")]
mod client;

pub use model::{
    icon_class, City, Condition, CurrentConditions, CurrentSummary, Forecast, ForecastEntry,
    Readings, Rain, WeatherReport,
};
pub use panel::{PanelContent, PanelView, WeatherDisplay, WeatherPanel, DISPLAY_ERROR, LOAD_ERROR};
pub use series::{local_time, DailyPoint, HourlyPoint, WeatherCharts};

#[cfg(feature = "native")]
pub use client::HttpWeatherSource;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::WeatherConfig;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Weather API returned HTTP {status} for {endpoint}")]
    Status { status: u16, endpoint: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Invalid weather data: {0}")]
    InvalidShape(String),
}

impl From<serde_json::Error> for WeatherError {
    fn from(e: serde_json::Error) -> Self {
        WeatherError::Decode(e.to_string())
    }
}

/// Anything that can supply OpenWeatherMap documents
#[async_trait(?Send)]
pub trait WeatherSource {
    async fn current(&self) -> Result<CurrentConditions, WeatherError>;
    async fn forecast(&self) -> Result<Forecast, WeatherError>;
}

/// Current conditions first, then the forecast
pub async fn fetch_report<S: WeatherSource + ?Sized>(source: &S) -> Result<WeatherReport, WeatherError> {
    let current = source.current().await?;
    let forecast = source.forecast().await?;
    Ok(WeatherReport { current, forecast })
}

/// `{base_url}/{endpoint}?lat=..&lon=..&appid=..&units=..`
pub fn endpoint_url(config: &WeatherConfig, endpoint: &str) -> String {
    format!(
        "{}/{}?lat={}&lon={}&appid={}&units={}",
        config.base_url.trim_end_matches('/'),
        endpoint,
        config.lat,
        config.lon,
        urlencoding::encode(&config.api_key),
        urlencoding::encode(&config.units),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url() {
        let config = WeatherConfig {
            api_key: "abc123".into(),
            ..WeatherConfig::default()
        };
        assert_eq!(
            endpoint_url(&config, "forecast"),
            "https://api.openweathermap.org/data/2.5/forecast?lat=30.2672&lon=-97.7431&appid=abc123&units=imperial"
        );
    }
}
