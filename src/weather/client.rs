//! OpenWeatherMap client backed by reqwest

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::{endpoint_url, CurrentConditions, Forecast, WeatherError, WeatherSource};
use crate::config::WeatherConfig;

pub struct HttpWeatherSource {
    client: Client,
    config: WeatherConfig,
}

impl HttpWeatherSource {
    pub fn new(config: WeatherConfig, timeout: Duration) -> Result<Self, WeatherError> {
        if config.api_key.is_empty() {
            tracing::warn!("No weather API key configured; requests will be rejected");
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WeatherError::Network(e.to_string()))?;

        Ok(Self { client, config })
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, WeatherError> {
        let url = endpoint_url(&self.config, endpoint);
        tracing::debug!("GET {}/{}", self.config.base_url, endpoint);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| WeatherError::Network(e.without_url().to_string()))?;

        if !response.status().is_success() {
            return Err(WeatherError::Status {
                status: response.status().as_u16(),
                endpoint: endpoint.to_string(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| WeatherError::Decode(e.without_url().to_string()))
    }
}

#[async_trait(?Send)]
impl WeatherSource for HttpWeatherSource {
    async fn current(&self) -> Result<CurrentConditions, WeatherError> {
        self.get("weather").await
    }

    async fn forecast(&self) -> Result<Forecast, WeatherError> {
        self.get("forecast").await
    }
}
