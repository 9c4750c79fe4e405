//! HTTP API Client
//!
//! Content, chat and weather requests from the browser.

use async_trait::async_trait;
use gloo_net::http::Request;
use serde::de::DeserializeOwned;

use folio::chat::{ChatBackend, ChatError, ChatReply, ChatRequest};
use folio::config::WeatherConfig;
use folio::content::{ContentPayload, ContentRef, ContentSource, FetchError, FetchResult};
use folio::weather::{endpoint_url, CurrentConditions, Forecast, WeatherError, WeatherSource};

/// Origin of the current page, e.g. `https://example.com`
pub fn site_origin() -> String {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default()
}

fn join(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

// ============ Content ============

/// Fetches posts and case studies from the site's JSON API
#[derive(Clone)]
pub struct GlooContentSource {
    base_url: String,
}

impl GlooContentSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
        }
    }
}

#[async_trait(?Send)]
impl ContentSource for GlooContentSource {
    async fn fetch(&self, reference: &ContentRef, refresh: bool) -> FetchResult<ContentPayload> {
        let url = join(&self.base_url, &reference.api_path(refresh));

        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if !response.ok() {
            return Err(FetchError::Status {
                status: response.status(),
                url,
            });
        }

        response
            .json::<ContentPayload>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

// ============ Chat ============

#[derive(Clone)]
pub struct GlooChatBackend {
    url: String,
}

impl GlooChatBackend {
    pub fn new(base_url: &str) -> Self {
        Self {
            url: join(base_url, "/api/chat"),
        }
    }
}

#[async_trait(?Send)]
impl ChatBackend for GlooChatBackend {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, ChatError> {
        let response = Request::post(&self.url)
            .json(request)
            .map_err(|e| ChatError::Decode(e.to_string()))?
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;

        if !response.ok() {
            return Err(ChatError::Status(response.status()));
        }

        response
            .json::<ChatReply>()
            .await
            .map_err(|e| ChatError::Decode(e.to_string()))
    }
}

// ============ Weather ============

#[derive(Clone)]
pub struct GlooWeatherSource {
    config: WeatherConfig,
}

impl GlooWeatherSource {
    pub fn new(config: WeatherConfig) -> Self {
        Self { config }
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, WeatherError> {
        let response = Request::get(&endpoint_url(&self.config, endpoint))
            .send()
            .await
            .map_err(|e| WeatherError::Network(e.to_string()))?;

        if !response.ok() {
            return Err(WeatherError::Status {
                status: response.status(),
                endpoint: endpoint.to_string(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| WeatherError::Decode(e.to_string()))
    }
}

#[async_trait(?Send)]
impl WeatherSource for GlooWeatherSource {
    async fn current(&self) -> Result<CurrentConditions, WeatherError> {
        self.get("weather").await
    }

    async fn forecast(&self) -> Result<Forecast, WeatherError> {
        self.get("forecast").await
    }
}
