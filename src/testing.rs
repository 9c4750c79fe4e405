//! Shared test doubles

use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::HashMap;

use crate::content::{ContentPayload, ContentRef, ContentSource, FetchError, FetchResult, NeighborRef};

/// Minimal payload with the given title
pub fn payload(title: &str) -> ContentPayload {
    ContentPayload {
        title: title.to_string(),
        html: format!("<p>{}</p>", title),
        feature_image: None,
        reading_time: 3,
        published_at: "2024-01-15T09:00:00.000Z".to_string(),
        prev_post: None,
        next_post: None,
    }
}

/// Payload linking to a next post
pub fn payload_with_next(title: &str, next: &str) -> ContentPayload {
    let mut p = payload(title);
    p.next_post = Some(NeighborRef {
        slug: next.to_string(),
        title: None,
    });
    p
}

/// Content source answering from a fixed table keyed by API path
#[derive(Default)]
pub struct StubSource {
    responses: HashMap<String, FetchResult<ContentPayload>>,
    calls: RefCell<Vec<String>>,
}

impl StubSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ok(mut self, path: &str, payload: ContentPayload) -> Self {
        self.responses.insert(path.to_string(), Ok(payload));
        self
    }

    pub fn with_status(mut self, path: &str, status: u16) -> Self {
        self.responses.insert(
            path.to_string(),
            Err(FetchError::Status {
                status,
                url: path.to_string(),
            }),
        );
        self
    }

    pub fn with_network_error(mut self, path: &str) -> Self {
        self.responses.insert(
            path.to_string(),
            Err(FetchError::Network("connection refused".to_string())),
        );
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

#[async_trait(?Send)]
impl ContentSource for StubSource {
    async fn fetch(&self, reference: &ContentRef, refresh: bool) -> FetchResult<ContentPayload> {
        let path = reference.api_path(refresh);
        self.calls.borrow_mut().push(path.clone());
        self.responses.get(&path).cloned().unwrap_or(Err(FetchError::Status {
            status: 404,
            url: path,
        }))
    }
}

/// Delay that returns immediately and records what it was asked to wait
#[derive(Default)]
pub struct RecordingDelay {
    waits: RefCell<Vec<std::time::Duration>>,
}

impl RecordingDelay {
    pub fn waits(&self) -> Vec<std::time::Duration> {
        self.waits.borrow().clone()
    }
}

#[async_trait(?Send)]
impl crate::timer::Delay for RecordingDelay {
    async fn sleep(&self, duration: std::time::Duration) {
        self.waits.borrow_mut().push(duration);
    }
}

/// Clear afternoon in Austin with a day of 3-hourly forecast entries
pub fn weather_report() -> crate::weather::WeatherReport {
    let current = serde_json::from_value(serde_json::json!({
        "weather": [{"main": "Clear", "description": "clear sky", "icon": "01d"}],
        "main": {"temp": 91.3, "feels_like": 97.0, "temp_min": 88.0, "temp_max": 94.0, "humidity": 48},
        "timezone": -18000,
        "name": "Austin"
    }))
    .unwrap();

    let list: Vec<serde_json::Value> = (0..16)
        .map(|i| {
            serde_json::json!({
                "dt": 1_720_123_200 + i * 10_800,
                "main": {"temp": 80 + i, "temp_min": 78 + i, "temp_max": 84 + i},
                "pop": 0.1,
            })
        })
        .collect();
    let forecast = serde_json::from_value(serde_json::json!({
        "list": list,
        "city": {"name": "Austin", "timezone": -18000}
    }))
    .unwrap();

    crate::weather::WeatherReport { current, forecast }
}

/// Weather source returning a fixed report, or failing every request
pub struct StubWeather {
    report: Option<crate::weather::WeatherReport>,
    calls: std::cell::Cell<usize>,
}

impl StubWeather {
    pub fn ok(report: crate::weather::WeatherReport) -> Self {
        Self {
            report: Some(report),
            calls: std::cell::Cell::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            report: None,
            calls: std::cell::Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    fn answer<T>(
        &self,
        pick: impl FnOnce(&crate::weather::WeatherReport) -> T,
    ) -> Result<T, crate::weather::WeatherError> {
        self.calls.set(self.calls.get() + 1);
        self.report.as_ref().map(pick).ok_or(crate::weather::WeatherError::Status {
            status: 401,
            endpoint: "weather".to_string(),
        })
    }
}

#[async_trait(?Send)]
impl crate::weather::WeatherSource for StubWeather {
    async fn current(&self) -> Result<crate::weather::CurrentConditions, crate::weather::WeatherError> {
        self.answer(|r| r.current.clone())
    }

    async fn forecast(&self) -> Result<crate::weather::Forecast, crate::weather::WeatherError> {
        self.answer(|r| r.forecast.clone())
    }
}
