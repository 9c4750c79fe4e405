//! HTTP content source backed by reqwest

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::{ContentPayload, ContentRef, ContentSource, FetchError, FetchResult};

/// Fetches content payloads from a running site
pub struct HttpContentSource {
    client: Client,
    base_url: String,
}

impl HttpContentSource {
    pub fn new(base_url: &str, timeout: Duration) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a site-relative path
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait(?Send)]
impl ContentSource for HttpContentSource {
    async fn fetch(&self, reference: &ContentRef, refresh: bool) -> FetchResult<ContentPayload> {
        let url = self.url_for(&reference.api_path(refresh));
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status().as_u16(),
                url,
            });
        }

        response
            .json::<ContentPayload>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building() {
        let source = HttpContentSource::new("https://example.com/", Duration::from_secs(5)).unwrap();
        assert_eq!(source.base_url(), "https://example.com");

        let reference = ContentRef::case_study("acme-redesign").unwrap();
        assert_eq!(
            source.url_for(&reference.api_path(true)),
            "https://example.com/api/case-studies/acme-redesign?refresh=true"
        );
    }
}
