//! Content fetch error types

use thiserror::Error;

/// Errors that can occur while fetching remote content
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The request never produced a response
    #[error("Network error: {0}")]
    Network(String),

    /// The endpoint answered with a non-2xx status
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// The body was not the expected JSON document
    #[error("Decode error: {0}")]
    Decode(String),

    /// The body decoded but is missing something the UI needs
    #[error("Invalid response shape: {0}")]
    InvalidShape(String),

    #[error("Invalid slug: {0:?}")]
    InvalidSlug(String),

    #[error("Unknown content kind: {0}")]
    UnknownKind(String),
}

impl FetchError {
    /// Whether the failure came from the remote side (and a fallback may help)
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            FetchError::Network(_)
                | FetchError::Status { .. }
                | FetchError::Decode(_)
                | FetchError::InvalidShape(_)
        )
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

/// Result type alias for content fetches
pub type FetchResult<T> = Result<T, FetchError>;
