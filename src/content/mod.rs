//! Content Model
//!
//! Identifiers and payloads for the posts and case studies shown in the
//! overlay, plus the loader that fetches them.

mod error;
mod source;

#[cfg(feature = "native")]
mod http;

pub use error::{FetchError, FetchResult};
pub use source::{ContentLoader, ContentSource, Resolved};

#[cfg(feature = "native")]
pub use http::HttpContentSource;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Longest slug accepted, in bytes
pub const MAX_SLUG_LEN: usize = 200;

fn slug_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid slug regex"))
}

/// URL-safe identifier of a piece of content
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    pub fn parse(raw: &str) -> Result<Self, FetchError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.len() > MAX_SLUG_LEN || !slug_pattern().is_match(trimmed) {
            return Err(FetchError::InvalidSlug(raw.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Percent-encoded form for use in a URL path segment
    pub fn encoded(&self) -> String {
        urlencoding::encode(&self.0).into_owned()
    }
}

impl TryFrom<String> for Slug {
    type Error = FetchError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Slug::parse(&value)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of content behind a slug
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentKind {
    Post,
    CaseStudy,
}

impl ContentKind {
    /// Segment used by the JSON endpoints (`/api/{segment}/{slug}`)
    pub fn api_segment(self) -> &'static str {
        match self {
            ContentKind::Post => "posts",
            ContentKind::CaseStudy => "case-studies",
        }
    }

    /// Segment used by the server-rendered pages (`/{segment}/{slug}`)
    pub fn page_segment(self) -> &'static str {
        match self {
            ContentKind::Post => "blog",
            ContentKind::CaseStudy => "case-studies",
        }
    }

    /// Kind implied by a page path such as `/case-studies/foo`
    pub fn from_path(path: &str) -> Option<Self> {
        let first = path.trim_start_matches('/').split('/').next()?;
        match first {
            "blog" => Some(ContentKind::Post),
            "case-studies" => Some(ContentKind::CaseStudy),
            _ => None,
        }
    }
}

impl FromStr for ContentKind {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "post" | "posts" | "blog" => Ok(ContentKind::Post),
            "case-study" | "case-studies" | "case_study" => Ok(ContentKind::CaseStudy),
            other => Err(FetchError::UnknownKind(other.to_string())),
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentKind::Post => f.write_str("post"),
            ContentKind::CaseStudy => f.write_str("case-study"),
        }
    }
}

/// Reference to remote content, built from a clicked link's data attributes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentRef {
    pub slug: Slug,
    pub kind: ContentKind,
}

impl ContentRef {
    pub fn new(slug: Slug, kind: ContentKind) -> Self {
        Self { slug, kind }
    }

    pub fn post(slug: &str) -> Result<Self, FetchError> {
        Ok(Self::new(Slug::parse(slug)?, ContentKind::Post))
    }

    pub fn case_study(slug: &str) -> Result<Self, FetchError> {
        Ok(Self::new(Slug::parse(slug)?, ContentKind::CaseStudy))
    }

    /// Path of the JSON endpoint, relative to the site origin
    pub fn api_path(&self, refresh: bool) -> String {
        let mut path = format!("/api/{}/{}", self.kind.api_segment(), self.slug.encoded());
        if refresh {
            path.push_str("?refresh=true");
        }
        path
    }

    /// Canonical page path, mirrored into the address bar
    pub fn canonical_path(&self) -> String {
        format!("/{}/{}", self.kind.page_segment(), self.slug.encoded())
    }

    /// Same slug, different kind
    pub fn with_kind(&self, kind: ContentKind) -> Self {
        Self::new(self.slug.clone(), kind)
    }
}

impl fmt::Display for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.slug)
    }
}

/// Neighbouring piece of content linked from a payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborRef {
    pub slug: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// Content document returned by the content endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPayload {
    pub title: String,
    pub html: String,
    #[serde(default)]
    pub feature_image: Option<String>,
    #[serde(default)]
    pub reading_time: u32,
    #[serde(default)]
    pub published_at: String,
    #[serde(default)]
    pub prev_post: Option<NeighborRef>,
    #[serde(default)]
    pub next_post: Option<NeighborRef>,
}

impl ContentPayload {
    /// Reject payloads the overlay cannot render
    pub fn validate(&self) -> FetchResult<()> {
        if self.title.trim().is_empty() {
            return Err(FetchError::InvalidShape("missing title".to_string()));
        }
        for (label, neighbor) in [("prev_post", &self.prev_post), ("next_post", &self.next_post)] {
            if let Some(n) = neighbor {
                Slug::parse(&n.slug).map_err(|_| {
                    FetchError::InvalidShape(format!("{} has invalid slug {:?}", label, n.slug))
                })?;
            }
        }
        Ok(())
    }

    /// Publication date for display, e.g. "March 4, 2024"
    pub fn published_display(&self) -> Option<String> {
        chrono::DateTime::parse_from_rfc3339(&self.published_at)
            .ok()
            .map(|dt| dt.format("%B %-d, %Y").to_string())
    }

    pub fn prev_slug(&self) -> Option<Slug> {
        self.prev_post.as_ref().and_then(|n| Slug::parse(&n.slug).ok())
    }

    pub fn next_slug(&self) -> Option<Slug> {
        self.next_post.as_ref().and_then(|n| Slug::parse(&n.slug).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload_json() -> &'static str {
        r#"{
            "title": "Designing for Trust",
            "html": "<p>Hello</p>",
            "feature_image": null,
            "reading_time": 4,
            "published_at": "2024-03-04T10:00:00.000+00:00",
            "next_post": {"slug": "north-star", "title": "North Star", "html": "<p/>"},
            "prev_post": null
        }"#
    }

    #[test]
    fn test_slug_validation() {
        assert!(Slug::parse("designing-for-trust").is_ok());
        assert!(Slug::parse("  post-2  ").is_ok());
        assert!(Slug::parse("").is_err());
        assert!(Slug::parse("Has Spaces").is_err());
        assert!(Slug::parse("double--hyphen").is_err());
        assert!(Slug::parse("../etc/passwd").is_err());
        assert!(Slug::parse(&"a".repeat(MAX_SLUG_LEN + 1)).is_err());
    }

    #[test]
    fn test_kind_paths() {
        let post = ContentRef::post("hello-world").unwrap();
        assert_eq!(post.api_path(false), "/api/posts/hello-world");
        assert_eq!(post.canonical_path(), "/blog/hello-world");

        let study = ContentRef::case_study("acme").unwrap();
        assert_eq!(study.api_path(true), "/api/case-studies/acme?refresh=true");
        assert_eq!(study.canonical_path(), "/case-studies/acme");
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("blog".parse::<ContentKind>().unwrap(), ContentKind::Post);
        assert_eq!("case-studies".parse::<ContentKind>().unwrap(), ContentKind::CaseStudy);
        assert!("video".parse::<ContentKind>().is_err());
        assert_eq!(ContentKind::from_path("/case-studies/acme"), Some(ContentKind::CaseStudy));
        assert_eq!(ContentKind::from_path("/"), None);
    }

    #[test]
    fn test_payload_decode_tolerates_neighbor_fields() {
        let payload: ContentPayload = serde_json::from_str(payload_json()).unwrap();
        assert!(payload.validate().is_ok());
        assert_eq!(payload.next_slug().unwrap().as_str(), "north-star");
        assert!(payload.prev_slug().is_none());
        assert_eq!(payload.published_display().as_deref(), Some("March 4, 2024"));
    }

    #[test]
    fn test_payload_defaults() {
        let payload: ContentPayload =
            serde_json::from_str(r#"{"title": "T", "html": ""}"#).unwrap();
        assert_eq!(payload.reading_time, 0);
        assert_eq!(payload.published_at, "");
        assert!(payload.published_display().is_none());
    }

    #[test]
    fn test_payload_shape_check() {
        let mut payload: ContentPayload = serde_json::from_str(payload_json()).unwrap();
        payload.title = "  ".to_string();
        assert!(matches!(payload.validate(), Err(FetchError::InvalidShape(_))));

        let mut payload: ContentPayload = serde_json::from_str(payload_json()).unwrap();
        payload.next_post = Some(NeighborRef { slug: "Bad Slug".into(), title: None });
        assert!(matches!(payload.validate(), Err(FetchError::InvalidShape(_))));
    }
}
