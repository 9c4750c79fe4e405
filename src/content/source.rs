//! Content sources and the fallback-aware loader

use async_trait::async_trait;

use super::{ContentKind, ContentPayload, ContentRef, FetchError, FetchResult};

/// Anything that can produce a content payload for a reference.
///
/// Futures are not required to be `Send` so that browser fetch
/// implementations fit alongside native HTTP clients.
#[async_trait(?Send)]
pub trait ContentSource {
    async fn fetch(&self, reference: &ContentRef, refresh: bool) -> FetchResult<ContentPayload>;
}

#[async_trait(?Send)]
impl<S: ContentSource + ?Sized> ContentSource for std::rc::Rc<S> {
    async fn fetch(&self, reference: &ContentRef, refresh: bool) -> FetchResult<ContentPayload> {
        (**self).fetch(reference, refresh).await
    }
}

/// A payload together with how it was resolved
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    /// What the caller asked for
    pub requested: ContentRef,
    /// Which endpoint actually served the payload
    pub served_as: ContentKind,
    pub payload: ContentPayload,
}

impl Resolved {
    pub fn used_fallback(&self) -> bool {
        self.served_as != self.requested.kind
    }
}

/// Loads content, applying shape checks and the case-study fallback
pub struct ContentLoader<S> {
    source: S,
    case_study_fallback: bool,
}

impl<S: ContentSource> ContentLoader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            case_study_fallback: true,
        }
    }

    /// Enable or disable retrying failed case studies against the posts endpoint
    pub fn with_fallback(mut self, enabled: bool) -> Self {
        self.case_study_fallback = enabled;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn load(&self, reference: &ContentRef, refresh: bool) -> FetchResult<Resolved> {
        match self.fetch_checked(reference, refresh).await {
            Ok(payload) => Ok(Resolved {
                requested: reference.clone(),
                served_as: reference.kind,
                payload,
            }),
            Err(err) if self.should_fall_back(reference, &err) => {
                let fallback = reference.with_kind(ContentKind::Post);
                tracing::warn!(
                    "Case study {} failed ({}), retrying as post",
                    reference.slug,
                    err
                );
                match self.fetch_checked(&fallback, refresh).await {
                    Ok(payload) => Ok(Resolved {
                        requested: reference.clone(),
                        served_as: ContentKind::Post,
                        payload,
                    }),
                    Err(fallback_err) => {
                        tracing::warn!(
                            "Fallback for {} failed as well: {}",
                            reference.slug,
                            fallback_err
                        );
                        Err(fallback_err)
                    }
                }
            }
            Err(err) => Err(err),
        }
    }

    fn should_fall_back(&self, reference: &ContentRef, err: &FetchError) -> bool {
        self.case_study_fallback && reference.kind == ContentKind::CaseStudy && err.is_remote()
    }

    async fn fetch_checked(&self, reference: &ContentRef, refresh: bool) -> FetchResult<ContentPayload> {
        let payload = self.source.fetch(reference, refresh).await?;
        payload.validate()?;
        Ok(payload)
    }
}
