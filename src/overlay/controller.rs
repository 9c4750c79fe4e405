//! Overlay Controller
//!
//! Drives the overlay state machine and performs its side effects through a
//! [`Browser`]. Fetches are split into `begin_*` / [`OverlayController::complete`]
//! so a UI can release its borrow of the controller while a request is in
//! flight; the async helpers chain the two for sequential callers.

use std::time::Duration;

use super::browser::Browser;
use super::router::Intent;
use super::sequencer::{RequestToken, Sequencer};
use super::state::{OverlayEvent, OverlayState, OverlayView, Phase, TransitionError};
use crate::config::OverlayConfig;
use crate::content::{ContentKind, ContentLoader, ContentRef, ContentSource, FetchError, FetchResult, Resolved, Slug};
use crate::timer::Delay;

/// A content request that has been started
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    pub token: RequestToken,
    pub target: ContentRef,
}

/// A close whose exit animation is running
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloseTicket {
    pub token: RequestToken,
    /// How long to wait before calling [`OverlayController::finish_close`]
    pub delay: Duration,
}

/// Result of completing a fetch
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Rendered {
        reference: ContentRef,
        /// The shell was mounted by this completion
        first_mount: bool,
        used_fallback: bool,
    },
    /// A newer request or a close superseded this one; nothing changed
    Stale { token: RequestToken },
    /// The overlay gave up and the page was sent to the canonical URL
    Degraded { url: String, error: FetchError },
}

/// What a routed intent turned into
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    Fetch(FetchTicket),
    Close(CloseTicket),
    Ignored,
}

pub struct OverlayController<B> {
    state: OverlayState,
    sequencer: Sequencer,
    browser: B,
    exit_delay: Duration,
    root_path: String,
    /// Address bar path before the shell was mounted
    origin_path: Option<String>,
}

impl<B: Browser> OverlayController<B> {
    pub fn new(browser: B) -> Self {
        Self::from_config(browser, &OverlayConfig::default())
    }

    pub fn from_config(browser: B, config: &OverlayConfig) -> Self {
        Self {
            state: OverlayState::Closed,
            sequencer: Sequencer::new(),
            browser,
            exit_delay: Duration::from_millis(config.animation_ms),
            root_path: config.root_path.clone(),
            origin_path: None,
        }
    }

    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    pub fn view(&self) -> OverlayView {
        self.state.view()
    }

    pub fn browser(&self) -> &B {
        &self.browser
    }

    pub fn browser_mut(&mut self) -> &mut B {
        &mut self.browser
    }

    pub fn exit_delay(&self) -> Duration {
        self.exit_delay
    }

    /// Kind of the content shown (or being opened)
    pub fn current_kind(&self) -> Option<ContentKind> {
        match &self.state {
            OverlayState::Opening { target, .. } => Some(target.kind),
            other => other.shown().map(|s| s.reference.kind),
        }
    }

    /// Reference for a prev/next slug, typed like the content shown
    pub fn neighbor(&self, slug: Slug) -> Option<ContentRef> {
        self.current_kind().map(|kind| ContentRef::new(slug, kind))
    }

    /// Start opening content. With a shell already mounted the content is
    /// replaced in place instead of stacking a second overlay.
    pub fn begin_open(&mut self, target: ContentRef) -> Result<FetchTicket, TransitionError> {
        // A rejected transition must not invalidate the request in flight
        let token = self.sequencer.peek();
        let next = self.state.apply(OverlayEvent::Open {
            target: target.clone(),
            token,
        })?;
        self.sequencer.issue();

        if self.state.phase() == Phase::Closed {
            self.origin_path = Some(self.browser.current_path());
        }
        tracing::info!("Opening {} ({})", target, token);
        self.state = next;
        Ok(FetchTicket { token, target })
    }

    /// Start replacing the shown content; requires a mounted shell
    pub fn begin_navigate(&mut self, target: ContentRef) -> Result<FetchTicket, TransitionError> {
        let token = self.sequencer.peek();
        let next = self.state.apply(OverlayEvent::Navigate {
            target: target.clone(),
            token,
        })?;
        self.sequencer.issue();

        tracing::info!("Navigating to {} ({})", target, token);
        self.state = next;
        Ok(FetchTicket { token, target })
    }

    /// Apply the result of a fetch started with `begin_open`/`begin_navigate`
    pub fn complete(&mut self, ticket: FetchTicket, result: FetchResult<Resolved>) -> Outcome {
        if !self.sequencer.is_current(ticket.token) {
            tracing::debug!("Discarding stale response for {} ({})", ticket.target, ticket.token);
            return Outcome::Stale { token: ticket.token };
        }

        match result {
            Ok(resolved) => self.render(ticket, resolved),
            Err(error) => self.degrade(ticket, error),
        }
    }

    fn render(&mut self, ticket: FetchTicket, resolved: Resolved) -> Outcome {
        let first_mount = !self.state.shell_mounted();
        let used_fallback = resolved.used_fallback();

        match self.state.apply(OverlayEvent::Loaded {
            token: ticket.token,
            shown: resolved.into(),
        }) {
            Ok(next) => self.state = next,
            Err(e) => {
                tracing::debug!("Response for {} not applied: {}", ticket.target, e);
                return Outcome::Stale { token: ticket.token };
            }
        }

        if first_mount {
            self.browser.lock_scroll();
        }
        self.browser.push_path(&ticket.target.canonical_path());
        tracing::info!("Rendered {}", ticket.target);

        Outcome::Rendered {
            reference: ticket.target,
            first_mount,
            used_fallback,
        }
    }

    fn degrade(&mut self, ticket: FetchTicket, error: FetchError) -> Outcome {
        let url = ticket.target.canonical_path();
        tracing::warn!(
            "Overlay load for {} failed ({}), navigating to {}",
            ticket.target,
            error,
            url
        );

        let was_mounted = self.state.shell_mounted();
        match self.state.apply(OverlayEvent::Failed { token: ticket.token }) {
            Ok(next) => self.state = next,
            Err(e) => tracing::debug!("Failure for {} not applied: {}", ticket.target, e),
        }
        if was_mounted {
            self.browser.unlock_scroll();
        }
        self.origin_path = None;
        self.browser.assign(&url);

        Outcome::Degraded { url, error }
    }

    /// Start the exit animation. Returns `None` when there is nothing to
    /// animate (already closed, already closing, or nothing mounted yet).
    pub fn begin_close(&mut self) -> Option<CloseTicket> {
        match self.state.phase() {
            Phase::Closed | Phase::Closing => {
                tracing::debug!("Close ignored while {}", self.state.phase());
                None
            }
            Phase::Opening => {
                // Nothing mounted yet; just invalidate the request in flight
                let token = self.sequencer.issue();
                if let Ok(next) = self.state.apply(OverlayEvent::CloseStarted { token }) {
                    self.state = next;
                }
                self.origin_path = None;
                None
            }
            Phase::Open | Phase::Navigating => {
                let token = self.sequencer.issue();
                match self.state.apply(OverlayEvent::CloseStarted { token }) {
                    Ok(next) => {
                        self.state = next;
                        Some(CloseTicket {
                            token,
                            delay: self.exit_delay,
                        })
                    }
                    Err(e) => {
                        tracing::debug!("Close rejected: {}", e);
                        None
                    }
                }
            }
        }
    }

    /// Remove the overlay once the exit animation has run. Returns `false`
    /// if something reopened the overlay in the meantime.
    pub fn finish_close(&mut self, ticket: CloseTicket) -> bool {
        if !self.sequencer.is_current(ticket.token) {
            tracing::debug!("Close {} superseded", ticket.token);
            return false;
        }

        match self.state.apply(OverlayEvent::CloseFinished { token: ticket.token }) {
            Ok(next) => self.state = next,
            Err(e) => {
                tracing::debug!("Close not finished: {}", e);
                return false;
            }
        }

        self.browser.unlock_scroll();
        let path = self.origin_path.take().unwrap_or_else(|| self.root_path.clone());
        self.browser.replace_path(&path);
        tracing::info!("Overlay closed");
        true
    }

    /// Browser back/forward. Returning to the page the overlay was opened
    /// from closes it; other paths are left to the server-rendered page.
    pub fn handle_popstate(&mut self, path: &str) -> Option<CloseTicket> {
        let home = path == self.root_path || self.origin_path.as_deref() == Some(path);
        if home {
            self.begin_close()
        } else {
            tracing::debug!("popstate to {} left to the page", path);
            None
        }
    }

    /// Turn a routed intent into a started request or close
    pub fn dispatch(&mut self, intent: Intent) -> Result<Dispatch, TransitionError> {
        match intent {
            Intent::Open(target) => self.begin_open(target).map(Dispatch::Fetch),
            // Prev/next links on a server-rendered page open the overlay,
            // typed by the page they sit on
            Intent::Navigate(slug) if self.state.phase() == Phase::Closed => {
                let kind = ContentKind::from_path(&self.browser.current_path()).unwrap_or(ContentKind::Post);
                self.begin_open(ContentRef::new(slug, kind)).map(Dispatch::Fetch)
            }
            Intent::Navigate(slug) => {
                let target = self.neighbor(slug).ok_or(TransitionError::Invalid {
                    action: "navigate",
                    phase: self.state.phase(),
                })?;
                self.begin_navigate(target).map(Dispatch::Fetch)
            }
            Intent::Close => Ok(self
                .begin_close()
                .map(Dispatch::Close)
                .unwrap_or(Dispatch::Ignored)),
        }
    }

    pub async fn open<S: ContentSource>(
        &mut self,
        loader: &ContentLoader<S>,
        target: ContentRef,
        refresh: bool,
    ) -> Result<Outcome, TransitionError> {
        let ticket = self.begin_open(target)?;
        let result = loader.load(&ticket.target, refresh).await;
        Ok(self.complete(ticket, result))
    }

    pub async fn navigate<S: ContentSource>(
        &mut self,
        loader: &ContentLoader<S>,
        target: ContentRef,
        refresh: bool,
    ) -> Result<Outcome, TransitionError> {
        let ticket = self.begin_navigate(target)?;
        let result = loader.load(&ticket.target, refresh).await;
        Ok(self.complete(ticket, result))
    }

    /// Run the whole close sequence; `false` if there was nothing to close
    pub async fn close<D: Delay>(&mut self, delay: &D) -> bool {
        let Some(ticket) = self.begin_close() else {
            return false;
        };
        delay.sleep(ticket.delay).await;
        self.finish_close(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::browser::HeadlessBrowser;
    use crate::testing::{payload, payload_with_next, RecordingDelay, StubSource};

    fn controller() -> OverlayController<HeadlessBrowser> {
        OverlayController::new(HeadlessBrowser::default())
    }

    fn resolved(reference: &ContentRef, title: &str) -> Resolved {
        Resolved {
            requested: reference.clone(),
            served_as: reference.kind,
            payload: payload(title),
        }
    }

    #[tokio::test]
    async fn test_open_then_close_restores_page() {
        let loader = ContentLoader::new(StubSource::new().with_ok("/api/posts/hello", payload("Hello")));
        let mut overlay = controller();
        let before_path = overlay.browser().current_path();
        let before_locked = overlay.browser().scroll_locked();

        let outcome = overlay
            .open(&loader, ContentRef::post("hello").unwrap(), false)
            .await
            .unwrap();
        assert!(matches!(outcome, Outcome::Rendered { first_mount: true, .. }));
        assert_eq!(overlay.browser().current_path(), "/blog/hello");
        assert!(overlay.browser().scroll_locked());
        assert_eq!(overlay.view().shown.unwrap().payload.title, "Hello");

        let delay = RecordingDelay::default();
        assert!(overlay.close(&delay).await);
        assert_eq!(delay.waits(), vec![Duration::from_millis(300)]);

        assert_eq!(overlay.state(), &OverlayState::Closed);
        assert_eq!(overlay.browser().current_path(), before_path);
        assert_eq!(overlay.browser().scroll_locked(), before_locked);
    }

    #[tokio::test]
    async fn test_case_study_fallback_renders_post_payload() {
        let loader = ContentLoader::new(
            StubSource::new()
                .with_status("/api/case-studies/acme", 404)
                .with_ok("/api/posts/acme", payload("Acme post")),
        );
        let mut overlay = controller();

        let outcome = overlay
            .open(&loader, ContentRef::case_study("acme").unwrap(), false)
            .await
            .unwrap();
        assert!(matches!(outcome, Outcome::Rendered { used_fallback: true, .. }));
        assert_eq!(overlay.view().shown.unwrap().payload.title, "Acme post");
        assert_eq!(overlay.browser().current_path(), "/case-studies/acme");
    }

    #[tokio::test]
    async fn test_failure_on_both_endpoints_navigates_to_canonical_url() {
        let loader = ContentLoader::new(
            StubSource::new()
                .with_status("/api/case-studies/acme", 500)
                .with_network_error("/api/posts/acme"),
        );
        let mut overlay = controller();

        let outcome = overlay
            .open(&loader, ContentRef::case_study("acme").unwrap(), false)
            .await
            .unwrap();
        assert!(matches!(outcome, Outcome::Degraded { ref url, .. } if url == "/case-studies/acme"));
        assert_eq!(overlay.browser().assigned(), Some("/case-studies/acme"));
        assert_eq!(overlay.state(), &OverlayState::Closed);
        assert!(!overlay.browser().scroll_locked());
    }

    #[tokio::test]
    async fn test_post_failure_navigates_to_blog_url() {
        let loader = ContentLoader::new(StubSource::new().with_status("/api/posts/missing", 404));
        let mut overlay = controller();

        overlay
            .open(&loader, ContentRef::post("missing").unwrap(), false)
            .await
            .unwrap();
        assert_eq!(overlay.browser().assigned(), Some("/blog/missing"));
    }

    #[test]
    fn test_stale_navigation_response_is_ignored() {
        let mut overlay = controller();
        let a = ContentRef::post("a").unwrap();
        let ticket = overlay.begin_open(a.clone()).unwrap();
        overlay.complete(ticket, Ok(resolved(&a, "A")));

        let b = ContentRef::post("b").unwrap();
        let c = ContentRef::post("c").unwrap();
        let ticket_b = overlay.begin_navigate(b.clone()).unwrap();
        let ticket_c = overlay.begin_navigate(c.clone()).unwrap();

        // c answers first, then the slower b arrives
        let outcome_c = overlay.complete(ticket_c, Ok(resolved(&c, "C")));
        assert!(matches!(outcome_c, Outcome::Rendered { first_mount: false, .. }));

        let outcome_b = overlay.complete(ticket_b.clone(), Ok(resolved(&b, "B")));
        assert_eq!(outcome_b, Outcome::Stale { token: ticket_b.token });

        assert_eq!(overlay.view().shown.unwrap().payload.title, "C");
        assert_eq!(overlay.browser().current_path(), "/blog/c");
        assert_eq!(overlay.browser().history(), ["/", "/blog/a", "/blog/c"]);
    }

    #[test]
    fn test_stale_failure_does_not_navigate_away() {
        let mut overlay = controller();
        let a = ContentRef::post("a").unwrap();
        let b = ContentRef::post("b").unwrap();
        let ticket_a = overlay.begin_open(a).unwrap();
        let ticket_b = overlay.begin_open(b.clone()).unwrap();

        overlay.complete(ticket_b, Ok(resolved(&b, "B")));
        let outcome = overlay.complete(ticket_a, Err(FetchError::Network("timeout".into())));

        assert!(matches!(outcome, Outcome::Stale { .. }));
        assert!(overlay.browser().assigned().is_none());
        assert_eq!(overlay.view().shown.unwrap().payload.title, "B");
    }

    #[tokio::test]
    async fn test_close_twice_is_harmless() {
        let loader = ContentLoader::new(StubSource::new().with_ok("/api/posts/hello", payload("Hello")));
        let mut overlay = controller();
        overlay
            .open(&loader, ContentRef::post("hello").unwrap(), false)
            .await
            .unwrap();

        let delay = RecordingDelay::default();
        assert!(overlay.close(&delay).await);
        assert!(!overlay.close(&delay).await);
        assert!(overlay.begin_close().is_none());
        assert_eq!(overlay.browser().current_path(), "/");
    }

    #[test]
    fn test_response_after_close_is_discarded() {
        let mut overlay = controller();
        let a = ContentRef::post("a").unwrap();
        let ticket = overlay.begin_open(a.clone()).unwrap();
        assert!(overlay.begin_close().is_none());

        let outcome = overlay.complete(ticket, Ok(resolved(&a, "A")));
        assert!(matches!(outcome, Outcome::Stale { .. }));
        assert!(!overlay.view().shell_mounted);
        assert!(!overlay.browser().scroll_locked());
    }

    #[test]
    fn test_reopen_during_exit_animation_cancels_removal() {
        let mut overlay = controller();
        let a = ContentRef::post("a").unwrap();
        let ticket = overlay.begin_open(a.clone()).unwrap();
        overlay.complete(ticket, Ok(resolved(&a, "A")));

        let close = overlay.begin_close().unwrap();
        let b = ContentRef::post("b").unwrap();
        let ticket = overlay.begin_open(b.clone()).unwrap();
        assert!(!overlay.finish_close(close));

        overlay.complete(ticket, Ok(resolved(&b, "B")));
        assert_eq!(overlay.state().phase(), Phase::Open);
        assert!(overlay.browser().scroll_locked());
    }

    #[tokio::test]
    async fn test_neighbor_navigation_keeps_kind_and_pushes_history() {
        let loader = ContentLoader::new(
            StubSource::new()
                .with_ok("/api/case-studies/one", payload_with_next("One", "two"))
                .with_ok("/api/case-studies/two", payload("Two")),
        );
        let mut overlay = controller();
        overlay
            .open(&loader, ContentRef::case_study("one").unwrap(), false)
            .await
            .unwrap();

        let next = overlay.view().shown.unwrap().payload.next_slug().unwrap();
        let target = overlay.neighbor(next).unwrap();
        assert_eq!(target.kind, ContentKind::CaseStudy);

        let outcome = overlay.navigate(&loader, target, false).await.unwrap();
        assert!(matches!(outcome, Outcome::Rendered { first_mount: false, .. }));
        assert_eq!(
            overlay.browser().history(),
            ["/", "/case-studies/one", "/case-studies/two"]
        );
    }

    #[test]
    fn test_rejected_navigate_keeps_pending_open_alive() {
        let mut overlay = controller();
        let a = ContentRef::post("a").unwrap();
        let ticket = overlay.begin_open(a.clone()).unwrap();

        let err = overlay
            .dispatch(Intent::Navigate(Slug::parse("b").unwrap()))
            .unwrap_err();
        assert!(matches!(err, TransitionError::Invalid { action: "navigate", phase: Phase::Opening }));

        let outcome = overlay.complete(ticket, Ok(resolved(&a, "A")));
        assert!(matches!(outcome, Outcome::Rendered { first_mount: true, .. }));
        assert_eq!(overlay.state().phase(), Phase::Open);
        assert!(overlay.view().shell_mounted);
        assert!(!overlay.view().loading);
    }

    #[test]
    fn test_neighbor_link_on_page_opens_overlay() {
        let mut overlay = OverlayController::new(HeadlessBrowser::new("/case-studies/one"));
        let dispatch = overlay
            .dispatch(Intent::Navigate(Slug::parse("two").unwrap()))
            .unwrap();
        let Dispatch::Fetch(ticket) = dispatch else {
            panic!("expected a fetch, got {:?}", dispatch);
        };
        assert_eq!(ticket.target, ContentRef::case_study("two").unwrap());
        assert_eq!(overlay.state().phase(), Phase::Opening);

        overlay.complete(ticket, Ok(resolved(&ContentRef::case_study("two").unwrap(), "Two")));
        assert_eq!(overlay.browser().current_path(), "/case-studies/two");

        let close = overlay.begin_close().unwrap();
        assert!(overlay.finish_close(close));
        assert_eq!(overlay.browser().current_path(), "/case-studies/one");
    }

    #[test]
    fn test_neighbor_link_on_other_page_defaults_to_post() {
        let mut overlay = OverlayController::new(HeadlessBrowser::new("/about"));
        let Ok(Dispatch::Fetch(ticket)) = overlay.dispatch(Intent::Navigate(Slug::parse("b").unwrap())) else {
            panic!("expected a fetch");
        };
        assert_eq!(ticket.target.kind, ContentKind::Post);
    }

    #[test]
    fn test_popstate_to_root_closes() {
        let mut overlay = controller();
        let a = ContentRef::post("a").unwrap();
        let ticket = overlay.begin_open(a.clone()).unwrap();
        overlay.complete(ticket, Ok(resolved(&a, "A")));

        assert!(overlay.handle_popstate("/blog/other").is_none());
        assert_eq!(overlay.state().phase(), Phase::Open);

        let back = overlay.browser_mut().back().unwrap();
        let close = overlay.handle_popstate(&back).unwrap();
        assert!(overlay.finish_close(close));
        assert_eq!(overlay.state(), &OverlayState::Closed);
    }

    #[cfg(feature = "native")]
    #[tokio::test(start_paused = true)]
    async fn test_close_waits_out_exit_animation() {
        use crate::timer::TokioDelay;

        let mut overlay = controller();
        let a = ContentRef::post("a").unwrap();
        let ticket = overlay.begin_open(a.clone()).unwrap();
        overlay.complete(ticket, Ok(resolved(&a, "A")));

        let started = tokio::time::Instant::now();
        assert!(overlay.close(&TokioDelay).await);
        assert!(started.elapsed() >= Duration::from_millis(300));
        assert_eq!(overlay.state(), &OverlayState::Closed);
        assert_eq!(overlay.browser().current_path(), "/");
    }

    #[test]
    fn test_dispatch_close_when_closed_is_ignored() {
        let mut overlay = controller();
        assert_eq!(overlay.dispatch(Intent::Close).unwrap(), Dispatch::Ignored);
    }
}
