//! Overlay Store
//!
//! Owns the overlay controller and mirrors its view into a signal. Fetches
//! run on `spawn_local`; the controller is only borrowed between awaits.

use gloo_timers::callback::Timeout;
use leptos::*;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::Event;

use folio::config::Config;
use folio::content::ContentLoader;
use folio::overlay::{
    Browser, ClickRouter, CloseTicket, Dispatch, FetchTicket, Intent, OverlayController, OverlayView, Outcome,
};

use super::dom::{click_target, timer_ms, DomBrowser};
use crate::api::GlooContentSource;

#[derive(Clone)]
pub struct OverlayStore {
    controller: Rc<RefCell<OverlayController<DomBrowser>>>,
    loader: Rc<ContentLoader<GlooContentSource>>,
    router: Rc<ClickRouter>,
    /// What the overlay component renders
    pub view: RwSignal<OverlayView>,
}

impl OverlayStore {
    pub fn new(config: &Config) -> Self {
        let controller = OverlayController::from_config(DomBrowser::new(), &config.overlay);
        let loader = ContentLoader::new(GlooContentSource::new(&config.site.base_url))
            .with_fallback(config.overlay.case_study_fallback);

        Self {
            view: create_rw_signal(controller.view()),
            controller: Rc::new(RefCell::new(controller)),
            loader: Rc::new(loader),
            router: Rc::new(ClickRouter::new()),
        }
    }

    fn sync(&self) {
        let view = self.controller.borrow().view();
        self.view.set(view);
    }

    /// Document-level click listener
    pub fn handle_click(&self, event: &Event) {
        let click = click_target(event);
        // A rejected intent leaves the link to the browser
        if let Some(intent) = self.router.route(&click) {
            if self.dispatch(intent) {
                event.prevent_default();
            }
        }
    }

    /// Document-level keydown listener
    pub fn handle_key(&self, key: &str) {
        if !self.view.get_untracked().shell_mounted {
            return;
        }
        if let Some(intent) = self.router.route_key(key) {
            self.dispatch(intent);
        }
    }

    /// Window popstate listener
    pub fn handle_popstate(&self) {
        let ticket = {
            let mut controller = self.controller.borrow_mut();
            let path = controller.browser().current_path();
            controller.handle_popstate(&path)
        };
        self.sync();
        if let Some(ticket) = ticket {
            self.schedule_close(ticket);
        }
    }

    /// Returns false when the controller rejected the intent
    pub fn dispatch(&self, intent: Intent) -> bool {
        let result = self.controller.borrow_mut().dispatch(intent);
        self.sync();

        match result {
            Ok(Dispatch::Fetch(ticket)) => self.spawn_fetch(ticket),
            Ok(Dispatch::Close(ticket)) => self.schedule_close(ticket),
            Ok(Dispatch::Ignored) => {}
            Err(e) => {
                web_sys::console::log_1(&format!("Overlay: {}", e).into());
                return false;
            }
        }
        true
    }

    fn spawn_fetch(&self, ticket: FetchTicket) {
        let store = self.clone();
        spawn_local(async move {
            let result = store.loader.load(&ticket.target, false).await;
            let outcome = store.controller.borrow_mut().complete(ticket, result);
            store.sync();

            match outcome {
                Outcome::Rendered { used_fallback: true, reference, .. } => {
                    web_sys::console::warn_1(&format!("Rendered {} from the posts endpoint", reference).into());
                }
                Outcome::Degraded { url, error } => {
                    web_sys::console::error_1(&format!("Error loading content ({}), opening {}", error, url).into());
                }
                _ => {}
            }
        });
    }

    fn schedule_close(&self, ticket: CloseTicket) {
        let store = self.clone();
        Timeout::new(timer_ms(ticket.delay.as_millis()), move || {
            store.controller.borrow_mut().finish_close(ticket);
            store.sync();
        })
        .forget();
    }
}
