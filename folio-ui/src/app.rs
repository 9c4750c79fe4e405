//! App Root Component
//!
//! Provides the site stores and hooks the document-level listeners the
//! overlay and theme depend on.

use leptos::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::MediaQueryListEvent;

use crate::components::{ChatWidget, ClockButton, ContentOverlay, ThemeToggle, WeatherPanelView};
use crate::state::{provide_site_state, SiteState};

#[component]
pub fn App() -> impl IntoView {
    let state = provide_site_state();

    // Posts and case-study links anywhere on the page
    let overlay = state.overlay.clone();
    let _ = window_event_listener(ev::click, move |e| overlay.handle_click(&e));

    let overlay = state.overlay.clone();
    let _ = window_event_listener(ev::keydown, move |e| overlay.handle_key(&e.key()));

    let overlay = state.overlay.clone();
    let _ = window_event_listener(ev::popstate, move |_| overlay.handle_popstate());

    watch_color_scheme(&state);

    view! {
        <ThemeToggle />
        <div class="fixed top-4 left-4 z-[150]">
            <ClockButton />
        </div>
        <ContentOverlay />
        <WeatherPanelView />
        <ChatWidget />
    }
}

/// Follow `prefers-color-scheme` while no theme is stored
fn watch_color_scheme(state: &SiteState) {
    let Some(query) = web_sys::window()
        .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
    else {
        return;
    };

    let theme = state.theme.clone();
    let on_change = Closure::wrap(Box::new(move |e: MediaQueryListEvent| {
        theme.system_changed(e.matches());
    }) as Box<dyn FnMut(MediaQueryListEvent)>);

    if let Err(e) = query.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref()) {
        web_sys::console::warn_1(&format!("Color scheme listener not attached: {:?}", e).into());
    }
    on_change.forget();
}
