//! DOM adapters
//!
//! Browser-side implementations of the overlay's page port and the click
//! description the router works on.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, Event};

use folio::config::Config;
use folio::overlay::{Browser, ClickTarget, ElementInfo};

/// Id of the dimmed layer behind the overlay panel
pub const BACKDROP_ID: &str = "content-overlay-backdrop";
/// Optional `<script type="application/json">` block carrying site config
pub const CONFIG_ELEMENT_ID: &str = "folio-config";

/// History, location and body scroll of the real page
#[derive(Default)]
pub struct DomBrowser {
    /// Body `overflow` before the overlay locked it
    saved_overflow: Option<String>,
}

impl DomBrowser {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Browser for DomBrowser {
    fn current_path(&self) -> String {
        web_sys::window()
            .and_then(|w| w.location().pathname().ok())
            .unwrap_or_else(|| "/".to_string())
    }

    fn push_path(&mut self, path: &str) {
        let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
            return;
        };
        if let Err(e) = history.push_state_with_url(&JsValue::NULL, "", Some(path)) {
            web_sys::console::error_1(&format!("pushState {} failed: {:?}", path, e).into());
        }
    }

    fn replace_path(&mut self, path: &str) {
        let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
            return;
        };
        if let Err(e) = history.replace_state_with_url(&JsValue::NULL, "", Some(path)) {
            web_sys::console::error_1(&format!("replaceState {} failed: {:?}", path, e).into());
        }
    }

    fn assign(&mut self, url: &str) {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.location().assign(url) {
                web_sys::console::error_1(&format!("Navigation to {} failed: {:?}", url, e).into());
            }
        }
    }

    fn lock_scroll(&mut self) {
        let Some(body) = web_sys::window().and_then(|w| w.document()).and_then(|d| d.body()) else {
            return;
        };
        let style = body.style();
        if self.saved_overflow.is_none() {
            self.saved_overflow = style.get_property_value("overflow").ok();
        }
        let _ = style.set_property("overflow", "hidden");
    }

    fn unlock_scroll(&mut self) {
        let Some(body) = web_sys::window().and_then(|w| w.document()).and_then(|d| d.body()) else {
            return;
        };
        let style = body.style();
        match self.saved_overflow.take().filter(|v| !v.is_empty()) {
            Some(previous) => {
                let _ = style.set_property("overflow", &previous);
            }
            None => {
                let _ = style.remove_property("overflow");
            }
        }
    }
}

fn describe(element: &Element) -> ElementInfo {
    let mut info = ElementInfo::new();

    let id = element.id();
    if !id.is_empty() {
        info = info.with_id(&id);
    }

    let classes = element.class_list();
    for i in 0..classes.length() {
        if let Some(class) = classes.item(i) {
            info = info.with_class(&class);
        }
    }

    for name in element.get_attribute_names().iter().filter_map(|n| n.as_string()) {
        if let Some(key) = name.strip_prefix("data-") {
            if let Some(value) = element.get_attribute(&name) {
                info = info.with_data(key, &value);
            }
        }
    }

    info
}

/// The clicked element and its ancestors, target first
pub fn click_target(event: &Event) -> ClickTarget {
    let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
        return ClickTarget::default();
    };

    let mut click = ClickTarget {
        path: Vec::new(),
        on_backdrop: target.id() == BACKDROP_ID,
    };

    let mut current = Some(target);
    while let Some(element) = current {
        click.path.push(describe(&element));
        current = element.parent_element();
    }
    click
}

/// Site config from the page, falling back to defaults served from this origin
pub fn load_config() -> Config {
    let embedded = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
        .and_then(|e| e.text_content());

    if let Some(json) = embedded {
        match serde_json::from_str::<Config>(&json) {
            Ok(config) => return config,
            Err(e) => {
                web_sys::console::error_1(&format!("Ignoring invalid #{}: {}", CONFIG_ELEMENT_ID, e).into());
            }
        }
    }

    let mut config = Config::default();
    config.site.base_url = crate::api::site_origin();
    config
}

/// Milliseconds for a gloo timer, saturating instead of wrapping
pub fn timer_ms(ms: impl TryInto<u32>) -> u32 {
    ms.try_into().unwrap_or(u32::MAX)
}

/// `prefers-color-scheme: dark`
pub fn system_prefers_dark() -> bool {
    web_sys::window()
        .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
        .map(|m| m.matches())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio::content::ContentRef;
    use folio::overlay::{ClickRouter, Intent};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn document() -> web_sys::Document {
        web_sys::window().and_then(|w| w.document()).unwrap()
    }

    fn click(element: &Element) -> Event {
        let event = Event::new("click").unwrap();
        element.dispatch_event(&event).unwrap();
        event
    }

    #[wasm_bindgen_test]
    fn test_click_inside_case_study_link_routes_to_open() {
        let document = document();
        let link = document.create_element("a").unwrap();
        link.set_class_name("card case-study-link");
        link.set_attribute("data-slug", "acme").unwrap();
        let label = document.create_element("span").unwrap();
        link.append_child(&label).unwrap();
        document.body().unwrap().append_child(&link).unwrap();

        let target = click_target(&click(&label));
        assert!(!target.on_backdrop);
        assert!(target.path[1].has_class("case-study-link"));
        assert_eq!(target.path[1].data("slug"), Some("acme"));

        assert_eq!(
            ClickRouter::new().route(&target),
            Some(Intent::Open(ContentRef::case_study("acme").unwrap()))
        );
        link.remove();
    }

    #[wasm_bindgen_test]
    fn test_timer_ms_saturates() {
        assert_eq!(timer_ms(300u64), 300);
        assert_eq!(timer_ms(u64::from(u32::MAX) + 1), u32::MAX);
        assert_eq!(timer_ms(std::time::Duration::from_secs(u64::MAX).as_millis()), u32::MAX);
    }

    #[wasm_bindgen_test]
    fn test_click_on_backdrop_itself_is_flagged() {
        let document = document();
        let backdrop = document.create_element("div").unwrap();
        backdrop.set_id(BACKDROP_ID);
        let panel = document.create_element("aside").unwrap();
        backdrop.append_child(&panel).unwrap();
        document.body().unwrap().append_child(&backdrop).unwrap();

        assert!(click_target(&click(&backdrop)).on_backdrop);
        assert!(!click_target(&click(&panel)).on_backdrop);
        backdrop.remove();
    }
}
