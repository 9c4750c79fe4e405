//! Click Routing
//!
//! One dispatch table turns a click (described as the chain of elements from
//! the target up to the document) into a single overlay intent.

use std::collections::HashMap;

use crate::content::{ContentKind, ContentRef, Slug};

/// What the user asked the overlay to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Open(ContentRef),
    /// Move to a neighbour of the content currently shown
    Navigate(Slug),
    Close,
}

/// The parts of an element the router looks at
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementInfo {
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub data: HashMap<String, String>,
}

impl ElementInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    /// Add a `data-*` attribute, keyed without the `data-` prefix
    pub fn with_data(mut self, name: &str, value: &str) -> Self {
        self.data.insert(name.to_string(), value.to_string());
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn data(&self, name: &str) -> Option<&str> {
        self.data.get(name).map(String::as_str)
    }
}

/// A click, as seen by the document-level listener
#[derive(Debug, Clone, Default)]
pub struct ClickTarget {
    /// Target first, then its ancestors
    pub path: Vec<ElementInfo>,
    /// The target is the backdrop element itself (not something inside the panel)
    pub on_backdrop: bool,
}

impl ClickTarget {
    pub fn element(element: ElementInfo) -> Self {
        Self {
            path: vec![element],
            on_backdrop: false,
        }
    }

    pub fn backdrop() -> Self {
        Self {
            path: Vec::new(),
            on_backdrop: true,
        }
    }

    pub fn within(mut self, ancestor: ElementInfo) -> Self {
        self.path.push(ancestor);
        self
    }
}

#[derive(Debug, Clone, Copy)]
enum Marker {
    Class(&'static str),
    Id(&'static str),
    Data(&'static str),
}

impl Marker {
    fn matches(self, element: &ElementInfo) -> bool {
        match self {
            Marker::Class(class) => element.has_class(class),
            Marker::Id(id) => element.id.as_deref() == Some(id),
            Marker::Data(name) => element.data.contains_key(name),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Open(ContentKind),
    /// Kind read from the marker's own data attribute
    OpenTyped,
    Navigate,
    Close,
}

#[derive(Debug, Clone, Copy)]
struct Route {
    marker: Marker,
    action: Action,
}

/// Document-level click dispatch table
#[derive(Debug, Clone)]
pub struct ClickRouter {
    routes: Vec<Route>,
}

/// Data attribute carrying the slug on content links
pub const SLUG_ATTR: &str = "slug";
/// Data attribute carrying the slug on prev/next links
pub const NEIGHBOR_SLUG_ATTR: &str = "post-slug";
/// Generic content link marker (`data-content-link="post|case-study"`)
pub const CONTENT_LINK_ATTR: &str = "content-link";
pub const CLOSE_BUTTON_ID: &str = "close-overlay";

impl Default for ClickRouter {
    fn default() -> Self {
        Self {
            routes: vec![
                Route { marker: Marker::Id(CLOSE_BUTTON_ID), action: Action::Close },
                Route { marker: Marker::Class("next-post"), action: Action::Navigate },
                Route { marker: Marker::Class("prev-post"), action: Action::Navigate },
                Route { marker: Marker::Class("post-link"), action: Action::Open(ContentKind::Post) },
                Route {
                    marker: Marker::Class("case-study-link"),
                    action: Action::Open(ContentKind::CaseStudy),
                },
                Route { marker: Marker::Data(CONTENT_LINK_ATTR), action: Action::OpenTyped },
            ],
        }
    }
}

impl ClickRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route a click. `None` means the click is not the overlay's business
    /// and the browser's default behaviour should proceed.
    pub fn route(&self, click: &ClickTarget) -> Option<Intent> {
        if click.on_backdrop {
            return Some(Intent::Close);
        }

        for element in &click.path {
            if let Some(route) = self.routes.iter().find(|r| r.marker.matches(element)) {
                return Self::intent_for(route, element);
            }
        }
        None
    }

    /// Route a key press
    pub fn route_key(&self, key: &str) -> Option<Intent> {
        matches!(key, "Escape" | "Esc").then_some(Intent::Close)
    }

    fn intent_for(route: &Route, element: &ElementInfo) -> Option<Intent> {
        let slug_from = |attr: &str| {
            let raw = element.data(attr)?;
            match Slug::parse(raw) {
                Ok(slug) => Some(slug),
                Err(e) => {
                    tracing::warn!("Ignoring content link: {}", e);
                    None
                }
            }
        };

        match route.action {
            Action::Close => Some(Intent::Close),
            Action::Navigate => slug_from(NEIGHBOR_SLUG_ATTR).map(Intent::Navigate),
            Action::Open(kind) => slug_from(SLUG_ATTR).map(|slug| Intent::Open(ContentRef::new(slug, kind))),
            Action::OpenTyped => {
                let kind = element.data(CONTENT_LINK_ATTR)?.parse::<ContentKind>().ok()?;
                slug_from(SLUG_ATTR).map(|slug| Intent::Open(ContentRef::new(slug, kind)))
            }
        }
    }
}
