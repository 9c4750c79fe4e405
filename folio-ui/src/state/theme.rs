//! Theme State
//!
//! Persists the theme in localStorage and mirrors it onto `<html class="dark">`.

use leptos::*;
use std::cell::RefCell;
use std::rc::Rc;

use folio::theme::{PreferenceError, PreferenceStore, Theme, ThemeManager};

use super::dom::system_prefers_dark;

/// `window.localStorage`
pub struct LocalStore;

impl LocalStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok().flatten())
    }
}

impl PreferenceStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage().and_then(|s| s.get_item(key).ok().flatten())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let storage = Self::storage().ok_or_else(|| PreferenceError {
            key: key.to_string(),
            reason: "localStorage unavailable".to_string(),
        })?;
        storage.set_item(key, value).map_err(|e| PreferenceError {
            key: key.to_string(),
            reason: format!("{:?}", e),
        })
    }
}

#[derive(Clone)]
pub struct ThemeState {
    manager: Rc<RefCell<ThemeManager<LocalStore>>>,
    pub theme: RwSignal<Theme>,
}

impl ThemeState {
    pub fn new() -> Self {
        let manager = ThemeManager::new(LocalStore, system_prefers_dark());
        let theme = manager.theme();
        apply_to_document(theme);

        Self {
            manager: Rc::new(RefCell::new(manager)),
            theme: create_rw_signal(theme),
        }
    }

    pub fn toggle(&self) {
        let theme = self.manager.borrow_mut().toggle();
        apply_to_document(theme);
        self.theme.set(theme);
    }

    /// `prefers-color-scheme` changed
    pub fn system_changed(&self, dark: bool) {
        let changed = self.manager.borrow_mut().system_changed(dark);
        if let Some(theme) = changed {
            apply_to_document(theme);
            self.theme.set(theme);
        }
    }
}

fn apply_to_document(theme: Theme) {
    let Some(root) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
    else {
        return;
    };
    let _ = root.class_list().toggle_with_force("dark", theme.is_dark());
}
