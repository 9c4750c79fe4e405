//! Theme preference
//!
//! Light/dark mode persisted under a single `darkMode` key. Without a stored
//! value the system preference decides.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Storage key holding `"true"` or `"false"`
pub const DARK_MODE_KEY: &str = "darkMode";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn from_dark(dark: bool) -> Self {
        if dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    pub fn toggled(self) -> Self {
        Self::from_dark(!self.is_dark())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Could not persist {key}: {reason}")]
pub struct PreferenceError {
    pub key: String,
    pub reason: String,
}

/// Key/value store for user preferences (localStorage in the browser)
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

/// In-memory preference store
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Current theme backed by a preference store
pub struct ThemeManager<S: PreferenceStore> {
    store: S,
    theme: Theme,
}

impl<S: PreferenceStore> ThemeManager<S> {
    /// Stored value if present and valid, otherwise the system preference
    pub fn new(store: S, system_dark: bool) -> Self {
        let theme = match store.get(DARK_MODE_KEY).as_deref() {
            Some("true") => Theme::Dark,
            Some("false") => Theme::Light,
            Some(other) => {
                tracing::debug!("Ignoring stored {}={:?}", DARK_MODE_KEY, other);
                Theme::from_dark(system_dark)
            }
            None => Theme::from_dark(system_dark),
        };

        Self { store, theme }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn has_stored_preference(&self) -> bool {
        matches!(
            self.store.get(DARK_MODE_KEY).as_deref(),
            Some("true") | Some("false")
        )
    }

    /// Flip and persist. A failed write keeps the new theme for this page.
    pub fn toggle(&mut self) -> Theme {
        self.set(self.theme.toggled())
    }

    pub fn set(&mut self, theme: Theme) -> Theme {
        self.theme = theme;
        let value = if theme.is_dark() { "true" } else { "false" };
        if let Err(e) = self.store.set(DARK_MODE_KEY, value) {
            tracing::warn!("{}", e);
        }
        theme
    }

    /// System preference changed. Only applies when nothing is stored.
    pub fn system_changed(&mut self, system_dark: bool) -> Option<Theme> {
        if self.has_stored_preference() {
            return None;
        }
        let theme = Theme::from_dark(system_dark);
        if theme == self.theme {
            return None;
        }
        self.theme = theme;
        Some(theme)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_theme_follows_system_without_preference() {
        assert_eq!(ThemeManager::new(MemoryStore::new(), true).theme(), Theme::Dark);
        assert_eq!(ThemeManager::new(MemoryStore::new(), false).theme(), Theme::Light);
    }

    #[test]
    fn test_stored_preference_wins() {
        let store = MemoryStore::new();
        store.set(DARK_MODE_KEY, "false").unwrap();
        assert_eq!(ThemeManager::new(store, true).theme(), Theme::Light);

        let store = MemoryStore::new();
        store.set(DARK_MODE_KEY, "maybe").unwrap();
        assert_eq!(ThemeManager::new(store, true).theme(), Theme::Dark);
    }

    #[test]
    fn test_toggle_persists_under_dark_mode_key() {
        let mut manager = ThemeManager::new(MemoryStore::new(), false);

        assert_eq!(manager.toggle(), Theme::Dark);
        assert_eq!(manager.store().get(DARK_MODE_KEY).as_deref(), Some("true"));

        assert_eq!(manager.toggle(), Theme::Light);
        assert_eq!(manager.store().get(DARK_MODE_KEY).as_deref(), Some("false"));
    }

    #[test]
    fn test_preference_survives_reload() {
        let mut manager = ThemeManager::new(MemoryStore::new(), false);
        manager.toggle();

        let ThemeManager { store, .. } = manager;
        assert_eq!(ThemeManager::new(store, false).theme(), Theme::Dark);
    }

    #[test]
    fn test_system_change_ignored_once_stored() {
        let mut manager = ThemeManager::new(MemoryStore::new(), false);
        assert_eq!(manager.system_changed(true), Some(Theme::Dark));
        assert_eq!(manager.system_changed(true), None);

        manager.set(Theme::Light);
        assert_eq!(manager.system_changed(true), None);
        assert_eq!(manager.theme(), Theme::Light);
    }
}
