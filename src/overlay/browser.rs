//! Browser port
//!
//! The side effects the overlay needs from the page: address bar, full
//! navigation and background scroll.

/// Page-level effects driven by the overlay controller
pub trait Browser {
    /// Path currently shown in the address bar
    fn current_path(&self) -> String;

    /// Add a history entry without loading anything
    fn push_path(&mut self, path: &str);

    /// Rewrite the current history entry without loading anything
    fn replace_path(&mut self, path: &str);

    /// Full page navigation
    fn assign(&mut self, url: &str);

    /// Stop the page behind the overlay from scrolling
    fn lock_scroll(&mut self);

    /// Put background scrolling back the way it was before `lock_scroll`
    fn unlock_scroll(&mut self);
}

/// In-memory browser with a history stack, used off the web
#[derive(Debug, Clone)]
pub struct HeadlessBrowser {
    entries: Vec<String>,
    index: usize,
    scroll_locked: bool,
    assigned: Option<String>,
}

impl HeadlessBrowser {
    pub fn new(start_path: &str) -> Self {
        Self {
            entries: vec![start_path.to_string()],
            index: 0,
            scroll_locked: false,
            assigned: None,
        }
    }

    pub fn history(&self) -> &[String] {
        &self.entries[..=self.index]
    }

    pub fn scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    /// URL of the last full navigation, if one happened
    pub fn assigned(&self) -> Option<&str> {
        self.assigned.as_deref()
    }

    /// Step back one entry, returning the new path (what a popstate would see)
    pub fn back(&mut self) -> Option<String> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(self.entries[self.index].clone())
    }

    /// Step forward one entry
    pub fn forward(&mut self) -> Option<String> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(self.entries[self.index].clone())
    }
}

impl Default for HeadlessBrowser {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Browser for HeadlessBrowser {
    fn current_path(&self) -> String {
        self.entries[self.index].clone()
    }

    fn push_path(&mut self, path: &str) {
        self.entries.truncate(self.index + 1);
        self.entries.push(path.to_string());
        self.index += 1;
    }

    fn replace_path(&mut self, path: &str) {
        self.entries[self.index] = path.to_string();
    }

    fn assign(&mut self, url: &str) {
        self.assigned = Some(url.to_string());
    }

    fn lock_scroll(&mut self) {
        self.scroll_locked = true;
    }

    fn unlock_scroll(&mut self) {
        self.scroll_locked = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_truncates_forward_entries() {
        let mut browser = HeadlessBrowser::default();
        browser.push_path("/blog/a");
        browser.push_path("/blog/b");
        assert_eq!(browser.back().as_deref(), Some("/blog/a"));

        browser.push_path("/blog/c");
        assert_eq!(browser.history(), ["/", "/blog/a", "/blog/c"]);
        assert!(browser.forward().is_none());
    }

    #[test]
    fn test_replace_keeps_depth() {
        let mut browser = HeadlessBrowser::default();
        browser.push_path("/blog/a");
        browser.replace_path("/");
        assert_eq!(browser.history(), ["/", "/"]);
        assert_eq!(browser.current_path(), "/");
    }
}
