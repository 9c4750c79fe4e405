//! UI Components
//!
//! Leptos components mounted over the server-rendered pages.

pub mod chart;
pub mod chat;
pub mod loading;
pub mod overlay;
pub mod theme_toggle;
pub mod weather;

pub use chat::ChatWidget;
pub use overlay::ContentOverlay;
pub use theme_toggle::ThemeToggle;
pub use weather::{ClockButton, WeatherPanelView};
