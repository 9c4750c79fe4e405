//! State Management
//!
//! Reactive stores wrapping the core state machines, plus the DOM
//! implementations of their ports.

pub mod audio;
pub mod chat;
pub mod dom;
pub mod global;
pub mod overlay;
pub mod panel;
pub mod theme;

pub use global::{provide_site_state, SiteState};
