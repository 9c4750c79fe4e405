//! Folio Site Widgets
//!
//! Interactive layer for the server-rendered portfolio pages, built with
//! Leptos (WASM).
//!
//! # Features
//!
//! - Post and case-study overlay with history integration
//! - Chat widget with spoken replies
//! - Weather/schedule panel with canvas charts
//! - Persisted light/dark theme
//!
//! # Architecture
//!
//! The state machines live in the `folio` core crate. This crate supplies the
//! browser implementations of its ports (history, storage, audio, HTTP via
//! gloo-net) and renders the reactive views.

use leptos::*;

mod api;
mod app;
mod components;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
