//! HTTP API
//!
//! gloo-net implementations of the core's network ports.

pub mod client;

pub use client::{site_origin, GlooChatBackend, GlooContentSource, GlooWeatherSource};
