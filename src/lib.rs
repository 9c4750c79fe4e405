//! # Folio
//!
//! Client-side behaviour for a personal portfolio site: an in-page overlay
//! for posts and case studies, a chat widget with spoken replies, and a
//! weather/schedule panel.
//!
//! ## Features
//!
//! - **Overlay lifecycle**: explicit state machine with validated transitions
//! - **Ordered fetches**: request tokens so only the latest response renders
//! - **Graceful degradation**: failed fetches fall back to the canonical page
//! - **Single audio owner**: starting a clip always stops the previous one
//!
//! ## Modules
//!
//! - [`content`]: slugs, payloads and the content loader
//! - [`overlay`]: overlay state, click routing and the controller
//! - [`chat`]: chat transcript and backend port
//! - [`audio`]: the single playback slot
//! - [`weather`]: forecast models, chart series and the panel
//! - [`schedule`]: booking calendar embed
//! - [`theme`]: persisted light/dark preference
//! - [`config`]: TOML configuration with environment overrides
//!
//! Browser and network effects sit behind traits ([`overlay::Browser`],
//! [`content::ContentSource`], [`chat::ChatBackend`], [`weather::WeatherSource`],
//! [`audio::Clip`], [`timer::Delay`]) so the same core runs in the wasm UI and
//! natively. The `native` feature adds reqwest/tokio implementations.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use folio::content::{ContentLoader, ContentRef, HttpContentSource};
//! use folio::overlay::{HeadlessBrowser, OverlayController};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = HttpContentSource::new("http://localhost:8080", Duration::from_secs(15))?;
//!     let loader = ContentLoader::new(source);
//!     let mut overlay = OverlayController::new(HeadlessBrowser::default());
//!
//!     let outcome = overlay.open(&loader, ContentRef::post("hello-world")?, false).await?;
//!     println!("{:?}", outcome);
//!     println!("History: {:?}", overlay.browser().history());
//!
//!     Ok(())
//! }
//! ```

pub mod audio;
pub mod chat;
pub mod config;
pub mod content;
pub mod overlay;
pub mod schedule;
pub mod theme;
pub mod timer;
pub mod weather;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use content::{ContentKind, ContentPayload, ContentRef, Slug};
pub use overlay::{OverlayController, OverlayState, OverlayView};
