//! Content Overlay
//!
//! Slide-in panel showing posts and case studies without a page load:
//!
//! - [`state`]: explicit lifecycle (`Closed → Opening → Open ⇄ Navigating → Closing`)
//! - [`sequencer`]: request tokens so only the latest response is applied
//! - [`router`]: single click/key dispatch table
//! - [`controller`]: history, scroll and fallback navigation side effects
//! - [`browser`]: the page-effects port and an in-memory implementation

pub mod browser;
pub mod controller;
pub mod router;
pub mod sequencer;
pub mod state;

pub use browser::{Browser, HeadlessBrowser};
pub use controller::{CloseTicket, Dispatch, FetchTicket, OverlayController, Outcome};
pub use router::{ClickRouter, ClickTarget, ElementInfo, Intent};
pub use sequencer::{RequestToken, Sequencer};
pub use state::{Displayed, OverlayEvent, OverlayState, OverlayView, Phase, TransitionError};
