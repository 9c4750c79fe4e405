//! Overlay State Machine
//!
//! The overlay is always in exactly one of five phases. Transitions are
//! validated here; side effects (history, scroll, navigation) live in the
//! controller and the UI renders [`OverlayView`] as a projection.

use std::fmt;
use thiserror::Error;

use super::sequencer::RequestToken;
use crate::content::{ContentKind, ContentPayload, ContentRef, Resolved};

/// Content currently rendered inside the panel
#[derive(Debug, Clone, PartialEq)]
pub struct Displayed {
    pub reference: ContentRef,
    pub served_as: ContentKind,
    pub payload: ContentPayload,
}

impl From<Resolved> for Displayed {
    fn from(resolved: Resolved) -> Self {
        Self {
            reference: resolved.requested,
            served_as: resolved.served_as,
            payload: resolved.payload,
        }
    }
}

/// Overlay lifecycle
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayState {
    /// Nothing mounted
    Closed,
    /// First fetch in flight, shell not yet mounted
    Opening { target: ContentRef, token: RequestToken },
    /// Shell mounted, content shown
    Open { shown: Displayed },
    /// Shell mounted, replacement content in flight
    Navigating {
        shown: Displayed,
        target: ContentRef,
        token: RequestToken,
    },
    /// Exit animation running, removal pending
    Closing { shown: Displayed, token: RequestToken },
}

/// Name of a state, for logs and errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Closed,
    Opening,
    Open,
    Navigating,
    Closing,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Closed => "closed",
            Phase::Opening => "opening",
            Phase::Open => "open",
            Phase::Navigating => "navigating",
            Phase::Closing => "closing",
        };
        f.write_str(name)
    }
}

/// Inputs to the state machine
#[derive(Debug, Clone)]
pub enum OverlayEvent {
    /// Open content; replaces whatever is shown
    Open { target: ContentRef, token: RequestToken },
    /// Move to other content inside a mounted shell
    Navigate { target: ContentRef, token: RequestToken },
    Loaded { token: RequestToken, shown: Displayed },
    Failed { token: RequestToken },
    CloseStarted { token: RequestToken },
    CloseFinished { token: RequestToken },
}

impl OverlayEvent {
    fn name(&self) -> &'static str {
        match self {
            OverlayEvent::Open { .. } => "open",
            OverlayEvent::Navigate { .. } => "navigate",
            OverlayEvent::Loaded { .. } => "load",
            OverlayEvent::Failed { .. } => "fail",
            OverlayEvent::CloseStarted { .. } => "close",
            OverlayEvent::CloseFinished { .. } => "finish closing",
        }
    }
}

/// Rejected transitions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransitionError {
    #[error("cannot {action} while overlay is {phase}")]
    Invalid { action: &'static str, phase: Phase },

    #[error("request {token} is no longer current")]
    Stale { token: RequestToken },
}

impl Default for OverlayState {
    fn default() -> Self {
        OverlayState::Closed
    }
}

impl OverlayState {
    pub fn phase(&self) -> Phase {
        match self {
            OverlayState::Closed => Phase::Closed,
            OverlayState::Opening { .. } => Phase::Opening,
            OverlayState::Open { .. } => Phase::Open,
            OverlayState::Navigating { .. } => Phase::Navigating,
            OverlayState::Closing { .. } => Phase::Closing,
        }
    }

    /// Content currently rendered, if any
    pub fn shown(&self) -> Option<&Displayed> {
        match self {
            OverlayState::Open { shown }
            | OverlayState::Navigating { shown, .. }
            | OverlayState::Closing { shown, .. } => Some(shown),
            OverlayState::Closed | OverlayState::Opening { .. } => None,
        }
    }

    pub fn shell_mounted(&self) -> bool {
        self.shown().is_some()
    }

    /// Token of the fetch or close currently pending
    pub fn pending_token(&self) -> Option<RequestToken> {
        match self {
            OverlayState::Opening { token, .. }
            | OverlayState::Navigating { token, .. }
            | OverlayState::Closing { token, .. } => Some(*token),
            OverlayState::Closed | OverlayState::Open { .. } => None,
        }
    }

    /// Compute the next state, leaving `self` untouched on error
    pub fn apply(&self, event: OverlayEvent) -> Result<OverlayState, TransitionError> {
        let invalid = |event: &OverlayEvent| TransitionError::Invalid {
            action: event.name(),
            phase: self.phase(),
        };

        match (self, event) {
            (OverlayState::Closed | OverlayState::Opening { .. }, OverlayEvent::Open { target, token }) => {
                Ok(OverlayState::Opening { target, token })
            }
            (
                OverlayState::Open { shown }
                | OverlayState::Navigating { shown, .. }
                | OverlayState::Closing { shown, .. },
                OverlayEvent::Open { target, token } | OverlayEvent::Navigate { target, token },
            ) => Ok(OverlayState::Navigating {
                shown: shown.clone(),
                target,
                token,
            }),
            (
                OverlayState::Opening { token: pending, .. }
                | OverlayState::Navigating { token: pending, .. },
                OverlayEvent::Loaded { token, shown },
            ) => {
                if *pending != token {
                    return Err(TransitionError::Stale { token });
                }
                Ok(OverlayState::Open { shown })
            }
            (
                OverlayState::Opening { token: pending, .. }
                | OverlayState::Navigating { token: pending, .. },
                OverlayEvent::Failed { token },
            ) => {
                if *pending != token {
                    return Err(TransitionError::Stale { token });
                }
                Ok(OverlayState::Closed)
            }
            (OverlayState::Opening { .. }, OverlayEvent::CloseStarted { .. }) => Ok(OverlayState::Closed),
            (
                OverlayState::Open { shown } | OverlayState::Navigating { shown, .. },
                OverlayEvent::CloseStarted { token },
            ) => Ok(OverlayState::Closing {
                shown: shown.clone(),
                token,
            }),
            (OverlayState::Closing { token: pending, .. }, OverlayEvent::CloseFinished { token }) => {
                if *pending != token {
                    return Err(TransitionError::Stale { token });
                }
                Ok(OverlayState::Closed)
            }
            (_, event) => Err(invalid(&event)),
        }
    }

    pub fn view(&self) -> OverlayView {
        OverlayView {
            shell_mounted: self.shell_mounted(),
            closing: matches!(self, OverlayState::Closing { .. }),
            loading: matches!(
                self,
                OverlayState::Opening { .. } | OverlayState::Navigating { .. }
            ),
            shown: self.shown().cloned(),
        }
    }
}

/// What the UI should render for the overlay
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayView {
    /// Backdrop and panel present in the document
    pub shell_mounted: bool,
    /// Exit animation class applied
    pub closing: bool,
    /// A content fetch is in flight
    pub loading: bool,
    pub shown: Option<Displayed>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::sequencer::Sequencer;
    use crate::testing::payload;

    fn displayed(slug: &str) -> Displayed {
        Displayed {
            reference: ContentRef::post(slug).unwrap(),
            served_as: ContentKind::Post,
            payload: payload(slug),
        }
    }

    #[test]
    fn test_open_load_close_cycle() {
        let mut seq = Sequencer::new();
        let target = ContentRef::post("a").unwrap();

        let t1 = seq.issue();
        let state = OverlayState::Closed
            .apply(OverlayEvent::Open { target, token: t1 })
            .unwrap();
        assert_eq!(state.phase(), Phase::Opening);
        assert!(!state.view().shell_mounted);
        assert!(state.view().loading);

        let state = state
            .apply(OverlayEvent::Loaded { token: t1, shown: displayed("a") })
            .unwrap();
        assert_eq!(state.phase(), Phase::Open);
        assert!(state.view().shell_mounted);

        let t2 = seq.issue();
        let state = state.apply(OverlayEvent::CloseStarted { token: t2 }).unwrap();
        assert!(state.view().closing);

        let state = state.apply(OverlayEvent::CloseFinished { token: t2 }).unwrap();
        assert_eq!(state, OverlayState::Closed);
    }

    #[test]
    fn test_navigate_requires_mounted_shell() {
        let err = OverlayState::Closed
            .apply(OverlayEvent::Navigate {
                target: ContentRef::post("b").unwrap(),
                token: Sequencer::new().issue(),
            })
            .unwrap_err();
        assert_eq!(
            err,
            TransitionError::Invalid {
                action: "navigate",
                phase: Phase::Closed
            }
        );
    }

    #[test]
    fn test_open_while_open_navigates_in_place() {
        let mut seq = Sequencer::new();
        let state = OverlayState::Open { shown: displayed("a") };
        let state = state
            .apply(OverlayEvent::Open {
                target: ContentRef::post("b").unwrap(),
                token: seq.issue(),
            })
            .unwrap();
        assert_eq!(state.phase(), Phase::Navigating);
        assert_eq!(state.shown().unwrap().payload.title, "a");
    }

    #[test]
    fn test_stale_load_rejected() {
        let mut seq = Sequencer::new();
        let old = seq.issue();
        let new = seq.issue();
        let state = OverlayState::Opening {
            target: ContentRef::post("b").unwrap(),
            token: new,
        };
        let err = state
            .apply(OverlayEvent::Loaded { token: old, shown: displayed("a") })
            .unwrap_err();
        assert_eq!(err, TransitionError::Stale { token: old });
    }

    #[test]
    fn test_close_while_opening_drops_straight_to_closed() {
        let mut seq = Sequencer::new();
        let state = OverlayState::Opening {
            target: ContentRef::post("a").unwrap(),
            token: seq.issue(),
        };
        let state = state.apply(OverlayEvent::CloseStarted { token: seq.issue() }).unwrap();
        assert_eq!(state, OverlayState::Closed);
    }

    #[test]
    fn test_close_when_closed_is_invalid() {
        let err = OverlayState::Closed
            .apply(OverlayEvent::CloseStarted { token: Sequencer::new().issue() })
            .unwrap_err();
        assert!(matches!(err, TransitionError::Invalid { phase: Phase::Closed, .. }));
    }
}
