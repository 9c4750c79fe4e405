//! Audio Slot
//!
//! Owns the one clip allowed to play at a time. Starting a clip stops and
//! releases the previous one first; there is no queue.

use std::fmt;
use thiserror::Error;

/// Something that can be started and stopped, e.g. an `<audio>` element
pub trait Clip {
    fn start(&mut self) -> Result<(), AudioError>;
    fn stop(&mut self);
}

/// Errors raised while starting playback
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AudioError {
    #[error("Could not load audio from {0}")]
    Load(String),

    #[error("Playback refused: {0}")]
    Playback(String),
}

/// Handle to a clip handed to [`AudioSlot::play`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClipId(u64);

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "clip-{}", self.0)
    }
}

/// Single-slot owner of the playing clip
pub struct AudioSlot<C: Clip> {
    current: Option<(ClipId, C)>,
    next_id: u64,
}

impl<C: Clip> Default for AudioSlot<C> {
    fn default() -> Self {
        Self {
            current: None,
            next_id: 0,
        }
    }
}

impl<C: Clip> AudioSlot<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop whatever is playing, then start `clip`
    pub fn play(&mut self, mut clip: C) -> Result<ClipId, AudioError> {
        self.stop();

        self.next_id += 1;
        let id = ClipId(self.next_id);
        clip.start()?;

        tracing::debug!("Playing {}", id);
        self.current = Some((id, clip));
        Ok(id)
    }

    /// Stop and release the current clip, if any
    pub fn stop(&mut self) {
        if let Some((id, mut clip)) = self.current.take() {
            clip.stop();
            tracing::debug!("Stopped {}", id);
        }
    }

    /// A clip finished on its own. Ignored unless it still owns the slot.
    pub fn ended(&mut self, id: ClipId) -> bool {
        match &self.current {
            Some((current, _)) if *current == id => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_id(&self) -> Option<ClipId> {
        self.current.as_ref().map(|(id, _)| *id)
    }
}
