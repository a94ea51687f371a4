//! Media open state machine.
//!
//! `Unopened → Opening → Ready | Failed`, plus `Opening → Unopened` when an
//! open is abandoned before it reached the player. Transitions are checked
//! atomically against the current state; at most one subscriber observes them.

use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tokio::sync::watch;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MediaError {
    #[error("Invalid media transition from {from} to {to}")]
    InvalidTransition { from: &'static str, to: &'static str },

    #[error("Media slot already has a subscriber")]
    AlreadySubscribed,

    #[error("Media asset not found: {0}")]
    AssetMissing(String),

    #[error("Media open failed: {0}")]
    OpenFailed(String),
}

/// Media slot lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaState {
    Unopened,
    Opening,
    Ready,
    Failed(String),
}

impl MediaState {
    pub fn name(&self) -> &'static str {
        match self {
            MediaState::Unopened => "unopened",
            MediaState::Opening => "opening",
            MediaState::Ready => "ready",
            MediaState::Failed(_) => "failed",
        }
    }
}

/// Playback backend. Implemented by the UI layer over its media API.
#[async_trait]
pub trait MediaPlayer: Send + Sync {
    /// Open `path`; resolves once the media is ready or has failed.
    async fn open(&self, path: &Path) -> Result<(), MediaError>;
    fn play(&self);
    fn rewind(&self);
    fn set_volume(&self, volume: f64);
    fn set_muted(&self, muted: bool);
}

/// State holder for one player.
#[derive(Debug)]
pub struct MediaSlot {
    state: watch::Sender<MediaState>,
    subscribed: AtomicBool,
}

impl Default for MediaSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaSlot {
    pub fn new() -> Self {
        let (state, _) = watch::channel(MediaState::Unopened);
        Self { state, subscribed: AtomicBool::new(false) }
    }

    pub fn state(&self) -> MediaState {
        self.state.borrow().clone()
    }

    /// The single transition subscriber.
    pub fn subscribe(&self) -> Result<watch::Receiver<MediaState>, MediaError> {
        if self.subscribed.swap(true, Ordering::AcqRel) {
            return Err(MediaError::AlreadySubscribed);
        }
        Ok(self.state.subscribe())
    }

    pub fn begin_open(&self) -> Result<(), MediaError> {
        self.transition(|s| matches!(s, MediaState::Unopened), MediaState::Opening)
    }

    pub fn mark_ready(&self) -> Result<(), MediaError> {
        self.transition(|s| matches!(s, MediaState::Opening), MediaState::Ready)
    }

    pub fn mark_failed(&self, reason: impl Into<String>) -> Result<(), MediaError> {
        self.transition(|s| matches!(s, MediaState::Opening), MediaState::Failed(reason.into()))
    }

    /// Give up an open that never reached the player.
    pub fn abandon_open(&self) -> Result<(), MediaError> {
        self.transition(|s| matches!(s, MediaState::Opening), MediaState::Unopened)
    }

    fn transition(&self, allowed: impl FnOnce(&MediaState) -> bool, to: MediaState) -> Result<(), MediaError> {
        let mut result = Ok(());
        self.state.send_if_modified(|current| {
            if allowed(current) {
                *current = to;
                true
            } else {
                result = Err(MediaError::InvalidTransition { from: current.name(), to: to.name() });
                false
            }
        });
        result
    }
}
