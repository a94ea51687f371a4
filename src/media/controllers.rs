//! Interface sound and background video controllers.

use std::path::PathBuf;
use std::sync::Arc;

use super::settings::UiSettings;
use super::slot::{MediaError, MediaPlayer, MediaSlot, MediaState};
use crate::assets::{AssetResolver, BACKGROUND_VIDEOS, BUTTON_SOUND};

/// System alert used when the click sound cannot play.
pub type FallbackBeep = Box<dyn Fn() + Send + Sync>;

/// What a `ButtonSound::play` call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundAction {
    Played,
    /// Sound unusable; the fallback beep was played instead.
    Fallback,
    /// An open is already in flight.
    Ignored,
    /// No `buttons.mp3` anywhere.
    Missing,
}

/// Resolve `name` off the async executor.
async fn resolve_blocking(resolver: &Arc<AssetResolver>, name: &'static str) -> Option<PathBuf> {
    let resolver = resolver.clone();
    tokio::task::spawn_blocking(move || resolver.resolve_playable_asset(name))
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(asset = name, "Asset resolution task failed: {}", e);
            None
        })
}

/// Hover/click sound for launcher buttons.
pub struct ButtonSound {
    player: Arc<dyn MediaPlayer>,
    resolver: Arc<AssetResolver>,
    settings: UiSettings,
    fallback: FallbackBeep,
    slot: MediaSlot,
}

impl ButtonSound {
    pub fn new(
        player: Arc<dyn MediaPlayer>,
        resolver: Arc<AssetResolver>,
        settings: UiSettings,
        fallback: FallbackBeep,
    ) -> Self {
        Self { player, resolver, settings, fallback, slot: MediaSlot::new() }
    }

    pub fn slot(&self) -> &MediaSlot {
        &self.slot
    }

    /// Play the click. Opens the sound on first use, at the volume current
    /// when playback starts.
    pub async fn play(&self) -> SoundAction {
        match self.slot.state() {
            MediaState::Failed(_) => {
                (self.fallback)();
                SoundAction::Fallback
            }
            MediaState::Opening => SoundAction::Ignored,
            MediaState::Ready => {
                self.start();
                SoundAction::Played
            }
            MediaState::Unopened => self.open_and_play().await,
        }
    }

    async fn open_and_play(&self) -> SoundAction {
        if self.slot.begin_open().is_err() {
            return SoundAction::Ignored;
        }

        let Some(path) = resolve_blocking(&self.resolver, BUTTON_SOUND).await else {
            tracing::info!("Button sound file not found");
            let _ = self.slot.abandon_open();
            return SoundAction::Missing;
        };

        match self.player.open(&path).await {
            Ok(()) => {
                let _ = self.slot.mark_ready();
                tracing::info!(path = %path.display(), "Button sound opened");
                self.start();
                SoundAction::Played
            }
            Err(e) => {
                tracing::warn!("Button sound failed: {}", e);
                let _ = self.slot.mark_failed(e.to_string());
                (self.fallback)();
                SoundAction::Fallback
            }
        }
    }

    fn start(&self) {
        self.player.rewind();
        self.player.set_volume(self.settings.sfx_volume());
        self.player.play();
    }
}

/// Muted, looping launcher background video.
pub struct BackgroundVideo {
    player: Arc<dyn MediaPlayer>,
    resolver: Arc<AssetResolver>,
    slot: MediaSlot,
}

impl BackgroundVideo {
    pub fn new(player: Arc<dyn MediaPlayer>, resolver: Arc<AssetResolver>) -> Self {
        Self { player, resolver, slot: MediaSlot::new() }
    }

    pub fn slot(&self) -> &MediaSlot {
        &self.slot
    }

    /// Open the first available background video and start it muted.
    pub async fn start(&self) -> Result<PathBuf, MediaError> {
        self.slot.begin_open()?;

        let mut found = None;
        for name in BACKGROUND_VIDEOS {
            if let Some(path) = resolve_blocking(&self.resolver, name).await {
                found = Some(path);
                break;
            }
        }
        let Some(path) = found else {
            tracing::info!("Background video not found");
            let _ = self.slot.abandon_open();
            return Err(MediaError::AssetMissing(BACKGROUND_VIDEOS.join(" | ")));
        };

        tracing::info!(path = %path.display(), "Background video opening");
        self.player.set_muted(true);
        match self.player.open(&path).await {
            Ok(()) => {
                self.slot.mark_ready()?;
                self.player.play();
                tracing::info!("Background video opened");
                Ok(path)
            }
            Err(e) => {
                tracing::warn!("Background video failed: {}", e);
                self.slot.mark_failed(e.to_string())?;
                Err(e)
            }
        }
    }

    /// Loop: restart from the top when playback ends.
    pub fn on_media_ended(&self) {
        if self.slot.state() == MediaState::Ready {
            self.player.rewind();
            self.player.play();
        }
    }
}

#[cfg(test)]
#[path = "controllers_tests.rs"]
mod tests;
