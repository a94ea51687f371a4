//! Shared interface settings.
//!
//! One `UiSettings` is created at startup and cloned into the settings panel
//! and every sound player; clones share state.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::DEFAULT_SFX_VOLUME;

#[derive(Debug)]
struct Inner {
    sfx_volume: f64,
}

/// Clone-to-share handle over interface settings.
#[derive(Debug, Clone)]
pub struct UiSettings {
    inner: Arc<RwLock<Inner>>,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self::new(DEFAULT_SFX_VOLUME)
    }
}

impl UiSettings {
    pub fn new(sfx_volume: f64) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner { sfx_volume: clamp_volume(sfx_volume) })),
        }
    }

    /// Interface sound volume, 0.0..=1.0.
    pub fn sfx_volume(&self) -> f64 {
        self.inner.read().sfx_volume
    }

    /// Set the volume, clamped to 0.0..=1.0. NaN mutes.
    pub fn set_sfx_volume(&self, volume: f64) {
        self.inner.write().sfx_volume = clamp_volume(volume);
    }

    /// Set from the settings slider's 0..=100 scale.
    pub fn set_sfx_volume_percent(&self, percent: f64) {
        self.set_sfx_volume(percent / 100.0);
    }

    /// Slider label: the volume as a rounded percentage.
    pub fn sfx_volume_label(&self) -> String {
        format!("{}", (self.sfx_volume() * 100.0).round() as i64)
    }
}

fn clamp_volume(volume: f64) -> f64 {
    if volume.is_nan() {
        return 0.0;
    }
    volume.clamp(0.0, 1.0)
}
