//! Launcher media: shared interface settings, open state machine, and the
//! button sound / background video controllers that consume resolved assets.

pub mod controllers;
pub mod settings;
pub mod slot;

pub use controllers::{BackgroundVideo, ButtonSound, FallbackBeep, SoundAction};
pub use settings::UiSettings;
pub use slot::{MediaError, MediaPlayer, MediaSlot, MediaState};
