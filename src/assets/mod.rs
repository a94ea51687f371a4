//! Encrypted asset pipeline.
//!
//! - `resolver`: name → playable path, with fallbacks
//! - `cache`: decrypted cache materialization
//! - `encryptor`: startup encryption of bundled assets
//! - `error`: failure taxonomy

pub mod cache;
pub mod encryptor;
pub mod error;
pub mod resolver;

pub use cache::{CacheMaterializer, CacheStats};
pub use encryptor::{encrypt_if_needed, AssetEncryptor, EncryptOutcome, MaintenanceFailure, MaintenanceReport};
pub use error::{validate_name, AssetError, AssetErrorKind};
pub use resolver::{warm_up, AssetOrigin, AssetResolver, Resolution};

/// Background video, preferred first.
pub const BACKGROUND_VIDEOS: [&str; 2] = ["back.mp4", "backg.mp4"];
/// Interface click/hover sound.
pub const BUTTON_SOUND: &str = "buttons.mp3";
