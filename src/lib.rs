//! Launcher asset pipeline.
//!
//! Bundled media ships as `AssetsEncrypted/<name>.enc` (AES-256-CBC, IV
//! prefix), is decrypted on demand into a per-user cache, and is otherwise
//! found through plaintext and raw-override fallbacks. The asset key is a hash
//! of a constant string: this keeps media opaque on disk, it does not protect
//! it from anyone holding the binary.
//!
//! ```no_run
//! use launcher_assets::{config, AssetRuntime};
//!
//! let runtime = AssetRuntime::new(config::load()?)?;
//! if let Some(path) = runtime.resolver.resolve_playable_asset("back.mp4") {
//!     println!("play {}", path.display());
//! }
//! # Ok::<(), launcher_assets::config::ConfigError>(())
//! ```

pub mod assets;
pub mod config;
pub mod logging;
pub mod media;
pub mod paths;
pub mod runtime;
pub mod security;
pub mod server_list;

pub use assets::{AssetError, AssetOrigin, AssetResolver, Resolution};
pub use config::AssetConfig;
pub use paths::LauncherPaths;
pub use runtime::AssetRuntime;
