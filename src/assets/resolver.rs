//! Logical asset name to playable file path.
//!
//! Lookup order, first hit wins:
//! 1. `AssetsEncrypted/<name>.enc` under each probe directory, then under the
//!    per-user data directory, decrypted through the cache
//! 2. `<install>/Assets/<name>`
//! 3. `<install>/AssetsEncrypted/<name>` (raw override, no decryption)
//! 4. `<data>/AssetsEncrypted/<name>`

use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use super::cache::CacheMaterializer;
use super::error::{validate_name, AssetError};
use crate::paths::LauncherPaths;

/// Where a resolved asset came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetOrigin {
    DecryptedCache,
    Plain,
    RawOverride,
    UserRawOverride,
}

impl std::fmt::Display for AssetOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetOrigin::DecryptedCache => write!(f, "decrypted cache"),
            AssetOrigin::Plain => write!(f, "plain asset"),
            AssetOrigin::RawOverride => write!(f, "raw override"),
            AssetOrigin::UserRawOverride => write!(f, "user raw override"),
        }
    }
}

/// A resolved asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub path: PathBuf,
    pub origin: AssetOrigin,
}

/// Resolves asset names against the launcher layout.
pub struct AssetResolver {
    paths: Arc<LauncherPaths>,
    cache: CacheMaterializer,
}

impl AssetResolver {
    pub fn new(paths: Arc<LauncherPaths>) -> Self {
        let cache = CacheMaterializer::new(paths.clone());
        Self::with_cache(paths, cache)
    }

    pub fn with_cache(paths: Arc<LauncherPaths>, cache: CacheMaterializer) -> Self {
        Self { paths, cache }
    }

    pub fn paths(&self) -> &LauncherPaths {
        &self.paths
    }

    pub fn cache(&self) -> &CacheMaterializer {
        &self.cache
    }

    /// Path to a playable copy of `name`, or `None` when no usable source
    /// exists. Never fails; every miss and fallback is logged.
    pub fn resolve_playable_asset(&self, name: &str) -> Option<PathBuf> {
        match self.resolve(name) {
            Ok(resolution) => Some(resolution.path),
            Err(e) => {
                tracing::info!(asset = name, kind = e.kind().as_str(), "{}", e);
                None
            }
        }
    }

    /// Resolve `name`, reporting which source won.
    pub fn resolve(&self, name: &str) -> Result<Resolution, AssetError> {
        validate_name(name)?;

        if let Some(encrypted) = self.find_encrypted(name) {
            match self.cache.try_ensure_decrypted(&encrypted, name) {
                Ok(path) => return Ok(Resolution { path, origin: AssetOrigin::DecryptedCache }),
                Err(e) => tracing::warn!(
                    source = %encrypted.display(),
                    kind = e.kind().as_str(),
                    "Decryption failed, falling back to raw assets: {}",
                    e
                ),
            }
        }

        let fallbacks = [
            (self.paths.plain_asset(name), AssetOrigin::Plain),
            (self.paths.raw_override(name), AssetOrigin::RawOverride),
            (self.paths.user_raw_override(name), AssetOrigin::UserRawOverride),
        ];
        for (path, origin) in fallbacks {
            if path.is_file() {
                tracing::info!(path = %path.display(), "Using {}", origin);
                return Ok(Resolution { path, origin });
            }
        }

        Err(AssetError::NotFound(name.to_string()))
    }

    /// First existing `<name>.enc` across the probe directories, then the
    /// per-user data directory.
    pub fn find_encrypted(&self, name: &str) -> Option<PathBuf> {
        for dir in self.paths.probe_dirs() {
            let candidate = LauncherPaths::encrypted_bundle_in(dir, name);
            if candidate.is_file() {
                tracing::debug!(path = %candidate.display(), "Found encrypted asset");
                return Some(candidate);
            }
        }

        let user = self.paths.user_encrypted_bundle(name);
        if user.is_file() {
            tracing::debug!(path = %user.display(), "Found encrypted asset in user data");
            return Some(user);
        }

        tracing::debug!(
            asset = name,
            probed = %display_dirs(self.paths.probe_dirs()),
            "Encrypted asset not found"
        );
        None
    }
}

fn display_dirs(dirs: &[PathBuf]) -> String {
    dirs.iter()
        .map(|d| d.display().to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Resolve the assets the launcher window opens first, so the cache is warm
/// before playback starts. Returns how many resolved.
pub fn warm_up(resolver: &AssetResolver, names: &[&str]) -> usize {
    names
        .iter()
        .filter(|name| resolver.resolve_playable_asset(name).is_some())
        .count()
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
