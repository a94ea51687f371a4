//! Decrypted asset cache.
//!
//! Materializes `<data>/AssetsCache/<name>` from an encrypted source. An entry
//! is fresh while its mtime is at least the source's mtime; anything else is
//! re-decrypted. Staleness is judged by timestamps alone, so a filesystem with
//! coarse mtime resolution or a copy that carries a skewed clock can make a
//! stale entry look fresh.
//!
//! Decryption goes to a temp file in the cache directory and is renamed into
//! place only after the padding checks out, so a failed or interrupted decrypt
//! never leaves a servable entry behind. Writes for one asset name are
//! serialized by a per-name lock.

use dashmap::DashMap;
use parking_lot::Mutex;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::SystemTime;
use tempfile::NamedTempFile;

use super::error::{validate_name, AssetError};
use crate::paths::LauncherPaths;
use crate::security::AssetCipher;

/// Cache counters.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub cache_hits: u64,
    pub cache_misses: u64,
    /// Times an encrypted source was opened for reading.
    pub source_reads: u64,
    pub decrypt_failures: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            return 0.0;
        }
        self.cache_hits as f64 / total as f64
    }
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    source_reads: AtomicU64,
    failures: AtomicU64,
}

/// Produces plaintext cache entries for encrypted assets.
pub struct CacheMaterializer {
    paths: Arc<LauncherPaths>,
    cipher: AssetCipher<'static>,
    locks: DashMap<String, Arc<Mutex<()>>>,
    counters: Counters,
}

impl CacheMaterializer {
    pub fn new(paths: Arc<LauncherPaths>) -> Self {
        Self::with_cipher(paths, AssetCipher::global())
    }

    pub(crate) fn with_cipher(paths: Arc<LauncherPaths>, cipher: AssetCipher<'static>) -> Self {
        Self {
            paths,
            cipher,
            locks: DashMap::new(),
            counters: Counters::default(),
        }
    }

    /// Return a fresh cache entry for `name`, decrypting `encrypted` if needed.
    ///
    /// Failures are logged and reported as `None`.
    pub fn ensure_decrypted(&self, encrypted: &Path, name: &str) -> Option<PathBuf> {
        match self.try_ensure_decrypted(encrypted, name) {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!(
                    source = %encrypted.display(),
                    kind = e.kind().as_str(),
                    "Failed to decrypt asset: {}",
                    e
                );
                None
            }
        }
    }

    pub fn try_ensure_decrypted(&self, encrypted: &Path, name: &str) -> Result<PathBuf, AssetError> {
        validate_name(name)?;

        let cache_dir = self.paths.cache_dir();
        std::fs::create_dir_all(&cache_dir).map_err(|e| AssetError::io(&cache_dir, e))?;
        let cache_path = self.paths.cache_entry(name);

        let lock = self.lock_for(name);
        let _guard = lock.lock();

        if is_fresh(&cache_path, encrypted)? {
            self.counters.hits.fetch_add(1, Ordering::Relaxed);
            metrics::counter!("launcher_assets_cache_hits_total").increment(1);
            tracing::debug!(cache = %cache_path.display(), "Using cached asset");
            return Ok(cache_path);
        }

        self.counters.misses.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("launcher_assets_cache_misses_total").increment(1);

        match self.decrypt_into(encrypted, &cache_dir, &cache_path) {
            Ok(bytes) => {
                tracing::info!(cache = %cache_path.display(), bytes, "Decrypted asset");
                Ok(cache_path)
            }
            Err(e) => {
                self.counters.failures.fetch_add(1, Ordering::Relaxed);
                metrics::counter!("launcher_assets_decrypt_failures_total", "kind" => e.kind().as_str())
                    .increment(1);
                Err(e)
            }
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            cache_hits: self.counters.hits.load(Ordering::Relaxed),
            cache_misses: self.counters.misses.load(Ordering::Relaxed),
            source_reads: self.counters.source_reads.load(Ordering::Relaxed),
            decrypt_failures: self.counters.failures.load(Ordering::Relaxed),
        }
    }

    fn lock_for(&self, name: &str) -> Arc<Mutex<()>> {
        self.locks.entry(name.to_string()).or_default().clone()
    }

    fn decrypt_into(&self, encrypted: &Path, cache_dir: &Path, cache_path: &Path) -> Result<u64, AssetError> {
        let source = File::open(encrypted).map_err(|e| AssetError::io(encrypted, e))?;
        self.counters.source_reads.fetch_add(1, Ordering::Relaxed);

        let mut staging = NamedTempFile::new_in(cache_dir).map_err(|e| AssetError::io(cache_dir, e))?;
        let bytes = self
            .cipher
            .decrypt_stream(source, staging.as_file_mut())
            .map_err(|e| AssetError::from_cipher(encrypted, e))?;

        staging
            .persist(cache_path)
            .map_err(|e| AssetError::io(cache_path, e.error))?;
        Ok(bytes)
    }
}

/// True if `cache` exists and is at least as new as `source`.
fn is_fresh(cache: &Path, source: &Path) -> Result<bool, AssetError> {
    let cache_time = match modified(cache) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(AssetError::io(cache, e)),
    };
    let source_time = modified(source).map_err(|e| AssetError::io(source, e))?;
    Ok(cache_time >= source_time)
}

fn modified(path: &Path) -> std::io::Result<SystemTime> {
    std::fs::metadata(path)?.modified()
}
