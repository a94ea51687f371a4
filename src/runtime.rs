//! Wiring for one launcher process.

use std::sync::Arc;

use crate::assets::{AssetEncryptor, AssetResolver, MaintenanceReport};
use crate::config::{AssetConfig, ConfigError};
use crate::media::UiSettings;
use crate::paths::LauncherPaths;

/// Everything the launcher UI needs from the asset pipeline.
pub struct AssetRuntime {
    pub config: AssetConfig,
    pub paths: Arc<LauncherPaths>,
    pub resolver: Arc<AssetResolver>,
    pub encryptor: Arc<AssetEncryptor>,
    pub settings: UiSettings,
}

impl AssetRuntime {
    /// Build from config, discovering directories from the running process.
    pub fn new(config: AssetConfig) -> Result<Self, ConfigError> {
        let paths = LauncherPaths::discover(&config)?;
        Ok(Self::with_paths(config, paths))
    }

    pub fn with_paths(config: AssetConfig, paths: LauncherPaths) -> Self {
        let paths = Arc::new(paths);
        let resolver = Arc::new(AssetResolver::new(paths.clone()));
        let encryptor = Arc::new(AssetEncryptor::new(paths.clone(), config.known_assets.clone()));
        let settings = UiSettings::new(config.ui_sfx_volume);
        Self { config, paths, resolver, encryptor, settings }
    }

    /// Run startup maintenance on the blocking pool. Never fails: a panicked
    /// task is logged and reported as an empty run.
    pub async fn run_startup_maintenance(&self) -> MaintenanceReport {
        let encryptor = self.encryptor.clone();
        match tokio::task::spawn_blocking(move || encryptor.run_startup_maintenance()).await {
            Ok(report) => report,
            Err(e) => {
                tracing::error!("Asset maintenance task failed: {}", e);
                MaintenanceReport::default()
            }
        }
    }

    /// Spawn startup maintenance without waiting for it.
    pub fn spawn_startup_maintenance(&self) -> tokio::task::JoinHandle<MaintenanceReport> {
        let encryptor = self.encryptor.clone();
        tokio::task::spawn_blocking(move || encryptor.run_startup_maintenance())
    }
}
