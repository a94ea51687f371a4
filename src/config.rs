//! Asset pipeline configuration.
//!
//! Loaded from the environment, optionally layered over a TOML file named by
//! `LAUNCHER_CONFIG`. Environment values win over the file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Path to an optional TOML config file.
pub const ENV_CONFIG_FILE: &str = "LAUNCHER_CONFIG";
/// Override for the install directory.
pub const ENV_INSTALL_DIR: &str = "LAUNCHER_INSTALL_DIR";
/// Override for the per-user data directory.
pub const ENV_DATA_DIR: &str = "LAUNCHER_DATA_DIR";
/// Log filter directive (tracing `EnvFilter` syntax).
pub const ENV_LOG: &str = "LAUNCHER_LOG";

/// Assets the startup maintenance pass knows about.
pub const DEFAULT_KNOWN_ASSETS: [&str; 3] = ["back.mp4", "backg.mp4", "buttons.mp3"];
/// Default interface sound volume.
pub const DEFAULT_SFX_VOLUME: f64 = 0.6;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("Could not determine a per-user data directory")]
    NoDataDirectory,

    #[error("Could not determine the install directory")]
    NoInstallDirectory,
}

/// Configuration for the asset pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetConfig {
    /// Install directory override. Defaults to the executable's directory.
    pub install_dir: Option<PathBuf>,
    /// Per-user data directory override (cache, asset log).
    pub data_dir: Option<PathBuf>,
    /// Folder name under the platform data directory.
    pub app_dir_name: String,
    /// Asset names processed by startup maintenance.
    pub known_assets: Vec<String>,
    /// Initial interface sound volume, 0.0..=1.0.
    pub ui_sfx_volume: f64,
    /// Log filter directive.
    pub log_filter: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            install_dir: None,
            data_dir: None,
            app_dir_name: "Launcher".to_string(),
            known_assets: DEFAULT_KNOWN_ASSETS.iter().map(|s| s.to_string()).collect(),
            ui_sfx_volume: DEFAULT_SFX_VOLUME,
            log_filter: "info".to_string(),
        }
    }
}

impl AssetConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.known_assets.is_empty() {
            return Err(ConfigError::Invalid {
                field: "known_assets",
                reason: "must name at least one asset".to_string(),
            });
        }
        for name in &self.known_assets {
            if !is_plain_file_name(name) {
                return Err(ConfigError::Invalid {
                    field: "known_assets",
                    reason: format!("'{}' is not a plain file name", name),
                });
            }
        }
        if !(0.0..=1.0).contains(&self.ui_sfx_volume) {
            return Err(ConfigError::Invalid {
                field: "ui_sfx_volume",
                reason: format!("{} is outside 0.0..=1.0", self.ui_sfx_volume),
            });
        }
        if !is_plain_file_name(&self.app_dir_name) {
            return Err(ConfigError::Invalid {
                field: "app_dir_name",
                reason: format!("'{}' is not a plain directory name", self.app_dir_name),
            });
        }
        Ok(())
    }
}

/// True if `name` is a single path component: no separators, no `.`/`..`.
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.contains('\0')
}

/// Load configuration from the process environment.
pub fn load() -> Result<AssetConfig, ConfigError> {
    load_with(|key| std::env::var(key).ok())
}

/// Load configuration using `lookup` for environment values.
pub fn load_with<F>(lookup: F) -> Result<AssetConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let mut config = match non_empty(ENV_CONFIG_FILE) {
        Some(path) => AssetConfig::from_file(Path::new(&path))?,
        None => AssetConfig::default(),
    };

    if let Some(dir) = non_empty(ENV_INSTALL_DIR) {
        config.install_dir = Some(PathBuf::from(dir));
    }
    if let Some(dir) = non_empty(ENV_DATA_DIR) {
        config.data_dir = Some(PathBuf::from(dir));
    }
    if let Some(filter) = non_empty(ENV_LOG) {
        config.log_filter = filter;
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = load_with(env(&[])).unwrap();
        assert_eq!(config, AssetConfig::default());
        assert_eq!(config.known_assets, vec!["back.mp4", "backg.mp4", "buttons.mp3"]);
        assert_eq!(config.ui_sfx_volume, 0.6);
    }

    #[test]
    fn test_env_overrides() {
        let config = load_with(env(&[
            (ENV_INSTALL_DIR, "/opt/launcher"),
            (ENV_DATA_DIR, "/home/u/.local/share/Launcher"),
            (ENV_LOG, "debug"),
        ]))
        .unwrap();
        assert_eq!(config.install_dir, Some(PathBuf::from("/opt/launcher")));
        assert_eq!(config.data_dir, Some(PathBuf::from("/home/u/.local/share/Launcher")));
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn test_blank_env_ignored() {
        let config = load_with(env(&[(ENV_INSTALL_DIR, "  ")])).unwrap();
        assert!(config.install_dir.is_none());
    }

    #[test]
    fn test_file_then_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("launcher.toml");
        std::fs::write(
            &path,
            "known_assets = [\"intro.mp4\"]\nui_sfx_volume = 0.25\ndata_dir = \"/from/file\"\n",
        )
        .unwrap();

        let path_str = path.to_string_lossy().to_string();
        let config = load_with(env(&[
            (ENV_CONFIG_FILE, path_str.as_str()),
            (ENV_DATA_DIR, "/from/env"),
        ]))
        .unwrap();
        assert_eq!(config.known_assets, vec!["intro.mp4"]);
        assert_eq!(config.ui_sfx_volume, 0.25);
        assert_eq!(config.data_dir, Some(PathBuf::from("/from/env")));
        assert_eq!(config.app_dir_name, "Launcher");
    }

    #[test]
    fn test_missing_file() {
        let result = load_with(env(&[(ENV_CONFIG_FILE, "/definitely/not/here.toml")]));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = AssetConfig::from_toml_str("asset_key = \"hunter2\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_validate_rejects_traversal() {
        let config = AssetConfig {
            known_assets: vec!["../../etc/passwd".to_string()],
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "known_assets", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_volume() {
        let config = AssetConfig { ui_sfx_volume: 1.5, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_list() {
        let config = AssetConfig { known_assets: Vec::new(), ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_plain_file_name() {
        assert!(is_plain_file_name("back.mp4"));
        assert!(is_plain_file_name("..hidden"));
        assert!(!is_plain_file_name(""));
        assert!(!is_plain_file_name(".."));
        assert!(!is_plain_file_name("a/b.mp4"));
        assert!(!is_plain_file_name("a\\b.mp4"));
    }

    #[test]
    fn test_toml_round_trip_keeps_defaults() {
        let text = AssetConfig::default().to_toml_string();
        assert_eq!(AssetConfig::from_toml_str(&text).unwrap(), AssetConfig::default());
    }
}
