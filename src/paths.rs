//! Install and per-user directory discovery, and the on-disk asset layout.
//!
//! ```text
//! <install>/Assets/<name>               plaintext bundle
//! <install>/AssetsEncrypted/<name>.enc  encrypted bundle
//! <install>/AssetsEncrypted/<name>      raw override
//! <install>/crash.log
//! <data>/AssetsEncrypted/<name>[.enc]   per-user bundle / raw override
//! <data>/AssetsCache/<name>             decrypted cache
//! <data>/asset.log
//! ```

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::{AssetConfig, ConfigError};

pub const PLAIN_DIR: &str = "Assets";
pub const ENCRYPTED_DIR: &str = "AssetsEncrypted";
pub const CACHE_DIR: &str = "AssetsCache";
pub const ENCRYPTED_SUFFIX: &str = ".enc";
pub const ASSET_LOG: &str = "asset.log";
pub const CRASH_LOG: &str = "crash.log";

/// Resolved directories for one launcher installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LauncherPaths {
    install_dir: PathBuf,
    probe_dirs: Vec<PathBuf>,
    data_dir: PathBuf,
}

impl LauncherPaths {
    /// Fixed install and data directories. The install directory is the only
    /// probe directory.
    pub fn new(install_dir: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        let install_dir = install_dir.into();
        Self {
            probe_dirs: vec![install_dir.clone()],
            install_dir,
            data_dir: data_dir.into(),
        }
    }

    /// Replace the ordered probe list. Duplicates and empty entries are dropped.
    pub fn with_probe_dirs(mut self, dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        self.probe_dirs = dedup_dirs(dirs);
        self
    }

    /// Discover directories from config and the running process.
    pub fn discover(config: &AssetConfig) -> Result<Self, ConfigError> {
        Self::discover_with(config, |key| std::env::var(key).ok())
    }

    /// Like [`discover`](Self::discover), reading platform variables through
    /// `lookup` instead of the process environment.
    pub fn discover_with<F>(config: &AssetConfig, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf));
        let cwd = std::env::current_dir().ok();

        let install_dir = pick_install_dir(config, exe_dir.clone(), cwd.clone())?;

        let data_dir = match &config.data_dir {
            Some(dir) => dir.clone(),
            None => platform_data_dir(&lookup)
                .ok_or(ConfigError::NoDataDirectory)?
                .join(&config.app_dir_name),
        };

        let candidates = std::iter::once(install_dir.clone())
            .chain(exe_dir)
            .chain(cwd);

        Ok(Self::new(install_dir, data_dir).with_probe_dirs(candidates))
    }

    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    /// Base directories probed for encrypted bundles, in order.
    pub fn probe_dirs(&self) -> &[PathBuf] {
        &self.probe_dirs
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn plain_dir(&self) -> PathBuf {
        self.install_dir.join(PLAIN_DIR)
    }

    pub fn encrypted_dir(&self) -> PathBuf {
        self.install_dir.join(ENCRYPTED_DIR)
    }

    pub fn plain_asset(&self, name: &str) -> PathBuf {
        self.plain_dir().join(name)
    }

    /// `<base>/AssetsEncrypted/<name>.enc`
    pub fn encrypted_bundle_in(base: &Path, name: &str) -> PathBuf {
        base.join(ENCRYPTED_DIR).join(encrypted_file_name(name))
    }

    pub fn encrypted_bundle(&self, name: &str) -> PathBuf {
        Self::encrypted_bundle_in(&self.install_dir, name)
    }

    pub fn raw_override(&self, name: &str) -> PathBuf {
        self.encrypted_dir().join(name)
    }

    pub fn user_encrypted_bundle(&self, name: &str) -> PathBuf {
        Self::encrypted_bundle_in(&self.data_dir, name)
    }

    pub fn user_raw_override(&self, name: &str) -> PathBuf {
        self.data_dir.join(ENCRYPTED_DIR).join(name)
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.data_dir.join(CACHE_DIR)
    }

    pub fn cache_entry(&self, name: &str) -> PathBuf {
        self.cache_dir().join(name)
    }

    pub fn asset_log(&self) -> PathBuf {
        self.data_dir.join(ASSET_LOG)
    }

    pub fn crash_log(&self) -> PathBuf {
        self.install_dir.join(CRASH_LOG)
    }
}

pub fn encrypted_file_name(name: &str) -> String {
    format!("{}{}", name, ENCRYPTED_SUFFIX)
}

/// Order-preserving de-duplication. Windows paths compare case-insensitively.
fn dedup_dirs(dirs: impl IntoIterator<Item = PathBuf>) -> Vec<PathBuf> {
    let mut seen: Vec<String> = Vec::new();
    let mut out = Vec::new();
    for dir in dirs {
        if dir.as_os_str().is_empty() {
            continue;
        }
        let key = dir_key(&dir);
        if !seen.contains(&key) {
            seen.push(key);
            out.push(dir);
        }
    }
    out
}

fn dir_key(dir: &Path) -> String {
    let s = dir.to_string_lossy();
    let s = s.trim_end_matches(['/', '\\']);
    if cfg!(windows) {
        s.to_lowercase()
    } else {
        s.to_string()
    }
}

/// Configured install directory, else the executable's directory, else cwd.
fn pick_install_dir(
    config: &AssetConfig,
    exe_dir: Option<PathBuf>,
    cwd: Option<PathBuf>,
) -> Result<PathBuf, ConfigError> {
    config
        .install_dir
        .clone()
        .or(exe_dir)
        .or(cwd)
        .ok_or(ConfigError::NoInstallDirectory)
}

/// Platform per-user application data root.
#[cfg(target_os = "windows")]
fn platform_data_dir<F: Fn(&str) -> Option<String>>(lookup: &F) -> Option<PathBuf> {
    let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());
    non_empty("LOCALAPPDATA")
        .or_else(|| non_empty("APPDATA"))
        .map(PathBuf::from)
}

/// Platform per-user application data root.
#[cfg(not(target_os = "windows"))]
fn platform_data_dir<F: Fn(&str) -> Option<String>>(lookup: &F) -> Option<PathBuf> {
    let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());
    if let Some(xdg) = non_empty("XDG_DATA_HOME") {
        return Some(PathBuf::from(xdg));
    }
    non_empty("HOME").map(|home| PathBuf::from(home).join(".local").join("share"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_layout() {
        let paths = LauncherPaths::new("/opt/launcher", "/data/Launcher");
        assert_eq!(paths.plain_asset("back.mp4"), PathBuf::from("/opt/launcher/Assets/back.mp4"));
        assert_eq!(
            paths.encrypted_bundle("back.mp4"),
            PathBuf::from("/opt/launcher/AssetsEncrypted/back.mp4.enc")
        );
        assert_eq!(
            paths.raw_override("back.mp4"),
            PathBuf::from("/opt/launcher/AssetsEncrypted/back.mp4")
        );
        assert_eq!(
            paths.user_encrypted_bundle("back.mp4"),
            PathBuf::from("/data/Launcher/AssetsEncrypted/back.mp4.enc")
        );
        assert_eq!(
            paths.user_raw_override("back.mp4"),
            PathBuf::from("/data/Launcher/AssetsEncrypted/back.mp4")
        );
        assert_eq!(paths.cache_entry("back.mp4"), PathBuf::from("/data/Launcher/AssetsCache/back.mp4"));
        assert_eq!(paths.asset_log(), PathBuf::from("/data/Launcher/asset.log"));
        assert_eq!(paths.crash_log(), PathBuf::from("/opt/launcher/crash.log"));
    }

    #[test]
    fn test_probe_dirs_dedup_in_order() {
        let paths = LauncherPaths::new("/a", "/d").with_probe_dirs(vec![
            PathBuf::from("/a"),
            PathBuf::from(""),
            PathBuf::from("/b"),
            PathBuf::from("/a/"),
            PathBuf::from("/c"),
            PathBuf::from("/b"),
        ]);
        assert_eq!(
            paths.probe_dirs(),
            &[PathBuf::from("/a"), PathBuf::from("/b"), PathBuf::from("/c")]
        );
    }

    #[test]
    fn test_discover_honors_overrides() {
        let config = AssetConfig {
            install_dir: Some(PathBuf::from("/opt/launcher")),
            data_dir: Some(PathBuf::from("/tmp/launcher-data")),
            ..Default::default()
        };
        let paths = LauncherPaths::discover(&config).unwrap();
        assert_eq!(paths.install_dir(), Path::new("/opt/launcher"));
        assert_eq!(paths.data_dir(), Path::new("/tmp/launcher-data"));
        assert_eq!(paths.probe_dirs()[0], PathBuf::from("/opt/launcher"));
        assert!(paths.probe_dirs().len() >= 2);
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn installed() -> AssetConfig {
        AssetConfig {
            install_dir: Some(PathBuf::from("/opt/launcher")),
            ..Default::default()
        }
    }

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn test_data_dir_prefers_xdg() {
        let lookup = env(&[("XDG_DATA_HOME", "/xdg"), ("HOME", "/home/u")]);
        let paths = LauncherPaths::discover_with(&installed(), lookup).unwrap();
        assert_eq!(paths.data_dir(), Path::new("/xdg/Launcher"));
    }

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn test_data_dir_falls_back_to_home() {
        let lookup = env(&[("XDG_DATA_HOME", ""), ("HOME", "/home/u")]);
        let config = AssetConfig { app_dir_name: "Granted".to_string(), ..installed() };
        let paths = LauncherPaths::discover_with(&config, lookup).unwrap();
        assert_eq!(paths.data_dir(), Path::new("/home/u/.local/share/Granted"));
        assert_eq!(paths.cache_dir(), PathBuf::from("/home/u/.local/share/Granted/AssetsCache"));
    }

    #[cfg(target_os = "windows")]
    #[test]
    fn test_data_dir_prefers_local_appdata() {
        let lookup = env(&[("LOCALAPPDATA", "C:\\Local"), ("APPDATA", "C:\\Roaming")]);
        let paths = LauncherPaths::discover_with(&installed(), lookup).unwrap();
        assert_eq!(paths.data_dir(), Path::new("C:\\Local\\Launcher"));

        let lookup = env(&[("APPDATA", "C:\\Roaming")]);
        let paths = LauncherPaths::discover_with(&installed(), lookup).unwrap();
        assert_eq!(paths.data_dir(), Path::new("C:\\Roaming\\Launcher"));
    }

    #[test]
    fn test_no_data_dir() {
        let result = LauncherPaths::discover_with(&installed(), env(&[]));
        assert!(matches!(result, Err(ConfigError::NoDataDirectory)));
    }

    #[test]
    fn test_data_dir_override_ignores_platform() {
        let config = AssetConfig { data_dir: Some(PathBuf::from("/data")), ..installed() };
        let paths = LauncherPaths::discover_with(&config, env(&[])).unwrap();
        assert_eq!(paths.data_dir(), Path::new("/data"));
    }

    #[test]
    fn test_install_dir_order() {
        let exe = Some(PathBuf::from("/exe"));
        let cwd = Some(PathBuf::from("/cwd"));
        assert_eq!(
            pick_install_dir(&installed(), exe.clone(), cwd.clone()).unwrap(),
            PathBuf::from("/opt/launcher")
        );
        let config = AssetConfig::default();
        assert_eq!(pick_install_dir(&config, exe, cwd.clone()).unwrap(), PathBuf::from("/exe"));
        assert_eq!(pick_install_dir(&config, None, cwd).unwrap(), PathBuf::from("/cwd"));

        let err = pick_install_dir(&config, None, None).unwrap_err();
        assert!(matches!(err, ConfigError::NoInstallDirectory));
        assert_eq!(err.to_string(), "Could not determine the install directory");
    }
}
