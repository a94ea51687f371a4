//! Logging setup.
//!
//! Diagnostics go to stderr and, when it can be opened, to `asset.log` in the
//! per-user data directory as JSON lines. Panics are appended to `crash.log`
//! next to the install. Both sinks are best-effort: a sink that cannot be opened or
//! written is skipped without failing the caller.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::paths::LauncherPaths;

/// Open `path` for appending, creating parent directories.
fn open_append(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber. Returns false if `asset.log` could not be
/// opened or a subscriber was already set; logging still works in part or
/// whole in both cases.
pub fn init(paths: &LauncherPaths, filter: &str) -> bool {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = match open_append(&paths.asset_log()) {
        Ok(file) => Some(fmt::layer().json().with_ansi(false).with_writer(Mutex::new(file))),
        Err(e) => {
            eprintln!("asset log unavailable at {}: {}", paths.asset_log().display(), e);
            None
        }
    };
    let file_ok = file_layer.is_some();

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .is_ok();

    file_ok && installed
}

/// Append one crash record to `path`.
pub fn append_crash_record(path: &Path, what: &str) -> std::io::Result<()> {
    let mut file = open_append(path)?;
    writeln!(file, "[{}] {}\n", chrono::Local::now().to_rfc3339(), what)
}

/// Record panics in `crash.log`, then run the previous hook.
pub fn install_crash_hook(paths: &LauncherPaths) {
    let crash_log = paths.crash_log();
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = append_crash_record(&crash_log, &info.to_string());
        previous(info);
    }));
}
