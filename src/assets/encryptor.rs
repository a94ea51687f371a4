//! Startup maintenance: encrypt bundled assets that have no `.enc` yet.
//!
//! One-shot per output: an existing `<name>.enc` is never rewritten, even if
//! its plaintext source has changed since.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;

use super::error::{validate_name, AssetError};
use crate::paths::LauncherPaths;
use crate::security::AssetCipher;

/// Result of a single `encrypt_if_needed` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncryptOutcome {
    Encrypted { bytes: u64 },
    SkippedMissingInput,
    SkippedOutputExists,
}

/// Encrypt `input` to `output` unless the input is missing or the output
/// already exists.
///
/// The ciphertext is staged next to `output` and linked into place without
/// clobbering, so a concurrent or earlier writer always wins and a failed run
/// leaves no partial `.enc` behind.
pub fn encrypt_if_needed(cipher: &AssetCipher<'_>, input: &Path, output: &Path) -> Result<EncryptOutcome, AssetError> {
    if !input.is_file() {
        return Ok(EncryptOutcome::SkippedMissingInput);
    }
    if output.exists() {
        return Ok(EncryptOutcome::SkippedOutputExists);
    }

    let out_dir = output.parent().unwrap_or_else(|| Path::new("."));
    let source = std::fs::File::open(input).map_err(|e| AssetError::io(input, e))?;
    let mut staging = NamedTempFile::new_in(out_dir).map_err(|e| AssetError::io(out_dir, e))?;

    let bytes = cipher
        .encrypt_stream(source, staging.as_file_mut())
        .map_err(|e| AssetError::from_cipher(input, e))?;

    match staging.persist_noclobber(output) {
        Ok(_) => Ok(EncryptOutcome::Encrypted { bytes }),
        Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => Ok(EncryptOutcome::SkippedOutputExists),
        Err(e) => Err(AssetError::io(output, e.error)),
    }
}

/// One failed item from a maintenance run.
#[derive(Debug)]
pub struct MaintenanceFailure {
    pub asset: String,
    pub input: PathBuf,
    pub error: AssetError,
}

/// Summary of a maintenance run.
#[derive(Debug, Default)]
pub struct MaintenanceReport {
    pub encrypted: Vec<PathBuf>,
    pub skipped: usize,
    pub failures: Vec<MaintenanceFailure>,
}

impl MaintenanceReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Encrypts the known bundled assets at startup.
pub struct AssetEncryptor {
    paths: Arc<LauncherPaths>,
    cipher: AssetCipher<'static>,
    known_assets: Vec<String>,
}

impl AssetEncryptor {
    pub fn new(paths: Arc<LauncherPaths>, known_assets: Vec<String>) -> Self {
        Self::with_cipher(paths, known_assets, AssetCipher::global())
    }

    pub(crate) fn with_cipher(paths: Arc<LauncherPaths>, known_assets: Vec<String>, cipher: AssetCipher<'static>) -> Self {
        Self { paths, cipher, known_assets }
    }

    pub fn known_assets(&self) -> &[String] {
        &self.known_assets
    }

    /// Encrypt every known asset from `Assets/` or, failing that, from a raw
    /// copy sitting in `AssetsEncrypted/`. Each item is attempted
    /// independently; failures are collected, never propagated.
    pub fn run_startup_maintenance(&self) -> MaintenanceReport {
        let mut report = MaintenanceReport::default();

        let encrypted_dir = self.paths.encrypted_dir();
        if let Err(e) = std::fs::create_dir_all(&encrypted_dir) {
            tracing::warn!(dir = %encrypted_dir.display(), "Cannot create encrypted asset directory: {}", e);
            report.failures.push(MaintenanceFailure {
                asset: String::new(),
                input: encrypted_dir.clone(),
                error: AssetError::io(&encrypted_dir, e),
            });
            return report;
        }

        for name in &self.known_assets {
            if let Err(error) = validate_name(name) {
                report.failures.push(MaintenanceFailure {
                    asset: name.clone(),
                    input: PathBuf::new(),
                    error,
                });
                continue;
            }

            let output = self.paths.encrypted_bundle(name);
            for input in [self.paths.plain_asset(name), self.paths.raw_override(name)] {
                self.run_one(name, &input, &output, &mut report);
            }
        }

        tracing::info!(
            encrypted = report.encrypted.len(),
            skipped = report.skipped,
            failed = report.failures.len(),
            "Asset maintenance finished"
        );
        report
    }

    fn run_one(&self, name: &str, input: &Path, output: &Path, report: &mut MaintenanceReport) {
        match encrypt_if_needed(&self.cipher, input, output) {
            Ok(EncryptOutcome::Encrypted { bytes }) => {
                metrics::counter!("launcher_assets_encrypted_total").increment(1);
                tracing::info!(output = %output.display(), bytes, "Encrypted asset");
                report.encrypted.push(output.to_path_buf());
            }
            Ok(_) => report.skipped += 1,
            Err(error) => {
                tracing::warn!(
                    asset = name,
                    input = %input.display(),
                    kind = error.kind().as_str(),
                    "Asset encryption failed: {}",
                    error
                );
                report.failures.push(MaintenanceFailure {
                    asset: name.to_string(),
                    input: input.to_path_buf(),
                    error,
                });
            }
        }
    }
}

#[cfg(test)]
#[path = "encryptor_tests.rs"]
mod tests;
