//! Asset pipeline errors.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::security::CipherError;

/// Failure kinds for asset resolution and maintenance. None of them is fatal
/// to the launcher; the outermost caller logs and degrades.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Invalid asset name: {0:?}")]
    InvalidName(String),

    #[error("Corrupt encrypted source {path}: {reason}")]
    CorruptSource { path: PathBuf, reason: CipherError },

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Coarse classification, for logs and metrics labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetErrorKind {
    NotFound,
    InvalidName,
    CorruptSource,
    Io,
}

impl AssetErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetErrorKind::NotFound => "not_found",
            AssetErrorKind::InvalidName => "invalid_name",
            AssetErrorKind::CorruptSource => "corrupt_source",
            AssetErrorKind::Io => "io",
        }
    }
}

impl AssetError {
    pub fn kind(&self) -> AssetErrorKind {
        match self {
            AssetError::NotFound(_) => AssetErrorKind::NotFound,
            AssetError::InvalidName(_) => AssetErrorKind::InvalidName,
            AssetError::CorruptSource { .. } => AssetErrorKind::CorruptSource,
            AssetError::Io { .. } => AssetErrorKind::Io,
        }
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        AssetError::Io { path: path.to_path_buf(), source }
    }

    /// Classify a cipher failure on `path`: unreadable vs. malformed.
    pub(crate) fn from_cipher(path: &Path, err: CipherError) -> Self {
        match err {
            CipherError::Io(source) => Self::io(path, source),
            reason => AssetError::CorruptSource { path: path.to_path_buf(), reason },
        }
    }
}

/// Reject names that would escape the asset directories.
pub fn validate_name(name: &str) -> Result<(), AssetError> {
    if crate::config::is_plain_file_name(name) {
        Ok(())
    } else {
        Err(AssetError::InvalidName(name.to_string()))
    }
}
