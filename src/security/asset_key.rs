//! Process-wide asset key.
//!
//! The key is SHA-256 of a constant application string, derived once on first
//! use and held for the life of the process. It keeps bundled media opaque at
//! rest; anyone with the binary can derive it, so it is obfuscation and not a
//! secret boundary.

use sha2::{Digest, Sha256};
use std::sync::OnceLock;
use zeroize::Zeroizing;

/// Key size (256 bits)
pub const KEY_SIZE: usize = 32;
/// Seed hashed into the process key.
pub const KEY_SEED: &str = "LauncherAssetsKey_v1";

static ASSET_KEY: OnceLock<AssetKey> = OnceLock::new();

/// Symmetric key for bundled asset encryption.
pub struct AssetKey {
    bytes: Zeroizing<[u8; KEY_SIZE]>,
}

impl AssetKey {
    /// Derive a key by hashing `seed` with SHA-256.
    pub(crate) fn derive(seed: &str) -> Self {
        let digest = Sha256::digest(seed.as_bytes());
        let mut bytes = Zeroizing::new([0u8; KEY_SIZE]);
        bytes.copy_from_slice(&digest);
        Self { bytes }
    }

    /// The process key, derived from [`KEY_SEED`] on first call.
    pub fn global() -> &'static AssetKey {
        ASSET_KEY.get_or_init(|| Self::derive(KEY_SEED))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }

    /// Short hex fingerprint for diagnostics. Never print the key itself.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.bytes.as_slice());
        hex::encode(&digest[..8])
    }
}

impl std::fmt::Debug for AssetKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetKey")
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}
