//! Asset encryption.
//!
//! - `asset_key`: process-wide key derivation
//! - `asset_cipher`: AES-256-CBC stream encryption/decryption
//! - `asset_cipher_io`: stream helpers

pub mod asset_cipher;
pub mod asset_cipher_io;
pub mod asset_key;

pub use asset_cipher::{padded_len, AssetCipher, CipherError, BLOCK_SIZE, IV_SIZE};
pub use asset_key::{AssetKey, KEY_SEED, KEY_SIZE};

#[cfg(test)]
#[path = "asset_cipher_tests.rs"]
mod tests;
