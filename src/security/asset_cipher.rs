//! Asset Cipher Core
//!
//! AES-256-CBC with PKCS#7 padding over streams. The on-disk format is the
//! 16-byte IV followed by the ciphertext, nothing else: no magic, no length,
//! no tag. A tampered file is detected only when the padding fails to check.

use aes::Aes256;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::generic_array::GenericArray;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use super::asset_cipher_io::read_full;
use super::asset_key::AssetKey;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// IV size (128 bits, one AES block)
pub const IV_SIZE: usize = 16;
/// Block size
pub const BLOCK_SIZE: usize = 16;
/// Streaming chunk size; must stay a multiple of `BLOCK_SIZE`.
const CHUNK_SIZE: usize = 64 * 1024;

/// Cipher error types
#[derive(Debug, thiserror::Error)]
pub enum CipherError {
    #[error("Encrypted source is {0} bytes, shorter than the 16-byte IV")]
    TruncatedHeader(usize),

    #[error("Ciphertext of {0} bytes is not a whole number of blocks")]
    InvalidLength(u64),

    #[error("Invalid padding")]
    BadPadding,

    #[error("Invalid key or IV length")]
    InvalidKeyLength,

    #[error("Input and output are the same file: {0}")]
    SameFile(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CipherError {
    /// True when the input itself is malformed rather than unreadable.
    pub fn is_corrupt_source(&self) -> bool {
        matches!(
            self,
            CipherError::TruncatedHeader(_) | CipherError::InvalidLength(_) | CipherError::BadPadding
        )
    }
}

/// Stream cipher for bundled assets.
#[derive(Debug, Clone, Copy)]
pub struct AssetCipher<'k> {
    key: &'k AssetKey,
}

impl AssetCipher<'static> {
    /// Cipher bound to the process key.
    pub fn global() -> Self {
        Self::new(AssetKey::global())
    }
}

impl<'k> AssetCipher<'k> {
    pub fn new(key: &'k AssetKey) -> Self {
        Self { key }
    }

    /// Encrypt `input` into `output` under a fresh random IV.
    ///
    /// Returns the number of bytes written, IV included.
    pub fn encrypt_stream<R: Read, W: Write>(&self, input: R, output: W) -> Result<u64, CipherError> {
        self.encrypt_stream_with_iv(input, output, generate_iv())
    }

    /// Encrypt under a caller-chosen IV. Reusing an IV across files leaks
    /// equal prefixes; only tests should pass a fixed one.
    pub fn encrypt_stream_with_iv<R: Read, W: Write>(
        &self,
        mut input: R,
        mut output: W,
        iv: [u8; IV_SIZE],
    ) -> Result<u64, CipherError> {
        let mut enc = Aes256CbcEnc::new_from_slices(self.key.as_bytes(), &iv)
            .map_err(|_| CipherError::InvalidKeyLength)?;
        output.write_all(&iv)?;
        let mut written = IV_SIZE as u64;

        let mut buf = vec![0u8; CHUNK_SIZE];
        loop {
            let n = read_full(&mut input, &mut buf)?;
            if n == CHUNK_SIZE {
                encrypt_blocks(&mut enc, &mut buf);
                output.write_all(&buf)?;
                written += n as u64;
                continue;
            }

            // Last chunk: whole blocks as-is, the remainder (possibly empty) padded.
            let whole = n - n % BLOCK_SIZE;
            encrypt_blocks(&mut enc, &mut buf[..whole]);
            output.write_all(&buf[..whole])?;

            let rem = n - whole;
            let mut tail = [0u8; BLOCK_SIZE];
            tail[..rem].copy_from_slice(&buf[whole..n]);
            let padded = enc
                .encrypt_padded_mut::<Pkcs7>(&mut tail, rem)
                .map_err(|_| CipherError::BadPadding)?;
            output.write_all(padded)?;
            written += (whole + padded.len()) as u64;
            break;
        }

        output.flush()?;
        Ok(written)
    }

    /// Decrypt `input` (IV prefix + ciphertext) into `output`.
    ///
    /// Fails with `TruncatedHeader` before writing anything when the IV is
    /// incomplete. Plaintext is streamed, so on a later failure `output` may
    /// hold a prefix; callers that need all-or-nothing write to a temp file.
    pub fn decrypt_stream<R: Read, W: Write>(&self, mut input: R, mut output: W) -> Result<u64, CipherError> {
        let mut iv = [0u8; IV_SIZE];
        let got = read_full(&mut input, &mut iv)?;
        if got < IV_SIZE {
            return Err(CipherError::TruncatedHeader(got));
        }

        let mut dec = Aes256CbcDec::new_from_slices(self.key.as_bytes(), &iv)
            .map_err(|_| CipherError::InvalidKeyLength)?;

        // The final block carries the padding, so one block is always held back
        // until EOF is seen.
        let mut buf = vec![0u8; CHUNK_SIZE + BLOCK_SIZE];
        let mut held = 0usize;
        let mut consumed = 0u64;
        let mut written = 0u64;
        loop {
            let n = read_full(&mut input, &mut buf[held..held + CHUNK_SIZE])?;
            consumed += n as u64;
            let avail = held + n;

            if n < CHUNK_SIZE {
                if avail == 0 || avail % BLOCK_SIZE != 0 {
                    return Err(CipherError::InvalidLength(consumed));
                }
                let plain = dec
                    .decrypt_padded_mut::<Pkcs7>(&mut buf[..avail])
                    .map_err(|_| CipherError::BadPadding)?;
                output.write_all(plain)?;
                written += plain.len() as u64;
                break;
            }

            let ready = avail - BLOCK_SIZE;
            decrypt_blocks(&mut dec, &mut buf[..ready]);
            output.write_all(&buf[..ready])?;
            written += ready as u64;
            buf.copy_within(ready..avail, 0);
            held = BLOCK_SIZE;
        }

        output.flush()?;
        Ok(written)
    }

    /// Encrypt an in-memory buffer. Returns IV + ciphertext.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
        let mut out = Vec::with_capacity(IV_SIZE + padded_len(plaintext.len()));
        self.encrypt_stream(plaintext, &mut out)?;
        Ok(out)
    }

    /// Decrypt an in-memory buffer of IV + ciphertext.
    pub fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>, CipherError> {
        let mut out = Vec::with_capacity(data.len());
        self.decrypt_stream(data, &mut out)?;
        Ok(out)
    }

    /// Encrypt a file. An existing `output_path` is never replaced: the call
    /// fails with an `AlreadyExists` I/O error and leaves it untouched.
    pub fn encrypt_file(&self, input_path: &Path, output_path: &Path) -> Result<u64, CipherError> {
        reject_same_file(input_path, output_path)?;
        let input = File::open(input_path)?;
        let mut staging = stage_beside(output_path)?;
        let written = self.encrypt_stream(input, staging.as_file_mut())?;
        staging.persist_noclobber(output_path).map_err(|e| e.error)?;
        Ok(written)
    }

    /// Decrypt a file, replacing `output_path` only once the whole input has
    /// decrypted and the padding checked out.
    pub fn decrypt_file(&self, input_path: &Path, output_path: &Path) -> Result<u64, CipherError> {
        reject_same_file(input_path, output_path)?;
        let input = File::open(input_path)?;
        let mut staging = stage_beside(output_path)?;
        let written = self.decrypt_stream(input, staging.as_file_mut())?;
        staging.persist(output_path).map_err(|e| e.error)?;
        Ok(written)
    }
}

/// Temp file in the directory that will hold `output`, so the final rename
/// stays on one filesystem.
fn stage_beside(output: &Path) -> std::io::Result<NamedTempFile> {
    match output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => NamedTempFile::new_in(dir),
        _ => NamedTempFile::new_in("."),
    }
}

fn reject_same_file(input: &Path, output: &Path) -> Result<(), CipherError> {
    if let (Ok(a), Ok(b)) = (input.canonicalize(), output.canonicalize()) {
        if a == b {
            return Err(CipherError::SameFile(a));
        }
    }
    Ok(())
}

/// Ciphertext length for `len` plaintext bytes, excluding the IV.
pub fn padded_len(len: usize) -> usize {
    (len / BLOCK_SIZE + 1) * BLOCK_SIZE
}

/// Generate a random IV using the OS CSPRNG.
fn generate_iv() -> [u8; IV_SIZE] {
    use rand::RngCore;
    let mut iv = [0u8; IV_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut iv);
    iv
}

fn encrypt_blocks(enc: &mut Aes256CbcEnc, data: &mut [u8]) {
    for block in data.chunks_exact_mut(BLOCK_SIZE) {
        enc.encrypt_block_mut(GenericArray::from_mut_slice(block));
    }
}

fn decrypt_blocks(dec: &mut Aes256CbcDec, data: &mut [u8]) {
    for block in data.chunks_exact_mut(BLOCK_SIZE) {
        dec.decrypt_block_mut(GenericArray::from_mut_slice(block));
    }
}
