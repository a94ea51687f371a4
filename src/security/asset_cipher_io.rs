//! Stream helpers for the asset cipher.

use std::io::{ErrorKind, Read};

/// Read until `buf` is full or the reader hits EOF. Returns bytes read.
///
/// A short count means EOF; `Interrupted` is retried.
pub fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
