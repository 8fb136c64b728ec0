//! CRC-32 content fingerprints and the exact byte comparison.
//!
//! The checksum is the standard IEEE CRC-32, used only as a fast
//! inequality test: equal checksums never imply equal content without
//! the follow-up byte comparison in [`byte_match`]. All file bodies are
//! streamed in blocks of at most [`PARTIAL_SIZE`] bytes; nothing is
//! buffered whole.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crc32fast::Hasher;

/// Number of bytes covered by a partial fingerprint, and the block size
/// for all streamed reads.
pub const PARTIAL_SIZE: u64 = 1024;

const BLOCK: usize = PARTIAL_SIZE as usize;

/// Extend `seed` with the checksum of `buf`.
///
/// Chaining is associative under concatenation:
/// `crc_update(crc_update(0, a), b) == crc_update(0, ab)`. The zero
/// seed starts a fresh computation.
#[must_use]
pub fn crc_update(seed: u32, buf: &[u8]) -> u32 {
    let mut hasher = Hasher::new_with_initial(seed);
    hasher.update(buf);
    hasher.finalize()
}

/// Checksum of the first `min(size, PARTIAL_SIZE)` bytes of `path`.
pub fn partial_checksum(path: &Path, size: u64) -> io::Result<u32> {
    checksum_prefix(path, size.min(PARTIAL_SIZE))
}

/// Checksum of the entire content of `path`, which is `size` bytes long.
pub fn full_checksum(path: &Path, size: u64) -> io::Result<u32> {
    checksum_prefix(path, size)
}

fn checksum_prefix(path: &Path, length: u64) -> io::Result<u32> {
    let mut file = File::open(path)?;
    let mut buf = [0u8; BLOCK];
    let mut crc = 0u32;
    let mut remaining = length;
    while remaining > 0 {
        let want = remaining.min(PARTIAL_SIZE) as usize;
        let read = file.read(&mut buf[..want])?;
        if read == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("{} ended before {} bytes were read", path.display(), length),
            ));
        }
        crc = crc_update(crc, &buf[..read]);
        remaining -= read as u64;
    }
    Ok(crc)
}

/// Compare two files of equal `size` byte by byte.
///
/// Returns `true` only when exactly `size` bytes were read from both
/// sides and every block matched. Open or read failures, short-read
/// mismatches between the streams, a byte difference, or an end of
/// stream before `size` bytes all yield `false`; I/O failures are
/// additionally reported on the error channel.
#[must_use]
pub fn byte_match(a: &Path, b: &Path, size: u64) -> bool {
    match compare_streams(a, b, size) {
        Ok(equal) => equal,
        Err(err) => {
            log::warn!(
                "failed to compare {} and {}: {}",
                a.display(),
                b.display(),
                err
            );
            false
        }
    }
}

fn compare_streams(a: &Path, b: &Path, size: u64) -> io::Result<bool> {
    let mut file_a = File::open(a)?;
    let mut file_b = File::open(b)?;

    let mut buf_a = [0u8; BLOCK];
    let mut buf_b = [0u8; BLOCK];
    let mut remaining = size;
    while remaining > 0 {
        let want = remaining.min(PARTIAL_SIZE) as usize;
        let read_a = file_a.read(&mut buf_a[..want])?;
        let read_b = file_b.read(&mut buf_b[..want])?;
        if read_a != read_b {
            return Ok(false);
        }
        if read_a == 0 {
            // Both ended before `size` bytes
            return Ok(false);
        }
        if buf_a[..read_a] != buf_b[..read_b] {
            return Ok(false);
        }
        remaining -= read_a as u64;
    }
    Ok(true)
}
