//! SHA-256 file hasher with bounded prefix and streaming support.
//!
//! # Overview
//!
//! This module provides the [`Hasher`] struct used by the two hashing
//! phases of duplicate detection:
//!
//! - [`Hasher::prehash`] digests at most [`PREHASH_SIZE`] bytes from the
//!   start of a file. Shorter files are digested up to EOF.
//! - [`Hasher::full_hash`] digests the whole file, reading
//!   [`FULL_HASH_BLOCK_SIZE`] bytes at a time so memory stays bounded
//!   regardless of file size.
//!
//! Both use SHA-256 so a full-content match can be reported as identical
//! content with a comfortable collision margin.
//!
//! # Example
//!
//! ```no_run
//! use dupsift::scanner::{hash_to_hex, Hasher};
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! let digest = hasher.full_hash(Path::new("some_file.bin")).unwrap();
//! println!("{}", hash_to_hex(&digest));
//! ```

use std::fmt::Write as _;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use super::HashError;

/// Number of leading bytes digested by the prehash phase (256 KiB).
pub const PREHASH_SIZE: usize = 262_144;

/// Read block size for full-content hashing (1 MiB).
pub const FULL_HASH_BLOCK_SIZE: usize = 1_048_576;

/// A 32-byte SHA-256 digest.
pub type Hash = [u8; 32];

/// Stateless SHA-256 file hasher.
///
/// Cheap to share behind an `Arc`; every call opens its own file handle
/// and allocates its own read buffer.
#[derive(Debug, Clone)]
pub struct Hasher {
    prehash_size: usize,
    block_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher using [`PREHASH_SIZE`] and [`FULL_HASH_BLOCK_SIZE`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            prehash_size: PREHASH_SIZE,
            block_size: FULL_HASH_BLOCK_SIZE,
        }
    }

    /// Digest the first [`PREHASH_SIZE`] bytes of a file.
    ///
    /// Files shorter than the limit are digested in full; reaching EOF
    /// early is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or read.
    pub fn prehash(&self, path: &Path) -> Result<Hash, HashError> {
        let file = open(path)?;
        let mut limited = file.take(self.prehash_size as u64);
        let mut buffer = vec![0u8; self.prehash_size.min(self.block_size)];
        digest_reader(path, &mut limited, &mut buffer)
    }

    /// Digest the entire content of a file.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or a read fails
    /// part way through.
    pub fn full_hash(&self, path: &Path) -> Result<Hash, HashError> {
        let mut file = open(path)?;
        let mut buffer = vec![0u8; self.block_size];
        digest_reader(path, &mut file, &mut buffer)
    }
}

fn open(path: &Path) -> Result<File, HashError> {
    File::open(path).map_err(|e| HashError::from_io(path.to_path_buf(), e))
}

/// Feed a reader into SHA-256 until EOF, one buffer at a time.
fn digest_reader<R: Read>(
    path: &Path,
    reader: &mut R,
    buffer: &mut [u8],
) -> Result<Hash, HashError> {
    let mut hasher = Sha256::new();
    loop {
        match reader.read(buffer) {
            Ok(0) => break,
            Ok(n) => hasher.update(&buffer[..n]),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(HashError::from_io(path.to_path_buf(), e)),
        }
    }
    Ok(hasher.finalize().into())
}

/// Render a digest as lowercase hexadecimal (64 characters).
///
/// # Example
///
/// ```
/// use dupsift::scanner::hash_to_hex;
///
/// let hex = hash_to_hex(&[0xab; 32]);
/// assert_eq!(hex.len(), 64);
/// assert!(hex.starts_with("abab"));
/// ```
#[must_use]
pub fn hash_to_hex(hash: &Hash) -> String {
    let mut out = String::with_capacity(hash.len() * 2);
    for byte in hash {
        let _ = write!(out, "{byte:02x}");
    }
    out
}
