//! SHA-256 content fingerprints
//!
//! Fingerprints render in the workspace's canonical checksum format
//! (`sha256:<hex>`). File fingerprints are always computed by streaming the
//! whole file through the hasher; nothing is cached between calls.

use std::fmt;
use std::fs::File;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::{Error, Result};

/// Prefix for all fingerprints rendered by this module
pub const PREFIX: &str = "sha256:";

/// A 32-byte SHA-256 digest of some content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    fn from_hasher(hasher: Sha256) -> Self {
        let digest = hasher.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(PREFIX)?;
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// Compute the fingerprint of in-memory content.
pub fn compute_content_fingerprint(content: &[u8]) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(content);
    Fingerprint::from_hasher(hasher)
}

/// Compute the fingerprint of a file by streaming its full contents.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn compute_file_fingerprint(path: &Path) -> Result<Fingerprint> {
    let mut file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher).map_err(|e| Error::io(path, e))?;
    Ok(Fingerprint::from_hasher(hasher))
}

/// Whether two files hold identical content.
///
/// Both files are read in full on every call. There is deliberately no
/// size or mtime short-circuit.
pub fn files_identical(a: &Path, b: &Path) -> Result<bool> {
    let left = compute_file_fingerprint(a)?;
    let right = compute_file_fingerprint(b)?;
    Ok(left == right)
}
