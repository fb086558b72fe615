//! SHA-256 build identifiers.
//!
//! A CLI build is identified by the lowercase hex SHA-256 of its executable,
//! with no prefix. The same digest is what the release host publishes at
//! `/version-cli`, so comparing the running executable against the remote
//! identifier tells whether a newer binary exists.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::fs;
use tracing::debug;

use crate::core::ChiefError;

/// Hex digest of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Hex digest of the file at `path`.
pub async fn file_sha256(path: &Path) -> Result<String> {
    debug!("Computing SHA256 for {}", path.display());
    let contents =
        fs::read(path).await.with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(sha256_hex(&contents))
}

/// Check `bytes` against an expected build identifier.
///
/// Comparison ignores ASCII case and surrounding whitespace in `expected`.
pub fn verify(bytes: &[u8], expected: &str) -> Result<(), ChiefError> {
    let actual = sha256_hex(bytes);
    let expected = expected.trim();
    if actual.eq_ignore_ascii_case(expected) {
        Ok(())
    } else {
        Err(ChiefError::ChecksumMismatch {
            expected: expected.to_string(),
            actual,
        })
    }
}
