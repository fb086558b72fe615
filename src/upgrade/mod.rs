//! Self-update of the `chief` executable.
//!
//! A build is identified by the SHA-256 of its executable (see [`checksum`]).
//! The update workflow compares the running build against the identifier the
//! release host publishes and, when they differ, asks a [`BinaryUpdater`] to
//! swap the executable for the published one.
//!
//! ```text
//! 1. Download      fetch chief-linux-amd64 into memory
//! 2. Verify        digest must equal the published build id
//! 3. Backup        copy the executable to <exe>.backup
//! 4. Install       write .<exe>.new with the mode of <exe>, rename over <exe>
//! 5. Post-install  remove the backup, or move it back if step 4 changed <exe>
//! ```
//!
//! Nothing on disk changes before step 3, so a bad download or a checksum
//! mismatch leaves the installed binary exactly as it was.

pub mod checksum;
pub mod self_updater;

use anyhow::Result;
use async_trait::async_trait;

pub use self_updater::SelfUpdater;

/// Inspects and replaces the running CLI.
#[async_trait]
pub trait BinaryUpdater: Send + Sync {
    /// Build identifier of the currently installed executable.
    async fn current_build_id(&self) -> Result<String>;

    /// Replace the executable with the published build whose identifier is
    /// `expected_build_id`.
    async fn replace(&self, expected_build_id: &str) -> Result<()>;
}
