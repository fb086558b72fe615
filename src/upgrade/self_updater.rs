use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use super::checksum;
use super::BinaryUpdater;
use crate::core::ChiefError;
use crate::remote::Endpoints;

/// Replaces the installed `chief` executable with the published build.
///
/// The download is held in memory and checked against the expected build
/// identifier before anything on disk is touched. The new binary is written
/// beside the target and renamed over it, with a `.backup` copy kept until
/// the rename has succeeded.
#[derive(Debug, Clone)]
pub struct SelfUpdater {
    executable: PathBuf,
    binary_url: String,
    client: reqwest::Client,
}

impl SelfUpdater {
    pub fn new(executable: impl Into<PathBuf>, binary_url: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            binary_url: binary_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Updater for the executable of the running process.
    pub fn for_current_exe(endpoints: &Endpoints) -> Result<Self> {
        let executable =
            std::env::current_exe().context("Failed to locate the running executable")?;
        Ok(Self::new(executable, endpoints.cli_binary_url()))
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    async fn download(&self) -> Result<Vec<u8>> {
        let network_error = |reason: String| ChiefError::NetworkError {
            operation: format!("Error downloading {}", crate::constants::CLI_BINARY_NAME),
            reason,
        };

        debug!("GET {}", self.binary_url);
        let response = self
            .client
            .get(&self.binary_url)
            .send()
            .await
            .map_err(|e| network_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(network_error(format!("HTTP {status} from {}", self.binary_url)).into());
        }

        let bytes = response.bytes().await.map_err(|e| network_error(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    async fn install(&self, bytes: &[u8]) -> Result<()> {
        let file_name = self.executable.file_name().unwrap_or_default().to_string_lossy();
        let staged = self.executable.with_file_name(format!(".{file_name}.new"));

        fs::write(&staged, bytes)
            .await
            .with_context(|| format!("Failed to write {}", staged.display()))?;
        copy_permissions(&self.executable, &staged).await?;

        if let Err(e) = fs::rename(&staged, &self.executable).await {
            let _ = fs::remove_file(&staged).await;
            return Err(e)
                .with_context(|| format!("Failed to replace {}", self.executable.display()));
        }
        Ok(())
    }

    /// `<exe>.backup`, beside the executable.
    fn backup_path(&self) -> PathBuf {
        let file_name = self.executable.file_name().unwrap_or_default().to_string_lossy();
        self.executable.with_file_name(format!("{file_name}.backup"))
    }

    /// Undo a failed install: move the backup back if the executable no
    /// longer matches it, otherwise just drop the backup.
    async fn roll_back(&self, backup: &Path) -> Result<()> {
        let untouched = match (fs::read(&self.executable).await, fs::read(backup).await) {
            (Ok(current), Ok(saved)) => current == saved,
            _ => false,
        };

        if untouched {
            debug!("{} was not modified, dropping backup", self.executable.display());
            return fs::remove_file(backup)
                .await
                .with_context(|| format!("Failed to remove {}", backup.display()));
        }

        warn!("Restoring {} from {}", self.executable.display(), backup.display());
        fs::rename(backup, &self.executable)
            .await
            .with_context(|| format!("Failed to restore {}", self.executable.display()))
    }
}

#[async_trait]
impl BinaryUpdater for SelfUpdater {
    async fn current_build_id(&self) -> Result<String> {
        checksum::file_sha256(&self.executable).await
    }

    async fn replace(&self, expected_build_id: &str) -> Result<()> {
        info!("Downloading new CLI from {}", self.binary_url);
        let bytes = self.download().await?;
        checksum::verify(&bytes, expected_build_id)?;

        let backup = self.backup_path();
        fs::copy(&self.executable, &backup).await.with_context(|| {
            format!("Failed to back up {} to {}", self.executable.display(), backup.display())
        })?;
        debug!("Backed up {} to {}", self.executable.display(), backup.display());

        if let Err(e) = self.install(&bytes).await {
            warn!("Replacing the CLI failed: {e:#}");
            self.roll_back(&backup).await.context("Failed to roll back CLI replacement")?;
            return Err(e);
        }

        if let Err(e) = fs::remove_file(&backup).await {
            warn!("Could not remove {}: {e}", backup.display());
        }
        info!("Replaced {}", self.executable.display());
        Ok(())
    }
}

/// Give `target` the permissions of `reference`, or `0o755` when the
/// reference cannot be read.
#[cfg(unix)]
async fn copy_permissions(reference: &Path, target: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let permissions = match fs::metadata(reference).await {
        Ok(metadata) => metadata.permissions(),
        Err(e) => {
            debug!("Cannot read permissions of {}: {e}", reference.display());
            std::fs::Permissions::from_mode(0o755)
        }
    };
    fs::set_permissions(target, permissions)
        .await
        .with_context(|| format!("Failed to set permissions on {}", target.display()))
}

#[cfg(not(unix))]
async fn copy_permissions(_reference: &Path, _target: &Path) -> Result<()> {
    Ok(())
}
