//! What is installed, and whether the CLI is current.

use anyhow::Result;

use crate::config::Settings;
use crate::remote::RemoteSource;
use crate::upgrade::BinaryUpdater;

/// Snapshot shown by `chief version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionReport {
    pub package_version: String,
    pub build_id: String,
    pub published_build_id: String,
    /// `None` when no controller has been installed.
    pub controller_version: Option<String>,
}

impl VersionReport {
    #[must_use]
    pub fn cli_outdated(&self) -> bool {
        self.build_id != self.published_build_id
    }
}

pub async fn version_report(
    settings: &Settings,
    remote: &dyn RemoteSource,
    updater: &dyn BinaryUpdater,
) -> Result<VersionReport> {
    let published_build_id = remote.cli_build_id().await?;
    let build_id = updater.current_build_id().await?;
    let controller_version = Some(settings.installed_version.clone()).filter(|v| !v.is_empty());

    Ok(VersionReport {
        package_version: env!("CARGO_PKG_VERSION").to_string(),
        build_id,
        published_build_id,
        controller_version,
    })
}
