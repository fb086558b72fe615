//! Persistent settings record for the installed controller.
//!
//! The record lives at `/var/chief/chief.yaml`:
//!
//! ```yaml
//! domain: hosting.example.com
//! automatic_updates: true
//! secret: 3kQ...48 chars...
//! current_version: v1.4.2
//! ```
//!
//! Defaults are written the first time the store is opened on a host. Every
//! setter persists immediately so a failure later in a workflow never loses
//! the values already collected. The file is written owner-only because it
//! holds the datastore secret.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::ChiefError;
use crate::utils::fs::atomic_write_private;

/// Values persisted between invocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Public domain the controller is served on. Empty until installed.
    #[serde(default)]
    pub domain: String,

    /// Whether the cron entry for unattended updates should exist.
    #[serde(default = "default_automatic_updates")]
    pub automatic_updates: bool,

    /// Datastore credential, generated once at install time.
    #[serde(default, alias = "password")]
    pub secret: String,

    /// Controller version token last deployed. Empty until installed.
    #[serde(default, rename = "current_version")]
    pub installed_version: String,
}

const fn default_automatic_updates() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            domain: String::new(),
            automatic_updates: default_automatic_updates(),
            secret: String::new(),
            installed_version: String::new(),
        }
    }
}

impl Settings {
    /// A completed install leaves both a domain and a secret behind.
    #[must_use]
    pub fn is_provisioned(&self) -> bool {
        !self.domain.is_empty() && !self.secret.is_empty()
    }
}

/// Check a domain before it is stored: at least 3 characters and a dot.
///
/// ```rust
/// use chief_cli::config::validate_domain;
///
/// assert!(validate_domain("a.b").is_ok());
/// assert!(validate_domain("ab").is_err());
/// ```
pub fn validate_domain(domain: &str) -> Result<(), ChiefError> {
    if domain.len() < 3 || !domain.contains('.') {
        return Err(ChiefError::InvalidDomain {
            domain: domain.to_string(),
        });
    }
    Ok(())
}

/// File-backed owner of [`Settings`].
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
}

impl SettingsStore {
    /// Open the record at `path`, writing defaults first if it does not exist.
    ///
    /// A path that cannot be inspected is an error; defaults are only
    /// written when the file is known to be absent.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let exists = tokio::fs::try_exists(&path).await.map_err(|e| settings_error(&path, e))?;
        if !exists {
            debug!("No settings at {}, writing defaults", path.display());
            let store = Self {
                path,
                settings: Settings::default(),
            };
            store.save().await?;
            return Ok(store);
        }

        Self::load(path).await
    }

    /// Load an existing record. Fails if the file is missing or malformed.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content =
            tokio::fs::read_to_string(&path).await.map_err(|e| settings_error(&path, e))?;

        // An empty file is what a crashed first run could leave behind.
        let settings = if content.trim().is_empty() {
            Settings::default()
        } else {
            serde_yaml::from_str(&content).map_err(|e| settings_error(&path, e))?
        };

        debug!("Loaded settings from {}", path.display());
        Ok(Self {
            path,
            settings,
        })
    }

    /// Write the current values to disk.
    pub async fn save(&self) -> Result<()> {
        let content =
            serde_yaml::to_string(&self.settings).map_err(|e| settings_error(&self.path, e))?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || atomic_write_private(&path, content.as_bytes()))
            .await
            .map_err(|e| settings_error(&self.path, e))?
            .map_err(|e| settings_error(&self.path, e))?;

        debug!("Saved settings to {}", self.path.display());
        Ok(())
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn set_domain(&mut self, domain: &str) -> Result<()> {
        self.settings.domain = domain.to_string();
        self.save().await
    }

    pub async fn set_automatic_updates(&mut self, enabled: bool) -> Result<()> {
        self.settings.automatic_updates = enabled;
        self.save().await
    }

    pub async fn set_secret(&mut self, secret: &str) -> Result<()> {
        self.settings.secret = secret.to_string();
        self.save().await
    }

    pub async fn set_installed_version(&mut self, version: &str) -> Result<()> {
        self.settings.installed_version = version.to_string();
        self.save().await
    }
}

fn settings_error(path: &Path, reason: impl std::fmt::Display) -> anyhow::Error {
    ChiefError::SettingsError {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
    .into()
}
