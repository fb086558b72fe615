//! Host layout and persistent settings.
//!
//! [`Paths`] names every file the CLI reads or writes on the host.
//! [`SettingsStore`] owns the settings record inside that layout and is passed
//! explicitly into each workflow; there is no process-wide configuration.

pub mod settings;

pub use settings::{Settings, SettingsStore, validate_domain};

use std::path::{Path, PathBuf};

use crate::constants::{BASE_DIR, CRON_FILE, SETTINGS_FILE_NAME};
use crate::manifest::ManifestKind;

/// Files the CLI manages on the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    base_dir: PathBuf,
    cron_file: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self::new(BASE_DIR, CRON_FILE)
    }
}

impl Paths {
    pub fn new(base_dir: impl Into<PathBuf>, cron_file: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            cron_file: cron_file.into(),
        }
    }

    /// Standard layout with a different base directory. The cron file stays
    /// where the system scheduler reads it.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self::new(base_dir, CRON_FILE)
    }

    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    #[must_use]
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join(SETTINGS_FILE_NAME)
    }

    #[must_use]
    pub fn cron_file(&self) -> &Path {
        &self.cron_file
    }

    #[must_use]
    pub fn manifest(&self, kind: ManifestKind) -> PathBuf {
        self.base_dir.join(kind.file_name())
    }
}
