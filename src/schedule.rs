//! Unattended-update schedule.
//!
//! The switch is the presence of a cron.d file containing a single fixed
//! line that runs `chief update --cron` daily. Enabling rewrites the file,
//! disabling removes it; both are idempotent.

use anyhow::Result;
use std::path::Path;
use tracing::info;

use crate::constants::cron_entry;
use crate::core::ChiefError;
use crate::utils::fs::{atomic_write, remove_if_exists};

/// Bring the schedule file in line with `enabled`.
pub fn apply(cron_file: &Path, enabled: bool) -> Result<()> {
    let (operation, result) = if enabled {
        ("enable", atomic_write(cron_file, cron_entry().as_bytes()))
    } else {
        ("disable", remove_if_exists(cron_file))
    };

    result.map_err(|e| ChiefError::SchedulerError {
        operation: operation.to_string(),
        path: cron_file.display().to_string(),
        reason: format!("{e:#}"),
    })?;

    info!("Automatic updates {}d ({})", operation, cron_file.display());
    Ok(())
}
