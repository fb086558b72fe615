//! File system helpers with atomic writes.
//!
//! Manifests, the settings record and the cron entry are always rewritten in
//! full. Writing to a sibling temp file and renaming it into place means a
//! crash mid-write leaves either the old or the new file, never a torn one.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Create `path` and all parents if missing. Idempotent.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Atomically replace `path` with `content`.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    write_with_mode(path, content, None)
}

/// Atomically replace `path` with `content` readable only by the owner.
pub fn atomic_write_private(path: &Path, content: &[u8]) -> Result<()> {
    write_with_mode(path, content, Some(0o600))
}

fn write_with_mode(path: &Path, content: &[u8], mode: Option<u32>) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }

    let temp_path = temp_sibling(path);

    {
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        // Private files never exist on disk with wider permissions
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            if let Some(mode) = mode {
                options.mode(mode);
            }
        }
        #[cfg(not(unix))]
        let _ = mode;

        let mut file = options
            .open(&temp_path)
            .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

        file.write_all(content)
            .with_context(|| format!("Failed to write to temp file: {}", temp_path.display()))?;

        file.sync_all().with_context(|| "Failed to sync file to disk")?;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // umask or a stale temp file may have left different bits
        if let Some(mode) = mode {
            fs::set_permissions(&temp_path, fs::Permissions::from_mode(mode)).with_context(
                || format!("Failed to set permissions on {}", temp_path.display()),
            )?;
        }
    }

    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;

    Ok(())
}

/// `Caddyfile` -> `.Caddyfile.tmp`, kept in the same directory so the
/// rename never crosses a file system boundary.
fn temp_sibling(path: &Path) -> std::path::PathBuf {
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}

/// Remove `path`, treating an already-missing file as success.
pub fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
    }
}
