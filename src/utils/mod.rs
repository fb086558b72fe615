//! Shared helpers: atomic file writes, privilege detection and spinners.
//!
//! # Modules
//!
//! - [`fs`] - Atomic writes, idempotent directory creation and removal
//! - [`platform`] - Effective-uid check used by every command
//! - [`progress`] - `indicatif` spinners that disappear in unattended runs

pub mod fs;
pub mod platform;
pub mod progress;

pub use fs::{atomic_write, atomic_write_private, ensure_dir, remove_if_exists};
pub use platform::is_elevated;
pub use progress::Spinner;
