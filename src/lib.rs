//! Chief - installer and updater for the Chief deployment controller
//!
//! Provisions the Chief controller on a single host as a Docker Swarm stack
//! named `chief`, fronted by Caddy, and keeps both the controller and this
//! CLI current.
//!
//! # Architecture Overview
//!
//! A run is one linear workflow over explicit collaborators:
//!
//! - settings live in `/var/chief/chief.yaml` and are passed around as a
//!   [`config::SettingsStore`], never as global state
//! - external commands go through a [`process::CommandRunner`]
//! - the published release state is read through a [`remote::RemoteSource`]
//! - the CLI binary is swapped through an [`upgrade::BinaryUpdater`]
//!
//! Every step returns a `Result`. Only `main` decides how an error is shown
//! and turns it into exit status 1.
//!
//! # Core Modules
//!
//! - [`cli`] - Command-line surface (`install`, `update`, `version`)
//! - [`workflow`] - Install, update and version sequencing
//! - [`config`] - Host layout and the settings record
//! - [`core`] - Error types and operator-facing error rendering
//!
//! ## Collaborators
//! - [`process`] - External commands and the docker operations built on them
//! - [`remote`] - Version tokens and manifest templates over HTTPS
//! - [`manifest`] - Template substitution and manifest files
//! - [`upgrade`] - Checksum-verified self-update with backup
//! - [`schedule`] - The daily `update --cron` entry
//! - [`secret`] - Datastore credential generation
//!
//! ## Supporting Modules
//! - [`constants`] - Fixed paths, endpoints and image names
//! - [`utils`] - Filesystem helpers, privilege check, spinners
//!
//! # Command-Line Usage
//!
//! ```bash
//! # Provision the controller (prompts for a domain)
//! sudo chief install
//!
//! # Update the CLI, or the controller if the CLI is current
//! sudo chief update
//!
//! # What the daily schedule runs
//! chief update --cron
//!
//! # Installed versions
//! sudo chief version
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod manifest;
pub mod process;
pub mod remote;
pub mod schedule;
pub mod secret;
pub mod upgrade;
pub mod utils;
pub mod workflow;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
