//! Command-line interface for the Chief CLI.
//!
//! Three subcommands, each in its own module with an args struct and an
//! `execute` method:
//!
//! - `install`: provision the controller on this host
//! - `update [--cron]`: update the CLI or the controller
//! - `version`: show what is installed
//!
//! All three need root. The privilege check runs before anything touches
//! the host so an unprivileged run leaves no trace.
//!
//! # Global Options
//!
//! - `--verbose` / `-v`: debug logging
//! - `--quiet` / `-q`: no logging
//! - `--no-progress`: no spinners (also `CHIEF_NO_PROGRESS`)
//!
//! Logs go to stderr; `RUST_LOG` overrides the level chosen by the flags.

mod install;
mod update;
mod version;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::{Paths, SettingsStore};
use crate::core::ChiefError;
use crate::utils::is_elevated;

pub use install::InstallCommand;
pub use update::UpdateCommand;
pub use version::VersionCommand;

/// Settings derived from the global flags, handed to every command.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// `EnvFilter` directive; `None` disables logging.
    pub log_level: Option<String>,

    pub no_progress: bool,

    /// Replacement for `/var/chief`.
    pub base_dir: Option<PathBuf>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn paths(&self) -> Paths {
        self.base_dir.as_ref().map_or_else(Paths::default, Paths::with_base_dir)
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "chief",
    about = "Install and update the Chief deployment controller",
    version,
    long_about = "Chief provisions the Chief controller on this host as a Docker Swarm stack \
                  behind a Caddy reverse proxy, and keeps it and itself up to date."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Disable all logging
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable spinners
    #[arg(long, global = true)]
    no_progress: bool,

    #[arg(long, global = true, hide = true, env = "CHIEF_BASE_DIR")]
    base_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Install the Chief controller on this host
    Install(InstallCommand),

    /// Update the Chief CLI or the Chief controller
    Update(UpdateCommand),

    /// Show the installed Chief versions
    Version(VersionCommand),
}

impl Cli {
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.quiet {
            None
        } else if self.verbose {
            Some("debug".to_string())
        } else {
            Some("warn".to_string())
        };

        CliConfig {
            log_level,
            no_progress: self.no_progress,
            base_dir: self.base_dir.clone(),
        }
    }

    /// Whether this is the scheduled `update --cron` run, which reports
    /// nothing on the expected "already up to date" outcome.
    #[must_use]
    pub fn is_unattended(&self) -> bool {
        matches!(&self.command, Commands::Update(cmd) if cmd.cron)
    }

    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        match self.command {
            Commands::Install(cmd) => cmd.execute(&config).await,
            Commands::Update(cmd) => cmd.execute(&config).await,
            Commands::Version(cmd) => cmd.execute(&config).await,
        }
    }
}

/// Install the global tracing subscriber, writing to stderr.
pub fn init_logging(config: &CliConfig) {
    let filter = match (EnvFilter::try_from_default_env(), config.log_level.as_deref()) {
        (Ok(filter), _) => filter,
        (Err(_), Some(level)) => EnvFilter::new(level),
        (Err(_), None) => return,
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn require_root(command: &str) -> Result<()> {
    if is_elevated() {
        Ok(())
    } else {
        Err(ChiefError::PrivilegeRequired {
            command: command.to_string(),
        }
        .into())
    }
}

/// Open the settings record, creating it with defaults on first use.
async fn open_settings(paths: &Paths) -> Result<SettingsStore> {
    SettingsStore::open(paths.settings_file()).await
}
