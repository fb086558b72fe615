//! Error handling for the Chief CLI
//!
//! Every workflow step returns a [`Result`](anyhow::Result); failures that an
//! operator needs to act on are expressed as a [`ChiefError`]. Nothing below
//! the command boundary terminates the process. `main` hands the final error
//! to [`user_friendly_error`], which attaches details and a suggestion, prints
//! it through [`ErrorContext::display`] and exits with status 1.
//!
//! # Error Categories
//!
//! - **Privilege**: [`ChiefError::PrivilegeRequired`]
//! - **Validation**: [`ChiefError::InvalidDomain`], [`ChiefError::EmptySecret`]
//! - **Precondition**: [`ChiefError::AlreadyInstalled`], [`ChiefError::NotInstalled`],
//!   [`ChiefError::ControllerNotRunning`], [`ChiefError::AlreadyUpToDate`]
//! - **External process**: [`ChiefError::DockerNotFound`], [`ChiefError::CommandFailed`],
//!   [`ChiefError::SchedulerError`]
//! - **Network**: [`ChiefError::NetworkError`], [`ChiefError::ChecksumMismatch`]
//!
//! # Examples
//!
//! ```rust,no_run
//! use chief_cli::core::{ChiefError, user_friendly_error};
//!
//! let err = anyhow::Error::from(ChiefError::NotInstalled);
//! user_friendly_error(err).display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The operator-facing failure kinds of an install, update or version run.
#[derive(Error, Debug)]
pub enum ChiefError {
    /// The command was started without root privileges.
    #[error("Please run this command with sudo. `sudo chief {command}`")]
    PrivilegeRequired {
        /// Subcommand the operator ran
        command: String,
    },

    /// The domain failed validation (too short or no dot).
    #[error("Please use a valid domain: '{domain}'")]
    InvalidDomain {
        /// The rejected input
        domain: String,
    },

    /// The credential generator produced nothing.
    #[error("Generating the database password failed")]
    EmptySecret,

    /// A `chief` stack already exists on this host.
    #[error("Chief controller is already installed")]
    AlreadyInstalled,

    /// The settings record has no domain or secret.
    #[error("Chief controller is not installed")]
    NotInstalled,

    /// Settings exist but the `chief` stack is not running.
    #[error("Chief controller is not running")]
    ControllerNotRunning,

    /// The remote controller version equals the installed one.
    #[error("Chief is already up to date ({version})")]
    AlreadyUpToDate {
        /// Installed version token
        version: String,
    },

    /// The docker executable could not be run.
    #[error("Docker is not installed")]
    DockerNotFound,

    /// The docker compose plugin could not be run.
    #[error("Docker Compose is not installed")]
    ComposeNotFound,

    /// An external command exited unsuccessfully.
    #[error("{step} failed")]
    CommandFailed {
        /// Human-readable step name, e.g. "Deploying stack"
        step: String,
        /// Captured stderr (or stdout when stderr is empty)
        output: String,
    },

    /// The unattended-update schedule could not be written or removed.
    #[error("Failed to {operation} automatic updates")]
    SchedulerError {
        /// "enable" or "disable"
        operation: String,
        /// Schedule file path
        path: String,
        /// Underlying failure
        reason: String,
    },

    /// A remote fetch failed.
    #[error("Network error: {operation}")]
    NetworkError {
        /// What was being fetched
        operation: String,
        /// Transport or HTTP status detail
        reason: String,
    },

    /// The downloaded CLI does not match the published build identifier.
    #[error("Downloaded binary checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// Published build identifier
        expected: String,
        /// Checksum of the downloaded bytes
        actual: String,
    },

    /// The settings file could not be read, parsed or written.
    #[error("Settings error in {path}")]
    SettingsError {
        /// Settings file path
        path: String,
        /// Underlying failure
        reason: String,
    },

    /// The interactive form could not be completed.
    #[error("Input prompt failed: {reason}")]
    PromptError {
        /// Underlying failure
        reason: String,
    },

    #[error("{message}")]
    Other {
        /// Free-form message
        message: String,
    },
}

/// A [`ChiefError`] with optional details and an actionable suggestion.
#[derive(Debug)]
pub struct ErrorContext {
    pub error: ChiefError,
    pub suggestion: Option<String>,
    pub details: Option<String>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(error: ChiefError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Whether `update --cron` should stay silent about this outcome.
    ///
    /// A scheduled run that finds nothing to do still exits 1 but must not
    /// write to the cron mail spool.
    #[must_use]
    pub const fn is_silent_when_unattended(&self) -> bool {
        matches!(
            self.error,
            ChiefError::AlreadyUpToDate {
                ..
            }
        )
    }

    /// Print the error to stderr with colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] ready for display.
///
/// Known [`ChiefError`] values get a tailored suggestion; anything else is
/// reported with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let error = match error.downcast::<ChiefError>() {
        Ok(chief_error) => return create_error_context(chief_error),
        Err(error) => error,
    };

    let permission_denied = error
        .downcast_ref::<std::io::Error>()
        .is_some_and(|e| e.kind() == std::io::ErrorKind::PermissionDenied);
    if permission_denied {
        return ErrorContext::new(ChiefError::Other {
            message: error.to_string(),
        })
        .with_suggestion("Run the command as root: `sudo chief <command>`");
    }

    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(ChiefError::Other {
        message,
    })
}

fn create_error_context(error: ChiefError) -> ErrorContext {
    match &error {
        ChiefError::AlreadyInstalled => ErrorContext::new(error)
            .with_suggestion("Run `chief update` to update the controller"),
        ChiefError::NotInstalled | ChiefError::ControllerNotRunning => {
            ErrorContext::new(error).with_suggestion("Run `chief install` first")
        }
        ChiefError::DockerNotFound => ErrorContext::new(error)
            .with_suggestion(
                "Install Docker and try again: https://docs.docker.com/engine/install/",
            ),
        ChiefError::ComposeNotFound => ErrorContext::new(error)
            .with_suggestion("Install the Docker Compose plugin and try again"),
        ChiefError::InvalidDomain {
            ..
        } => ErrorContext::new(error)
            .with_details("A domain needs at least 3 characters and a '.'")
            .with_suggestion(
                "Use a domain such as hosting.yourdomain.com \
                 with a DNS A record pointing at this server",
            ),
        ChiefError::CommandFailed {
            output,
            ..
        } => {
            let details = output.trim().to_string();
            let ctx = ErrorContext::new(error);
            if details.is_empty() {
                ctx
            } else {
                ctx.with_details(details)
            }
        }
        ChiefError::SchedulerError {
            operation,
            path,
            reason,
        } => {
            let suggestion = if operation == "enable" {
                "Please manually run `chief update --cron` as root to update Chief controller"
                    .to_string()
            } else {
                format!("Please manually run `rm -f {path}` as root")
            };
            let details = reason.clone();
            ErrorContext::new(error).with_details(details).with_suggestion(suggestion)
        }
        ChiefError::NetworkError {
            reason,
            ..
        } => {
            let details = reason.clone();
            ErrorContext::new(error)
                .with_details(details)
                .with_suggestion("Check the host's internet connectivity and try again")
        }
        ChiefError::ChecksumMismatch {
            ..
        } => ErrorContext::new(error)
            .with_details("The installed CLI was left untouched")
            .with_suggestion("Retry `chief update` later; the release may still be propagating"),
        ChiefError::SettingsError {
            reason,
            ..
        } => {
            let details = reason.clone();
            ErrorContext::new(error).with_details(details)
        }
        _ => ErrorContext::new(error),
    }
}
