//! Operator-facing output for the workflows.
//!
//! All user-visible progress goes through a [`Reporter`], so unattended runs
//! can silence it in one place. Diagnostics for failures are not printed
//! here; they travel back to `main` as errors.

use anyhow::Result;
use colored::Colorize;
use std::future::Future;

use crate::utils::progress::Spinner;

/// Renders step progress and informational lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    unattended: bool,
    no_progress: bool,
}

impl Reporter {
    #[must_use]
    pub const fn new(unattended: bool, no_progress: bool) -> Self {
        Self {
            unattended,
            no_progress,
        }
    }

    /// A reporter that prints nothing at all.
    #[must_use]
    pub const fn silent() -> Self {
        Self::new(true, true)
    }

    pub fn info(&self, message: impl AsRef<str>) {
        if !self.unattended {
            println!("{}", message.as_ref());
        }
    }

    pub fn highlight(&self, message: impl AsRef<str>) {
        if !self.unattended {
            println!("{}", message.as_ref().cyan().bold());
        }
    }

    pub fn success(&self, message: impl AsRef<str>) {
        if !self.unattended {
            println!("{}", message.as_ref().green().bold());
        }
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        if !self.unattended {
            println!("{}", message.as_ref().yellow());
        }
    }

    /// Start a spinner for a step.
    #[must_use]
    pub fn spinner(&self, message: &str) -> Spinner {
        Spinner::new(message, self.unattended || self.no_progress)
    }

    /// Run `step` under a spinner labelled `running`, finishing with `done`
    /// on success.
    pub async fn step<T, F>(&self, running: &str, done: &str, step: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let spinner = self.spinner(running);
        match step.await {
            Ok(value) => {
                if spinner.is_hidden() {
                    self.info(format!("✓ {done}"));
                } else {
                    spinner.finish_success(done);
                }
                Ok(value)
            }
            Err(e) => {
                if !spinner.is_hidden() {
                    spinner.finish_error(running.trim_end_matches("..."));
                }
                Err(e)
            }
        }
    }
}
