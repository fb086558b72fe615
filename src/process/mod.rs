//! External process gateway
//!
//! Every side effect on the container engine goes through a [`CommandRunner`].
//! A [`ProcessCommand`] describes the invocation; the runner executes it to
//! completion, captures both output streams and reports the exit status.
//! There is no timeout and no streaming: a hung `docker` call hangs the
//! workflow, matching the one-operator, one-invocation usage of the tool.
//!
//! Workflows hold a `&dyn CommandRunner` so tests can substitute a recorder
//! (see `test_utils::RecordingRunner`) and assert on the exact command
//! sequence without touching the host.

pub mod docker;

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::core::ChiefError;

/// A program, its arguments and an optional working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessCommand {
    program: String,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
}

impl ProcessCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    #[must_use]
    pub fn get_current_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    /// `docker stack ps chief`
    #[must_use]
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Exit 0 with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Exit 1 with the given stderr.
    pub fn failed(stderr: impl Into<String>) -> Self {
        Self {
            code: Some(1),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    #[must_use]
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Whatever the process said about its failure.
    #[must_use]
    pub fn diagnostic(&self) -> &str {
        if self.stderr.trim().is_empty() {
            self.stdout.trim()
        } else {
            self.stderr.trim()
        }
    }

    /// Turn a non-zero exit into [`ChiefError::CommandFailed`] for `step`.
    pub fn require_success(self, step: &str) -> Result<Self> {
        if self.success() {
            Ok(self)
        } else {
            Err(ChiefError::CommandFailed {
                step: step.to_string(),
                output: self.diagnostic().to_string(),
            }
            .into())
        }
    }
}

/// Runs external commands.
///
/// `Err` means the process could not be started at all; a process that ran
/// and failed is `Ok` with an unsuccessful [`CommandOutput`].
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &ProcessCommand) -> Result<CommandOutput>;
}

/// Production runner backed by `tokio::process`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, command: &ProcessCommand) -> Result<CommandOutput> {
        let start = std::time::Instant::now();
        tracing::debug!(target: "process", "Executing command: {}", command.command_line());

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args).stdin(Stdio::null()).stdout(Stdio::piped()).stderr(Stdio::piped());
        if let Some(dir) = &command.current_dir {
            cmd.current_dir(dir);
        }

        let output = cmd
            .output()
            .await
            .with_context(|| format!("Failed to execute {}", command.command_line()))?;

        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };

        if result.success() {
            tracing::debug!(
                target: "process",
                "{} finished in {}ms",
                command.program,
                start.elapsed().as_millis()
            );
        } else {
            tracing::debug!(
                target: "process",
                "Command failed with exit code {:?}: {}",
                result.code,
                result.diagnostic()
            );
        }

        Ok(result)
    }
}
