use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::sync::Mutex;

use crate::process::{CommandOutput, CommandRunner, ProcessCommand};

#[derive(Debug, Clone)]
enum Reply {
    Output(CommandOutput),
    Unavailable,
}

/// Command runner that records what would have been executed.
///
/// Each command line is matched against the rules in the order they were
/// added; the first rule whose prefix matches decides the reply. Commands
/// no rule matches succeed with empty output.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    rules: Vec<(String, Reply)>,
    calls: Mutex<Vec<String>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply to commands starting with `prefix` with `output`.
    pub fn respond(mut self, prefix: &str, output: CommandOutput) -> Self {
        self.rules.push((prefix.to_string(), Reply::Output(output)));
        self
    }

    /// Fail commands starting with `prefix` with exit status 1.
    pub fn fail(self, prefix: &str, stderr: &str) -> Self {
        self.respond(prefix, CommandOutput::failed(stderr))
    }

    /// Make commands starting with `prefix` impossible to spawn.
    pub fn unavailable(mut self, prefix: &str) -> Self {
        self.rules.push((prefix.to_string(), Reply::Unavailable));
        self
    }

    /// Every command line run so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// Whether any command line starting with `prefix` was run.
    pub fn ran(&self, prefix: &str) -> bool {
        self.calls().iter().any(|call| call.starts_with(prefix))
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, command: &ProcessCommand) -> Result<CommandOutput> {
        let line = command.command_line();
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(line.clone());
        }

        let reply = self
            .rules
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map(|(_, reply)| reply.clone());

        match reply {
            Some(Reply::Output(output)) => Ok(output),
            Some(Reply::Unavailable) => {
                Err(anyhow!("Failed to execute {line}: No such file or directory"))
            }
            None => Ok(CommandOutput::ok("")),
        }
    }
}
