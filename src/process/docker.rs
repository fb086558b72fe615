//! Docker engine, swarm and stack operations used by the workflows.

use anyhow::Result;
use std::path::Path;
use tracing::{debug, info};

use super::{CommandRunner, ProcessCommand};
use crate::constants::{CONTROLLER_IMAGE, STACK_MANIFEST_NAME, STACK_NAME, SWARM_ADVERTISE_ADDR};
use crate::core::ChiefError;

/// `docker stack ps chief`
pub fn stack_ps() -> ProcessCommand {
    ProcessCommand::new("docker").args(["stack", "ps", STACK_NAME])
}

/// `docker --version`
pub fn engine_version() -> ProcessCommand {
    ProcessCommand::new("docker").arg("--version")
}

/// `docker compose version`
pub fn compose_version() -> ProcessCommand {
    ProcessCommand::new("docker").args(["compose", "version"])
}

/// `docker info --format {{.Swarm.LocalNodeState}}`
pub fn swarm_state() -> ProcessCommand {
    ProcessCommand::new("docker").args(["info", "--format", "{{.Swarm.LocalNodeState}}"])
}

/// `docker swarm init --advertise-addr 127.0.0.1`
pub fn swarm_init() -> ProcessCommand {
    ProcessCommand::new("docker").args(["swarm", "init", "--advertise-addr", SWARM_ADVERTISE_ADDR])
}

/// `docker pull ghcr.io/chiefdeploy/controller:latest`
pub fn pull_controller_image() -> ProcessCommand {
    ProcessCommand::new("docker").args(["pull", CONTROLLER_IMAGE])
}

/// `docker stack deploy -c stack.yml --detach=true --resolve-image changed chief`,
/// run from `base_dir` so relative paths in the manifest resolve there.
pub fn stack_deploy(base_dir: &Path) -> ProcessCommand {
    ProcessCommand::new("docker")
        .args([
            "stack",
            "deploy",
            "-c",
            STACK_MANIFEST_NAME,
            "--detach=true",
            "--resolve-image",
            "changed",
            STACK_NAME,
        ])
        .current_dir(base_dir)
}

/// Versions reported by the engine and its compose plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolVersions {
    pub engine: String,
    pub compose: String,
}

/// Docker operations over a [`CommandRunner`].
pub struct Docker<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> Docker<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self {
            runner,
        }
    }

    /// Whether the `chief` stack exists. Any failure, including docker not
    /// being present, counts as "not running".
    pub async fn stack_running(&self) -> bool {
        match self.runner.run(&stack_ps()).await {
            Ok(output) => output.success(),
            Err(e) => {
                debug!("Stack check could not run: {e:#}");
                false
            }
        }
    }

    /// Probe the engine and the compose plugin.
    pub async fn tool_versions(&self) -> Result<ToolVersions> {
        let engine = match self.runner.run(&engine_version()).await {
            Ok(output) if output.success() => output.stdout.trim().to_string(),
            _ => return Err(ChiefError::DockerNotFound.into()),
        };

        let compose = match self.runner.run(&compose_version()).await {
            Ok(output) if output.success() => output.stdout.trim().to_string(),
            _ => return Err(ChiefError::ComposeNotFound.into()),
        };

        Ok(ToolVersions {
            engine,
            compose,
        })
    }

    /// Initialise the single-node swarm unless this node already is a manager.
    ///
    /// Returns `true` when `swarm init` ran.
    pub async fn ensure_swarm(&self) -> Result<bool> {
        let state = self.runner.run(&swarm_state()).await?;
        if state.success() && state.stdout.trim() == "active" {
            info!("Swarm already active, skipping init");
            return Ok(false);
        }

        self.runner.run(&swarm_init()).await?.require_success("Initializing Docker Swarm")?;
        Ok(true)
    }

    pub async fn pull_controller_image(&self) -> Result<()> {
        self.runner
            .run(&pull_controller_image())
            .await?
            .require_success("Pulling controller image")?;
        Ok(())
    }

    pub async fn deploy_stack(&self, base_dir: &Path) -> Result<()> {
        self.runner.run(&stack_deploy(base_dir)).await?.require_success("Deploying stack")?;
        Ok(())
    }
}
