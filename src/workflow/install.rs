//! First-time provisioning of the Chief controller.

use anyhow::Result;
use tracing::info;

use super::Context;
use super::prompt::Prompter;
use crate::config::validate_domain;
use crate::core::ChiefError;
use crate::schedule;
use crate::secret::generate_secret;
use crate::utils::fs::ensure_dir;

/// Result of a successful install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub domain: String,
    pub version: String,
    pub access_url: String,
}

/// The `chief install` sequence.
pub struct InstallWorkflow<'a> {
    prompter: &'a dyn Prompter,
}

impl<'a> InstallWorkflow<'a> {
    pub fn new(prompter: &'a dyn Prompter) -> Self {
        Self {
            prompter,
        }
    }

    pub async fn run(&self, ctx: &mut Context<'_>) -> Result<InstallReport> {
        let docker = ctx.docker();
        let reporter = ctx.reporter;

        // 1. An existing stack means this host is already provisioned
        if docker.stack_running().await {
            return Err(ChiefError::AlreadyInstalled.into());
        }

        // 2. Container tooling
        let versions = docker.tool_versions().await?;
        reporter.info(format!("Docker: {}", versions.engine));
        reporter.info(format!("Docker Compose: {}", versions.compose));

        // 3. Operator input
        let stored_domain = ctx.settings.settings().domain.clone();
        let stored_default = (!stored_domain.is_empty()).then_some(stored_domain.as_str());
        let domain = self.prompter.domain(stored_default).await?;
        let domain = domain.trim().to_string();
        validate_domain(&domain)?;
        let automatic_updates =
            self.prompter.automatic_updates(ctx.settings.settings().automatic_updates).await?;

        // 4-6. Local state
        ensure_dir(ctx.paths.base_dir())?;
        ctx.settings.set_domain(&domain).await?;
        ctx.settings.set_automatic_updates(automatic_updates).await?;
        schedule::apply(ctx.paths.cron_file(), automatic_updates)?;
        info!("Settings stored in {}", ctx.settings.path().display());

        // 7. Datastore credential
        let secret = generate_secret();
        if secret.is_empty() {
            return Err(ChiefError::EmptySecret.into());
        }
        ctx.settings.set_secret(&secret).await?;

        // 8. Controller version
        let version = ctx.remote.controller_version().await?;
        ctx.settings.set_installed_version(&version).await?;
        reporter.highlight(format!("Chief version: {version}"));

        // 9. Swarm
        reporter
            .step("Initializing Docker Swarm...", "Docker Swarm ready", docker.ensure_swarm())
            .await?;

        // 10-11. Manifests and deployment
        ctx.redeploy(&version).await?;

        // 12. Done
        let access_url = format!("https://{domain}");
        reporter.success("Chief controller has been installed.");
        reporter.info(format!("Access your Chief controller at {access_url}"));

        Ok(InstallReport {
            domain,
            version,
            access_url,
        })
    }
}
