use anyhow::Result;
use clap::Args;
use tracing::debug;

use super::{CliConfig, open_settings, require_root};
use crate::process::SystemRunner;
use crate::remote::{Endpoints, HttpRemote};
use crate::workflow::{Context, InstallWorkflow, Reporter, TerminalPrompter};

/// Provision the Chief controller on this host.
///
/// Checks for Docker and the Compose plugin, asks for the controller domain
/// and whether to schedule automatic updates, then deploys the `chief`
/// stack. Refuses to run when the stack already exists.
#[derive(Args, Debug, Default)]
pub struct InstallCommand {}

impl InstallCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        require_root("install")?;

        let paths = config.paths();
        let mut settings = open_settings(&paths).await?;
        let reporter = Reporter::new(false, config.no_progress);
        let remote = HttpRemote::new(Endpoints::default());

        reporter.highlight("Installing Chief controller...");

        let mut ctx = Context {
            paths: &paths,
            settings: &mut settings,
            runner: &SystemRunner,
            remote: &remote,
            reporter: &reporter,
        };
        let report = InstallWorkflow::new(&TerminalPrompter).run(&mut ctx).await?;

        debug!("Installed controller {} for {}", report.version, report.domain);
        Ok(())
    }
}
