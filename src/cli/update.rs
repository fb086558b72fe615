use anyhow::Result;
use clap::Args;
use tracing::debug;

use super::{CliConfig, open_settings, require_root};
use crate::process::SystemRunner;
use crate::remote::{Endpoints, HttpRemote};
use crate::upgrade::SelfUpdater;
use crate::workflow::{Context, Reporter, UpdateOutcome, UpdateWorkflow};

/// Update the Chief CLI or, when the CLI is current, the controller.
///
/// A newer CLI build is installed first and ends the run; the next run
/// (scheduled or manual) then updates the controller.
#[derive(Args, Debug, Default)]
pub struct UpdateCommand {
    /// Run unattended with no console output (used by the daily schedule)
    #[arg(short, long)]
    pub cron: bool,
}

impl UpdateCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        require_root("update")?;

        let paths = config.paths();
        let mut settings = open_settings(&paths).await?;
        let reporter = Reporter::new(self.cron, config.no_progress);
        let endpoints = Endpoints::default();
        let updater = SelfUpdater::for_current_exe(&endpoints)?;
        let remote = HttpRemote::new(endpoints);

        let mut ctx = Context {
            paths: &paths,
            settings: &mut settings,
            runner: &SystemRunner,
            remote: &remote,
            reporter: &reporter,
        };

        match UpdateWorkflow::new(&updater).run(&mut ctx).await? {
            UpdateOutcome::Updated {
                previous,
                version,
            } => debug!("Controller updated from {previous:?} to {version}"),
            UpdateOutcome::CliReplaced {
                build_id,
            } => debug!("{} replaced with build {build_id}", updater.executable().display()),
        }
        Ok(())
    }
}
