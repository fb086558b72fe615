//! Install, update and version workflows.
//!
//! Each workflow is a straight line of steps over a [`Context`]. A step
//! either succeeds or returns an error that ends the run; there is no retry
//! and no rollback of the stack. Collaborators are reached only through
//! traits ([`CommandRunner`], [`RemoteSource`], [`Prompter`],
//! [`BinaryUpdater`](crate::upgrade::BinaryUpdater)) so the sequencing can
//! be exercised without docker or a network.
//!
//! # Install
//!
//! ```text
//!  stack check ─► docker/compose ─► prompts ─► base dir ─► settings
//!      ─► schedule ─► secret ─► controller version ─► swarm
//!      ─► manifests ─► pull + deploy ─► https://<domain>
//! ```
//!
//! # Update
//!
//! ```text
//!  provisioned? ─► CLI build id ─┬─ differs ─► replace CLI, stop
//!                                └─ equal ──► stack running? ─► version
//!      ─► equal to installed? ─► manifests ─► pull + deploy ─► persist
//! ```

pub mod install;
pub mod prompt;
pub mod reporter;
pub mod update;
pub mod version;

use anyhow::Result;

use crate::config::{Paths, SettingsStore};
use crate::manifest::{self, ManifestKind, ManifestValues};
use crate::process::CommandRunner;
use crate::process::docker::Docker;
use crate::remote::RemoteSource;

pub use install::{InstallReport, InstallWorkflow};
pub use prompt::{Prompter, TerminalPrompter};
pub use reporter::Reporter;
pub use update::{UpdateOutcome, UpdateWorkflow};
pub use version::{VersionReport, version_report};

/// Everything a workflow reads from or acts on.
pub struct Context<'a> {
    pub paths: &'a Paths,
    pub settings: &'a mut SettingsStore,
    pub runner: &'a dyn CommandRunner,
    pub remote: &'a dyn RemoteSource,
    pub reporter: &'a Reporter,
}

impl<'a> Context<'a> {
    pub fn docker(&self) -> Docker<'a> {
        Docker::new(self.runner)
    }

    /// Regenerate both manifests for `version` from the stored domain and
    /// secret, then pull the controller image and deploy the stack.
    pub(crate) async fn redeploy(&self, version: &str) -> Result<()> {
        let settings = self.settings.settings();
        let values = ManifestValues {
            domain: settings.domain.clone(),
            secret: settings.secret.clone(),
            version: version.to_string(),
        };

        for kind in ManifestKind::ALL {
            let name = kind.file_name();
            self.reporter
                .step(
                    &format!("Downloading {name}..."),
                    &format!("Downloaded {name}"),
                    manifest::materialize(self.remote, self.paths, &values, kind),
                )
                .await?;
        }

        let docker = self.docker();
        self.reporter
            .step("Deploying the Chief stack...", "Deployed the Chief stack", async {
                docker.pull_controller_image().await?;
                docker.deploy_stack(self.paths.base_dir()).await
            })
            .await
    }
}
