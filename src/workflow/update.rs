//! Updating an installed controller, and the CLI itself.

use anyhow::Result;
use tracing::{debug, info};

use super::Context;
use crate::core::ChiefError;
use crate::upgrade::BinaryUpdater;

/// How an update run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The stack was redeployed at a new controller version.
    Updated { previous: String, version: String },
    /// A newer CLI was published and installed; the stack was not touched.
    CliReplaced { build_id: String },
}

/// The `chief update` sequence.
pub struct UpdateWorkflow<'a> {
    updater: &'a dyn BinaryUpdater,
}

impl<'a> UpdateWorkflow<'a> {
    pub fn new(updater: &'a dyn BinaryUpdater) -> Self {
        Self {
            updater,
        }
    }

    pub async fn run(&self, ctx: &mut Context<'_>) -> Result<UpdateOutcome> {
        let reporter = ctx.reporter;

        // Must be provisioned before anything goes over the network
        if !ctx.settings.settings().is_provisioned() {
            return Err(ChiefError::NotInstalled.into());
        }

        reporter.info("Updating Chief controller...");

        // 1. CLI first; a replaced binary ends this run
        let published = ctx.remote.cli_build_id().await?;
        let running = self.updater.current_build_id().await?;
        debug!("CLI build: running {running}, published {published}");
        if published != running {
            reporter.warn("Chief CLI is out of date, updating it first.");
            reporter
                .step(
                    "Updating Chief CLI...",
                    "Chief CLI updated. Run `chief update` again to update the controller",
                    self.updater.replace(&published),
                )
                .await?;
            info!("CLI replaced with build {published}");
            return Ok(UpdateOutcome::CliReplaced {
                build_id: published,
            });
        }

        // 2. Stack must exist
        if !ctx.docker().stack_running().await {
            return Err(ChiefError::ControllerNotRunning.into());
        }

        // 3-4. Version comparison, exact match only
        let version = ctx.remote.controller_version().await?;
        let previous = ctx.settings.settings().installed_version.clone();
        if version == previous {
            return Err(ChiefError::AlreadyUpToDate {
                version,
            }
            .into());
        }
        reporter.highlight(format!("Chief version: {version}"));

        // 5-6. Manifests and deployment
        ctx.redeploy(&version).await?;

        // 7. Record what is now running
        ctx.settings.set_installed_version(&version).await?;
        reporter.success("Chief controller has been updated.");

        Ok(UpdateOutcome::Updated {
            previous,
            version,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Paths, SettingsStore};
    use crate::manifest::ManifestKind;
    use crate::test_utils::{FakeUpdater, RecordingRunner, StubRemote};
    use crate::workflow::Reporter;
    use tempfile::TempDir;

    struct Harness {
        _temp: TempDir,
        paths: Paths,
        settings: SettingsStore,
        reporter: Reporter,
    }

    impl Harness {
        async fn provisioned() -> Self {
            let mut h = Self::empty().await;
            h.settings.set_domain("hosting.example.com").await.unwrap();
            h.settings.set_secret("s3cr3t").await.unwrap();
            h.settings.set_installed_version("v1").await.unwrap();
            h
        }

        async fn empty() -> Self {
            let temp = TempDir::new().unwrap();
            let paths = Paths::new(temp.path().join("chief"), temp.path().join("chief_update"));
            let settings = SettingsStore::open(paths.settings_file()).await.unwrap();
            Self {
                _temp: temp,
                paths,
                settings,
                reporter: Reporter::silent(),
            }
        }

        async fn update(
            &mut self,
            runner: &RecordingRunner,
            remote: &StubRemote,
            updater: &FakeUpdater,
        ) -> Result<UpdateOutcome> {
            let mut ctx = Context {
                paths: &self.paths,
                settings: &mut self.settings,
                runner,
                remote,
                reporter: &self.reporter,
            };
            UpdateWorkflow::new(updater).run(&mut ctx).await
        }
    }

    #[tokio::test]
    async fn test_new_version_redeploys_and_persists() {
        let mut h = Harness::provisioned().await;
        let runner = RecordingRunner::new();
        let remote = StubRemote::new("v2", "build-a");
        let updater = FakeUpdater::new("build-a");

        let outcome = h.update(&runner, &remote, &updater).await.unwrap();
        assert_eq!(
            outcome,
            UpdateOutcome::Updated {
                previous: "v1".into(),
                version: "v2".into()
            }
        );
        assert_eq!(
            runner.calls(),
            vec![
                "docker stack ps chief",
                "docker pull ghcr.io/chiefdeploy/controller:latest",
                "docker stack deploy -c stack.yml --detach=true --resolve-image changed chief",
            ]
        );
        assert_eq!(h.settings.settings().installed_version, "v2");
        // secret is reused, never regenerated
        assert_eq!(h.settings.settings().secret, "s3cr3t");
        let stack = std::fs::read_to_string(h.paths.manifest(ManifestKind::Stack)).unwrap();
        assert!(stack.contains("s3cr3t"));
        assert!(stack.contains("v2"));
    }

    #[tokio::test]
    async fn test_equal_version_is_up_to_date_without_side_effects() {
        let mut h = Harness::provisioned().await;
        let runner = RecordingRunner::new();
        let remote = StubRemote::new("v1", "build-a");
        let updater = FakeUpdater::new("build-a");

        let err = h.update(&runner, &remote, &updater).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ChiefError>(),
            Some(ChiefError::AlreadyUpToDate { version }) if version == "v1"
        ));
        assert_eq!(remote.template_calls(), 0);
        assert!(!runner.ran("docker pull"));
        assert!(!runner.ran("docker stack deploy"));
        assert!(!h.paths.manifest(ManifestKind::Stack).exists());
    }

    #[tokio::test]
    async fn test_unprovisioned_host_aborts_before_any_call() {
        let mut h = Harness::empty().await;
        let runner = RecordingRunner::new();
        let remote = StubRemote::new("v2", "build-a");
        let updater = FakeUpdater::new("build-a");

        let err = h.update(&runner, &remote, &updater).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<ChiefError>(), Some(ChiefError::NotInstalled)));
        assert!(runner.calls().is_empty());
        assert_eq!(remote.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_secret_counts_as_not_installed() {
        let mut h = Harness::empty().await;
        h.settings.set_domain("hosting.example.com").await.unwrap();
        let runner = RecordingRunner::new();
        let remote = StubRemote::new("v2", "build-a");
        let updater = FakeUpdater::new("build-a");

        let err = h.update(&runner, &remote, &updater).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<ChiefError>(), Some(ChiefError::NotInstalled)));
        assert_eq!(remote.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_new_cli_build_replaces_binary_and_skips_stack() {
        let mut h = Harness::provisioned().await;
        let runner = RecordingRunner::new();
        let remote = StubRemote::new("v2", "build-b");
        let updater = FakeUpdater::new("build-a");

        let outcome = h.update(&runner, &remote, &updater).await.unwrap();
        assert_eq!(
            outcome,
            UpdateOutcome::CliReplaced {
                build_id: "build-b".into()
            }
        );
        assert_eq!(updater.replaced_with(), vec!["build-b"]);
        assert!(runner.calls().is_empty());
        assert_eq!(remote.version_calls(), 0);
        assert_eq!(h.settings.settings().installed_version, "v1");
    }

    #[tokio::test]
    async fn test_failed_cli_replacement_is_reported() {
        let mut h = Harness::provisioned().await;
        let runner = RecordingRunner::new();
        let remote = StubRemote::new("v2", "build-b");
        let updater = FakeUpdater::new("build-a").failing();

        assert!(h.update(&runner, &remote, &updater).await.is_err());
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_stopped_stack_aborts() {
        let mut h = Harness::provisioned().await;
        let runner =
            RecordingRunner::new().fail("docker stack ps", "nothing found in stack: chief");
        let remote = StubRemote::new("v2", "build-a");
        let updater = FakeUpdater::new("build-a");

        let err = h.update(&runner, &remote, &updater).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ChiefError>(),
            Some(ChiefError::ControllerNotRunning)
        ));
        assert_eq!(remote.version_calls(), 0);
    }

    #[tokio::test]
    async fn test_failed_deploy_keeps_previous_version() {
        let mut h = Harness::provisioned().await;
        let runner = RecordingRunner::new().fail("docker pull", "manifest unknown");
        let remote = StubRemote::new("v2", "build-a");
        let updater = FakeUpdater::new("build-a");

        let err = h.update(&runner, &remote, &updater).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<ChiefError>(), Some(ChiefError::CommandFailed { .. })));
        assert!(!runner.ran("docker stack deploy"));
        assert_eq!(h.settings.settings().installed_version, "v1");
    }

    #[tokio::test]
    async fn test_missing_template_keeps_previous_version() {
        let mut h = Harness::provisioned().await;
        let runner = RecordingRunner::new();
        let remote = StubRemote::new("v2", "build-a").without_template(ManifestKind::Stack);
        let updater = FakeUpdater::new("build-a");

        let err = h.update(&runner, &remote, &updater).await.unwrap_err();
        match err.downcast_ref::<ChiefError>() {
            Some(ChiefError::NetworkError { operation, .. }) => {
                assert_eq!(operation, "Error downloading stack.yml");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(remote.version_calls(), 1);
        assert_eq!(runner.calls(), vec!["docker stack ps chief"]);
        assert_eq!(h.settings.settings().installed_version, "v1");
        assert!(!h.paths.manifest(ManifestKind::Stack).exists());
    }
}
