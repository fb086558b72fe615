use anyhow::Result;
use chief_cli::config::{Paths, SettingsStore};
use chief_cli::core::{ChiefError, user_friendly_error};
use chief_cli::manifest::ManifestKind;
use chief_cli::process::CommandOutput;
use chief_cli::remote::{Endpoints, HttpRemote};
use chief_cli::test_utils::{
    FakeUpdater, RecordingRunner, ScriptedPrompter, init_test_logging,
};
use chief_cli::workflow::{
    Context, InstallReport, InstallWorkflow, Reporter, UpdateOutcome, UpdateWorkflow,
};
use tempfile::TempDir;

const BUILD_ID: &str = "5f1d2c0e";

const STACK_TEMPLATE: &str = "\
services:
  controller:
    image: ghcr.io/chiefdeploy/controller:${CHIEF_VERSION}
    environment:
      DOMAIN: $DOMAIN
      DATABASE_PASSWORD: ${PASSWORD}
      ACME_EMAIL: ${ACME_EMAIL}
";

const CADDY_TEMPLATE: &str = "${DOMAIN} {\n  reverse_proxy controller:3000\n}\n";

struct Host {
    _temp: TempDir,
    paths: Paths,
    reporter: Reporter,
}

impl Host {
    fn new() -> Self {
        init_test_logging(None);
        let temp = TempDir::new().unwrap();
        let paths = Paths::new(
            temp.path().join("var/chief"),
            temp.path().join("etc/cron.d/chief_update"),
        );
        Self {
            _temp: temp,
            paths,
            reporter: Reporter::silent(),
        }
    }

    async fn install(
        &self,
        runner: &RecordingRunner,
        remote: &HttpRemote,
        prompter: &ScriptedPrompter,
    ) -> Result<InstallReport> {
        let mut settings = SettingsStore::open(self.paths.settings_file()).await?;
        let mut ctx = Context {
            paths: &self.paths,
            settings: &mut settings,
            runner,
            remote,
            reporter: &self.reporter,
        };
        InstallWorkflow::new(prompter).run(&mut ctx).await
    }

    async fn update(
        &self,
        runner: &RecordingRunner,
        remote: &HttpRemote,
        updater: &FakeUpdater,
    ) -> Result<UpdateOutcome> {
        // each run starts from what is on disk, like a fresh process
        let mut settings = SettingsStore::open(self.paths.settings_file()).await?;
        let mut ctx = Context {
            paths: &self.paths,
            settings: &mut settings,
            runner,
            remote,
            reporter: &self.reporter,
        };
        UpdateWorkflow::new(updater).run(&mut ctx).await
    }

    async fn settings(&self) -> SettingsStore {
        SettingsStore::load(self.paths.settings_file()).await.unwrap()
    }
}

async fn release_host(version: &str) -> mockito::ServerGuard {
    let mut server = mockito::Server::new_async().await;
    server.mock("GET", "/version").with_body(format!("{version}\n")).create_async().await;
    server.mock("GET", "/version-cli").with_body(format!("{BUILD_ID}\n")).create_async().await;
    server.mock("GET", "/stack.yml.template").with_body(STACK_TEMPLATE).create_async().await;
    server.mock("GET", "/Caddyfile.template").with_body(CADDY_TEMPLATE).create_async().await;
    server
}

fn fresh_docker_host() -> RecordingRunner {
    RecordingRunner::new()
        .fail("docker stack ps", "nothing found in stack: chief")
        .respond("docker --version", CommandOutput::ok("Docker version 27.1.1, build 6312585\n"))
        .respond("docker compose version", CommandOutput::ok("Docker Compose version v2.29.1\n"))
        .respond("docker info", CommandOutput::ok("inactive\n"))
}

#[tokio::test]
async fn test_install_then_update_lifecycle() {
    let host = Host::new();

    // install v1
    let server = release_host("v1.0.0").await;
    let remote = HttpRemote::new(Endpoints::from_origin(&server.url()));
    let report = host
        .install(&fresh_docker_host(), &remote, &ScriptedPrompter::new("hosting.example.com", true))
        .await
        .unwrap();
    assert_eq!(report.access_url, "https://hosting.example.com");

    let installed = host.settings().await;
    let secret = installed.settings().secret.clone();
    assert_eq!(secret.len(), 48);
    assert_eq!(installed.settings().installed_version, "v1.0.0");

    let stack = std::fs::read_to_string(host.paths.manifest(ManifestKind::Stack)).unwrap();
    assert!(stack.contains("controller:v1.0.0"));
    assert!(stack.contains("DOMAIN: hosting.example.com"));
    assert!(stack.contains(&format!("DATABASE_PASSWORD: {secret}")));
    assert!(stack.contains("ACME_EMAIL: ${ACME_EMAIL}"));
    let caddy = std::fs::read_to_string(host.paths.manifest(ManifestKind::Proxy)).unwrap();
    assert_eq!(caddy, "hosting.example.com {\n  reverse_proxy controller:3000\n}\n");
    assert!(host.paths.cron_file().exists());

    // v2 is published; the stack is now running
    drop(server);
    let server = release_host("v2.0.0").await;
    let remote = HttpRemote::new(Endpoints::from_origin(&server.url()));
    let running = RecordingRunner::new();
    let outcome = host.update(&running, &remote, &FakeUpdater::new(BUILD_ID)).await.unwrap();
    assert_eq!(
        outcome,
        UpdateOutcome::Updated {
            previous: "v1.0.0".into(),
            version: "v2.0.0".into()
        }
    );
    assert!(running.ran("docker stack deploy"));

    let updated = host.settings().await;
    assert_eq!(updated.settings().installed_version, "v2.0.0");
    assert_eq!(updated.settings().secret, secret);
    let stack = std::fs::read_to_string(host.paths.manifest(ManifestKind::Stack)).unwrap();
    assert!(stack.contains("controller:v2.0.0"));

    // the scheduled run the next night finds nothing to do
    let idle = RecordingRunner::new();
    let err = host.update(&idle, &remote, &FakeUpdater::new(BUILD_ID)).await.unwrap_err();
    let ctx = user_friendly_error(err);
    assert!(matches!(ctx.error, ChiefError::AlreadyUpToDate { .. }));
    assert!(ctx.is_silent_when_unattended());
    assert!(!idle.ran("docker pull"));
}

#[tokio::test]
async fn test_up_to_date_run_fetches_no_templates() {
    let host = Host::new();
    let mut settings = SettingsStore::open(host.paths.settings_file()).await.unwrap();
    settings.set_domain("hosting.example.com").await.unwrap();
    settings.set_secret("s3cr3t").await.unwrap();
    settings.set_installed_version("v1.0.0").await.unwrap();

    let mut server = mockito::Server::new_async().await;
    server.mock("GET", "/version").with_body("v1.0.0").create_async().await;
    server.mock("GET", "/version-cli").with_body(BUILD_ID).create_async().await;
    let stack = server.mock("GET", "/stack.yml.template").expect(0).create_async().await;
    let caddy = server.mock("GET", "/Caddyfile.template").expect(0).create_async().await;

    let remote = HttpRemote::new(Endpoints::from_origin(&server.url()));
    let runner = RecordingRunner::new();
    let err = host.update(&runner, &remote, &FakeUpdater::new(BUILD_ID)).await.unwrap_err();

    assert!(matches!(err.downcast_ref::<ChiefError>(), Some(ChiefError::AlreadyUpToDate { .. })));
    stack.assert_async().await;
    caddy.assert_async().await;
    assert_eq!(runner.calls(), vec!["docker stack ps chief"]);
}

#[tokio::test]
async fn test_update_before_install_touches_nothing() {
    let host = Host::new();

    let mut server = mockito::Server::new_async().await;
    let version = server.mock("GET", "/version").expect(0).create_async().await;
    let build = server.mock("GET", "/version-cli").expect(0).create_async().await;

    let remote = HttpRemote::new(Endpoints::from_origin(&server.url()));
    let runner = RecordingRunner::new();
    let err = host.update(&runner, &remote, &FakeUpdater::new(BUILD_ID)).await.unwrap_err();

    let ctx = user_friendly_error(err);
    assert!(matches!(ctx.error, ChiefError::NotInstalled));
    assert_eq!(ctx.suggestion.as_deref(), Some("Run `chief install` first"));
    version.assert_async().await;
    build.assert_async().await;
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_reinstall_over_running_stack_is_refused() {
    let host = Host::new();
    let server = release_host("v1.0.0").await;
    let remote = HttpRemote::new(Endpoints::from_origin(&server.url()));

    let prompter = ScriptedPrompter::new("hosting.example.com", true);
    let err = host.install(&RecordingRunner::new(), &remote, &prompter).await.unwrap_err();

    let ctx = user_friendly_error(err);
    assert!(matches!(ctx.error, ChiefError::AlreadyInstalled));
    assert!(ctx.suggestion.unwrap().contains("chief update"));
    assert!(!host.paths.manifest(ManifestKind::Stack).exists());
}
