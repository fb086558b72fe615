use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::{CliConfig, require_root};
use crate::config::{Settings, SettingsStore};
use crate::remote::{Endpoints, HttpRemote};
use crate::upgrade::SelfUpdater;
use crate::workflow::{VersionReport, version_report};

/// Show the CLI build and the installed controller version.
#[derive(Args, Debug, Default)]
pub struct VersionCommand {}

impl VersionCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        require_root("version")?;

        // Reading only; a host without a record has nothing installed
        let settings_file = config.paths().settings_file();
        let settings = if settings_file.exists() {
            SettingsStore::load(&settings_file).await?.settings().clone()
        } else {
            Settings::default()
        };

        let endpoints = Endpoints::default();
        let updater = SelfUpdater::for_current_exe(&endpoints)?;
        let remote = HttpRemote::new(endpoints);

        let report = version_report(&settings, &remote, &updater).await?;
        print_report(&report);
        Ok(())
    }
}

fn print_report(report: &VersionReport) {
    if report.cli_outdated() {
        let notice = "Chief CLI is out of date. Please run `chief update` to update Chief CLI.";
        println!("{}", notice.yellow());
        return;
    }

    println!("Chief CLI Version: {} ({})", report.package_version, report.build_id);
    match &report.controller_version {
        Some(version) => println!("Chief Controller Version: {version}"),
        None => println!("Chief Controller is not installed."),
    }
}
