use assert_cmd::Command;
use chief_cli::utils::is_elevated;
use predicates::prelude::*;
use tempfile::TempDir;

fn chief() -> Command {
    let mut cmd = Command::cargo_bin("chief").unwrap();
    cmd.env("CHIEF_NO_PROGRESS", "1").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    chief()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("update"))
        .stdout(predicate::str::contains("version"))
        .stdout(predicate::str::contains("--base-dir").not());
}

#[test]
fn test_update_help_documents_cron_flag() {
    chief()
        .args(["update", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--cron"))
        .stdout(predicate::str::contains("-c"));
}

#[test]
fn test_usage_errors_exit_with_one() {
    chief()
        .arg("uninstall")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unrecognized subcommand"));
    chief()
        .args(["update", "--bogus"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--bogus"));
}

#[test]
fn test_version_flag_exits_zero() {
    chief()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_commands_require_root() {
    if is_elevated() {
        eprintln!("Skipping privilege test when running as root");
        return;
    }

    let temp = TempDir::new().unwrap();
    for command in ["install", "update", "version"] {
        chief()
            .arg(command)
            .env("CHIEF_BASE_DIR", temp.path())
            .assert()
            .code(1)
            .stderr(predicate::str::contains(format!("sudo chief {command}")));
    }

    // rejected before the settings record is created
    assert!(!temp.path().join("chief.yaml").exists());
}

#[test]
fn test_cron_run_still_reports_privilege_error() {
    if is_elevated() {
        return;
    }

    chief()
        .args(["update", "--cron"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("sudo"));
}
