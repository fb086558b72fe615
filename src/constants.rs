//! Fixed locations, endpoints and names used across the Chief CLI.
//!
//! The controller is always provisioned into the same layout on the host and
//! always pulls from the same published locations, so these are plain
//! constants rather than configuration. [`crate::config::Paths`] and
//! [`crate::remote::Endpoints`] group them for callers that need to substitute
//! a different root (tests, non-standard hosts).

/// Base directory holding the settings file and both manifests.
pub const BASE_DIR: &str = "/var/chief";

/// Settings file name inside [`BASE_DIR`].
pub const SETTINGS_FILE_NAME: &str = "chief.yaml";

/// Stack definition written inside [`BASE_DIR`].
pub const STACK_MANIFEST_NAME: &str = "stack.yml";

/// Reverse-proxy definition written inside [`BASE_DIR`].
pub const PROXY_MANIFEST_NAME: &str = "Caddyfile";

/// Scheduled-task file for unattended updates. Its presence is the switch.
pub const CRON_FILE: &str = "/etc/cron.d/chief_update";

/// Installed location of the CLI, referenced from the cron entry.
pub const INSTALLED_BINARY: &str = "/usr/local/bin/chief";

/// Name of the swarm stack running the controller.
pub const STACK_NAME: &str = "chief";

/// Controller image pulled before every deploy.
pub const CONTROLLER_IMAGE: &str = "ghcr.io/chiefdeploy/controller:latest";

/// Address the single-node swarm advertises.
pub const SWARM_ADVERTISE_ADDR: &str = "127.0.0.1";

/// Plaintext endpoint returning the latest controller version token.
pub const CONTROLLER_VERSION_URL: &str = "https://install.chiefdeploy.com/version";

/// Plaintext endpoint returning the SHA-256 of the latest published CLI.
pub const CLI_BUILD_URL: &str = "https://install.chiefdeploy.com/version-cli";

/// Bucket serving manifest templates and the CLI binary.
pub const ASSET_BASE_URL: &str = "https://chief-install.s3.eu-central-1.amazonaws.com";

/// Object name of the published linux/amd64 CLI binary.
pub const CLI_BINARY_NAME: &str = "chief-linux-amd64";

/// Length of the generated datastore secret.
pub const SECRET_LENGTH: usize = 48;

/// Cron hour for unattended updates.
pub const UPDATE_HOUR: u8 = 3;

/// Full line written to [`CRON_FILE`].
pub fn cron_entry() -> String {
    format!("0 {UPDATE_HOUR} * * * root {INSTALLED_BINARY} update --cron\n")
}
