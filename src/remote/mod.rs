//! Remote version resolver and template source.
//!
//! The published state of Chief is a handful of plaintext objects:
//!
//! | What | URL |
//! |------|-----|
//! | Controller version token | `https://install.chiefdeploy.com/version` |
//! | CLI build identifier (SHA-256) | `https://install.chiefdeploy.com/version-cli` |
//! | Stack manifest template | `<assets>/stack.yml.template` |
//! | Proxy manifest template | `<assets>/Caddyfile.template` |
//! | CLI binary | `<assets>/chief-linux-amd64` |
//!
//! Tokens are opaque: trailing newlines are trimmed and nothing else is
//! interpreted. Any transport failure or non-success status becomes a
//! [`ChiefError::NetworkError`].

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use crate::constants::{ASSET_BASE_URL, CLI_BINARY_NAME, CLI_BUILD_URL, CONTROLLER_VERSION_URL};
use crate::core::ChiefError;
use crate::manifest::ManifestKind;

/// Where the published objects live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub controller_version_url: String,
    pub cli_build_url: String,
    pub asset_base_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            controller_version_url: CONTROLLER_VERSION_URL.to_string(),
            cli_build_url: CLI_BUILD_URL.to_string(),
            asset_base_url: ASSET_BASE_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Every object served from one origin, laid out as
    /// `/version`, `/version-cli` and `/<asset>`.
    pub fn from_origin(origin: &str) -> Self {
        let origin = origin.trim_end_matches('/');
        Self {
            controller_version_url: format!("{origin}/version"),
            cli_build_url: format!("{origin}/version-cli"),
            asset_base_url: origin.to_string(),
        }
    }

    #[must_use]
    pub fn template_url(&self, kind: ManifestKind) -> String {
        format!("{}/{}", self.asset_base_url, kind.template_name())
    }

    #[must_use]
    pub fn cli_binary_url(&self) -> String {
        format!("{}/{}", self.asset_base_url, CLI_BINARY_NAME)
    }
}

/// Read-only view of the published release state.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Latest controller version token.
    async fn controller_version(&self) -> Result<String>;

    /// Build identifier of the latest published CLI.
    async fn cli_build_id(&self) -> Result<String>;

    /// Raw template text for one manifest.
    async fn manifest_template(&self, kind: ManifestKind) -> Result<String>;
}

/// [`RemoteSource`] over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: reqwest::Client,
    endpoints: Endpoints,
}

impl HttpRemote {
    pub fn new(endpoints: Endpoints) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoints,
        }
    }

    async fn get_text(&self, url: &str, operation: &str) -> Result<String> {
        debug!("GET {}", url);
        let network_error = |reason: String| ChiefError::NetworkError {
            operation: operation.to_string(),
            reason,
        };

        let response =
            self.client.get(url).send().await.map_err(|e| network_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(network_error(format!("HTTP {status} from {url}")).into());
        }

        Ok(response.text().await.map_err(|e| network_error(e.to_string()))?)
    }
}

#[async_trait]
impl RemoteSource for HttpRemote {
    async fn controller_version(&self) -> Result<String> {
        let body = self
            .get_text(&self.endpoints.controller_version_url, "Unable to retrieve Chief version")
            .await?;
        Ok(trim_token(&body))
    }

    async fn cli_build_id(&self) -> Result<String> {
        let body = self
            .get_text(&self.endpoints.cli_build_url, "Unable to retrieve Chief CLI version")
            .await?;
        Ok(trim_token(&body))
    }

    async fn manifest_template(&self, kind: ManifestKind) -> Result<String> {
        let operation = format!("Error downloading {}", kind.file_name());
        self.get_text(&self.endpoints.template_url(kind), &operation).await
    }
}

/// Strip trailing line terminators from a plaintext token.
#[must_use]
pub fn trim_token(body: &str) -> String {
    body.trim_end_matches(['\n', '\r']).to_string()
}
