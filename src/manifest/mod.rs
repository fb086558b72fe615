//! Deployment manifests: download, substitute, write.
//!
//! Two documents describe a running controller: the swarm stack definition
//! and the Caddy reverse-proxy configuration. Both are published as templates
//! with shell-style placeholders and are regenerated in full on every install
//! and update; nothing is diffed or patched.
//!
//! | Manifest | Template | Placeholders |
//! |----------|----------|--------------|
//! | `stack.yml` | `stack.yml.template` | `DOMAIN`, `PASSWORD`, `CHIEF_VERSION` |
//! | `Caddyfile` | `Caddyfile.template` | `DOMAIN` |
//!
//! Both `$NAME` and `${NAME}` forms are substituted. Placeholders naming any
//! other variable are left exactly as written.

use anyhow::Result;
use regex::{Captures, Regex};
use std::sync::LazyLock;
use tracing::{debug, info};

use crate::config::Paths;
use crate::remote::RemoteSource;
use crate::utils::fs::atomic_write;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)")
        .expect("placeholder pattern is valid")
});

/// One of the two managed manifests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManifestKind {
    /// Swarm stack definition.
    Stack,
    /// Reverse-proxy definition.
    Proxy,
}

impl ManifestKind {
    pub const ALL: [Self; 2] = [Self::Stack, Self::Proxy];

    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Stack => crate::constants::STACK_MANIFEST_NAME,
            Self::Proxy => crate::constants::PROXY_MANIFEST_NAME,
        }
    }

    #[must_use]
    pub const fn template_name(self) -> &'static str {
        match self {
            Self::Stack => "stack.yml.template",
            Self::Proxy => "Caddyfile.template",
        }
    }
}

/// Runtime values substituted into the templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestValues {
    pub domain: String,
    pub secret: String,
    pub version: String,
}

impl ManifestValues {
    /// Variables visible to the given manifest's template.
    #[must_use]
    pub fn variables(&self, kind: ManifestKind) -> Vec<(&'static str, &str)> {
        match kind {
            ManifestKind::Stack => vec![
                ("DOMAIN", self.domain.as_str()),
                ("PASSWORD", self.secret.as_str()),
                ("CHIEF_VERSION", self.version.as_str()),
            ],
            ManifestKind::Proxy => vec![("DOMAIN", self.domain.as_str())],
        }
    }
}

/// Substitute `vars` into `template`.
#[must_use]
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            let name = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
            vars.iter()
                .find(|(key, _)| *key == name)
                .map_or_else(|| caps[0].to_string(), |(_, value)| (*value).to_string())
        })
        .into_owned()
}

/// Fetch, render and write one manifest into the base directory.
///
/// Nothing is written when the template cannot be fetched.
pub async fn materialize(
    remote: &dyn RemoteSource,
    paths: &Paths,
    values: &ManifestValues,
    kind: ManifestKind,
) -> Result<()> {
    let template = remote.manifest_template(kind).await?;
    let rendered = render(&template, &values.variables(kind));
    let target = paths.manifest(kind);

    debug!("Writing {} ({} bytes)", target.display(), rendered.len());
    atomic_write(&target, rendered.as_bytes())?;
    info!("Materialized {}", kind.file_name());
    Ok(())
}
