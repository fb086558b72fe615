use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::core::ChiefError;
use crate::manifest::ManifestKind;
use crate::remote::RemoteSource;

/// Templates that exercise every placeholder a real release uses.
const STACK_TEMPLATE: &str = "\
version: '3.8'
services:
  controller:
    image: ghcr.io/chiefdeploy/controller:${CHIEF_VERSION}
    environment:
      DOMAIN: ${DOMAIN}
      DATABASE_PASSWORD: ${PASSWORD}
";

const PROXY_TEMPLATE: &str = "\
${DOMAIN} {
  reverse_proxy controller:3000
}
";

/// Fixed release state with call counters.
#[derive(Debug)]
pub struct StubRemote {
    controller_version: String,
    cli_build_id: String,
    templates: HashMap<ManifestKind, String>,
    unreachable: bool,
    version_calls: AtomicUsize,
    build_calls: AtomicUsize,
    template_calls: AtomicUsize,
}

impl StubRemote {
    pub fn new(controller_version: &str, cli_build_id: &str) -> Self {
        let templates = HashMap::from([
            (ManifestKind::Stack, STACK_TEMPLATE.to_string()),
            (ManifestKind::Proxy, PROXY_TEMPLATE.to_string()),
        ]);
        Self {
            controller_version: controller_version.to_string(),
            cli_build_id: cli_build_id.to_string(),
            templates,
            unreachable: false,
            version_calls: AtomicUsize::new(0),
            build_calls: AtomicUsize::new(0),
            template_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_template(mut self, kind: ManifestKind, template: &str) -> Self {
        self.templates.insert(kind, template.to_string());
        self
    }

    /// The template for `kind` is not published; version lookups still work.
    pub fn without_template(mut self, kind: ManifestKind) -> Self {
        self.templates.remove(&kind);
        self
    }

    /// Every lookup fails with a network error.
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    pub fn version_calls(&self) -> usize {
        self.version_calls.load(Ordering::SeqCst)
    }

    pub fn build_calls(&self) -> usize {
        self.build_calls.load(Ordering::SeqCst)
    }

    pub fn template_calls(&self) -> usize {
        self.template_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.version_calls() + self.build_calls() + self.template_calls()
    }

    fn check_reachable(&self, operation: &str) -> Result<()> {
        if self.unreachable {
            return Err(ChiefError::NetworkError {
                operation: operation.to_string(),
                reason: "connection refused".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteSource for StubRemote {
    async fn controller_version(&self) -> Result<String> {
        self.version_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reachable("Unable to retrieve Chief version")?;
        Ok(self.controller_version.clone())
    }

    async fn cli_build_id(&self) -> Result<String> {
        self.build_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reachable("Unable to retrieve Chief CLI version")?;
        Ok(self.cli_build_id.clone())
    }

    async fn manifest_template(&self, kind: ManifestKind) -> Result<String> {
        self.template_calls.fetch_add(1, Ordering::SeqCst);
        let operation = format!("Error downloading {}", kind.file_name());
        self.check_reachable(&operation)?;
        self.templates.get(&kind).cloned().ok_or_else(|| {
            ChiefError::NetworkError {
                operation,
                reason: format!("HTTP 404 Not Found for {}", kind.template_name()),
            }
            .into()
        })
    }
}
