use anyhow::{Result, bail};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::upgrade::BinaryUpdater;
use crate::workflow::Prompter;

/// Prompter with fixed answers that remembers what it was offered.
#[derive(Debug)]
pub struct ScriptedPrompter {
    domain: String,
    automatic_updates: bool,
    asked: AtomicBool,
    offered_default: Mutex<Option<String>>,
}

impl ScriptedPrompter {
    pub fn new(domain: &str, automatic_updates: bool) -> Self {
        Self {
            domain: domain.to_string(),
            automatic_updates,
            asked: AtomicBool::new(false),
            offered_default: Mutex::new(None),
        }
    }

    pub fn was_asked(&self) -> bool {
        self.asked.load(Ordering::SeqCst)
    }

    /// Default passed to the domain prompt, if any.
    pub fn offered_default(&self) -> Option<String> {
        self.offered_default.lock().ok().and_then(|d| d.clone())
    }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
    async fn domain(&self, default: Option<&str>) -> Result<String> {
        self.asked.store(true, Ordering::SeqCst);
        if let Ok(mut offered) = self.offered_default.lock() {
            *offered = default.map(str::to_string);
        }
        Ok(self.domain.clone())
    }

    async fn automatic_updates(&self, _default: bool) -> Result<bool> {
        self.asked.store(true, Ordering::SeqCst);
        Ok(self.automatic_updates)
    }
}

/// Binary updater that reports a fixed build and records replacements.
#[derive(Debug)]
pub struct FakeUpdater {
    build_id: String,
    fail: bool,
    replaced: Mutex<Vec<String>>,
}

impl FakeUpdater {
    pub fn new(build_id: &str) -> Self {
        Self {
            build_id: build_id.to_string(),
            fail: false,
            replaced: Mutex::new(Vec::new()),
        }
    }

    /// Replacement attempts fail.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Build ids passed to [`BinaryUpdater::replace`], in order.
    pub fn replaced_with(&self) -> Vec<String> {
        self.replaced.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl BinaryUpdater for FakeUpdater {
    async fn current_build_id(&self) -> Result<String> {
        Ok(self.build_id.clone())
    }

    async fn replace(&self, expected_build_id: &str) -> Result<()> {
        if let Ok(mut replaced) = self.replaced.lock() {
            replaced.push(expected_build_id.to_string());
        }
        if self.fail {
            bail!("simulated replacement failure");
        }
        Ok(())
    }
}
