//! Operator input for the install workflow.

use anyhow::{Context, Result};
use async_trait::async_trait;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input};

use crate::config::validate_domain;
use crate::core::ChiefError;

/// Source of the answers the install workflow needs.
#[async_trait]
pub trait Prompter: Send + Sync {
    /// Ask for the controller domain, offering `default` when one is stored.
    async fn domain(&self, default: Option<&str>) -> Result<String>;

    /// Ask whether the daily unattended update should be scheduled.
    async fn automatic_updates(&self, default: bool) -> Result<bool>;
}

/// Interactive prompts on the controlling terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

#[async_trait]
impl Prompter for TerminalPrompter {
    async fn domain(&self, default: Option<&str>) -> Result<String> {
        let default = default.filter(|d| !d.is_empty()).map(str::to_string);

        let answer = tokio::task::spawn_blocking(move || {
            let theme = ColorfulTheme::default();
            let mut input = Input::<String>::with_theme(&theme)
                .with_prompt("Domain for the Chief controller (e.g. hosting.yourdomain.com)")
                .validate_with(|input: &String| -> Result<(), String> {
                    validate_domain(input.trim()).map_err(|e| e.to_string())
                });
            if let Some(default) = default {
                input = input.default(default);
            }
            input.interact_text()
        })
        .await
        .context("Domain prompt task failed")?
        .map_err(|e| ChiefError::PromptError {
            reason: e.to_string(),
        })?;

        Ok(answer.trim().to_string())
    }

    async fn automatic_updates(&self, default: bool) -> Result<bool> {
        let answer = tokio::task::spawn_blocking(move || {
            let theme = ColorfulTheme::default();
            Confirm::with_theme(&theme)
                .with_prompt("Enable automatic updates? (daily at 03:00)")
                .default(default)
                .interact()
        })
        .await
        .context("Confirmation prompt task failed")?
        .map_err(|e| ChiefError::PromptError {
            reason: e.to_string(),
        })?;

        Ok(answer)
    }
}
