//! Spinners for long-running workflow steps
//!
//! Thin wrapper over `indicatif` so every step renders the same way and so
//! spinners can be switched off wholesale. A spinner is hidden when:
//!
//! - the update runs unattended (`chief update --cron`)
//! - `--no-progress` was passed
//! - `CHIEF_NO_PROGRESS` is set in the environment
//!
//! Hidden spinners still accept every call, so callers never branch on
//! visibility.

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle as IndicatifStyle};
use std::time::Duration;

const TICK_STRINGS: &[&str] =
    &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"];

fn is_progress_disabled() -> bool {
    std::env::var("CHIEF_NO_PROGRESS").is_ok()
}

/// A single indeterminate spinner.
#[derive(Clone)]
pub struct Spinner {
    inner: IndicatifBar,
}

impl Spinner {
    /// Start a visible spinner unless progress output is disabled.
    pub fn new(message: impl Into<String>, hidden: bool) -> Self {
        let bar = if hidden || is_progress_disabled() {
            IndicatifBar::hidden()
        } else {
            let bar = IndicatifBar::new_spinner();
            bar.set_style(spinner_style());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        };
        bar.set_message(message.into());
        Self {
            inner: bar,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.inner.is_hidden()
    }

    /// Stop with a check mark and a final message.
    pub fn finish_success(&self, msg: &str) {
        self.inner.set_style(finished_style());
        self.inner.finish_with_message(format!("✓ {msg}"));
    }

    /// Stop with a cross and a final message.
    pub fn finish_error(&self, msg: &str) {
        self.inner.set_style(finished_style());
        self.inner.finish_with_message(format!("✗ {msg}"));
    }
}

fn spinner_style() -> IndicatifStyle {
    IndicatifStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| IndicatifStyle::default_spinner())
        .tick_strings(TICK_STRINGS)
}

fn finished_style() -> IndicatifStyle {
    IndicatifStyle::default_spinner()
        .template("  {msg}")
        .unwrap_or_else(|_| IndicatifStyle::default_spinner())
}
