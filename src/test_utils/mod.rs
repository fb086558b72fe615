//! Test utilities for the Chief CLI
//!
//! Recording and scripted stand-ins for every collaborator the workflows
//! talk to, so install and update sequences can be asserted without docker,
//! a network, a terminal or a real executable:
//!
//! - [`RecordingRunner`]: a [`CommandRunner`](crate::process::CommandRunner)
//!   that logs every command line and answers from prefix rules
//! - [`StubRemote`]: a [`RemoteSource`](crate::remote::RemoteSource) with
//!   fixed tokens, canned templates and call counters
//! - [`ScriptedPrompter`]: a [`Prompter`](crate::workflow::Prompter) with
//!   fixed answers
//! - [`FakeUpdater`]: a [`BinaryUpdater`](crate::upgrade::BinaryUpdater)
//!   that only records replacement requests
//!
//! # Example
//!
//! ```rust,no_run
//! use chief_cli::process::CommandOutput;
//! use chief_cli::test_utils::RecordingRunner;
//!
//! let runner = RecordingRunner::new()
//!     .fail("docker stack ps", "nothing found in stack: chief")
//!     .respond("docker info", CommandOutput::ok("active\n"));
//! ```

pub mod fakes;
pub mod remote;
pub mod runner;

pub use fakes::{FakeUpdater, ScriptedPrompter};
pub use remote::StubRemote;
pub use runner::RecordingRunner;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Initialise tracing for tests, once per process.
///
/// Uses `level` when given, otherwise `RUST_LOG`; with neither, tests run
/// without a subscriber.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
