//! Integration test suite for the Chief CLI
//!
//! End-to-end checks of the binary surface and of the workflows wired to the
//! real HTTP resolver and self-updater. Docker is never invoked: workflows
//! run against `test_utils::RecordingRunner`, and HTTP is served by mockito.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **cli**: argument parsing, help output and the privilege gate
//! - **remote**: version tokens and templates over HTTP
//! - **upgrade**: checksum-verified binary replacement
//! - **workflows**: install followed by updates, against a mock release host

mod cli;
mod remote;
mod upgrade;
mod workflows;
