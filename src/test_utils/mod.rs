//! Test utilities for relfetch
//!
//! This module provides shared helpers for unit and integration tests:
//!
//! - [`init_test_logging`] - route `tracing` output to the test harness
//! - [`fixtures`] - in-memory release archives
//! - [`server`] - an in-process HTTP server standing in for the checkpoint and
//!   release endpoints
//!
//! Available to integration tests through the `test-utils` feature.

pub mod fixtures;
pub mod server;

pub use fixtures::release_zip;
pub use server::{ReleaseServer, StubResponse};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Initializes the tracing subscriber once, no matter how many tests call it.
/// With `level` set, that level is used; otherwise `RUST_LOG` is honoured, and
/// without either nothing is logged.
///
/// ```bash
/// RUST_LOG=relfetch=debug cargo test
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
            .try_init();
    });
}
