//! Test utilities shared by unit and integration tests
//!
//! Compiled for `cfg(test)` and for the `test-utils` feature, which the
//! integration suites enable through the self dev-dependency.

pub mod fixtures;
pub mod git_helper;

pub use fixtures::{LinkFixture, write_package_json};
pub use git_helper::TestGit;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// `level` applies to this crate's modules and log targets; otherwise
/// `RUST_LOG` decides. With neither, tests run silently.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(crate::constants::log_directives(&level.to_string().to_lowercase()))
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
