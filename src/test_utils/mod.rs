//! Test utilities for vend
//!
//! In-memory stand-ins for the external collaborators of the resolver, plus a
//! [`TestProject`] that lays out a real project and install repository in a
//! temporary directory.
//!
//! # Example
//!
//! ```rust,no_run
//! use vend::test_utils::{MemoryManifests, MemoryScanner, RecordingDownloader};
//!
//! let scanner = MemoryScanner::new()
//!     .package("/project", ["example.com/lib"])
//!     .package("/repos/example.com/lib", ["fmt"]);
//! let manifests = MemoryManifests::new();
//! let downloader = RecordingDownloader::new().missing("example.com/lib");
//! ```

mod fakes;
mod project;

pub use fakes::{MemoryManifests, MemoryScanner, RecordingDownloader};
pub use project::{TestProject, go_source};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. With `level` set that level is used;
/// otherwise `RUST_LOG` is honored, and without either logging stays off.
///
/// ```bash
/// RUST_LOG=vend=debug cargo test
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
