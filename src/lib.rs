//! vend - vendoring build driver
//!
//! vend resolves a project's transitive import-path dependencies, fetches missing
//! packages into a shared install repository, links exactly the needed sources into
//! a disposable vendor tree and runs the toolchain with its search path pointed at
//! that tree.
//!
//! # Architecture Overview
//!
//! Data flows in one direction:
//!
//! ```text
//! manifest + scanner -> resolver (walk) -> PackageCache -> vendor tree -> toolchain
//! ```
//!
//! - A directory's direct dependencies come from its imports ([`scanner`]) with
//!   versions pinned by its `vend.toml` ([`manifest`]).
//! - [`resolver::DependencyWalker`] applies that transitively, downloading what is
//!   missing ([`download`]) and caching every external package once, in postorder.
//! - [`vendor::VendorTreeBuilder`] turns the cache into a minimal symlink forest at
//!   `<project>/vendor/src`, skipping packages nested under another cached package
//!   or under the project's own target path.
//! - [`build::Orchestrator`] runs the toolchain with the search-path variable
//!   scoped to the vendor tree and restores it afterwards.
//!
//! # Core Modules
//!
//! - [`build`] - Pipeline orchestration, search-path guard and toolchain invocation
//! - [`cli`] - Command-line interface (`vend build`, `vend vendor`)
//! - [`config`] - Global configuration (`~/.vend/config.toml`) and build settings
//! - [`core`] - Error types and user-facing error formatting
//! - [`resolver`] - Per-directory resolution, the graph walk and the package cache
//! - [`vendor`] - Vendor tree construction
//!
//! ## Collaborators
//!
//! - [`manifest`] - `vend.toml` parsing (target path and pinned versions)
//! - [`scanner`] - Import extraction from source files
//! - [`download`] - Fetching packages into the install repository
//! - [`git`] - Git command builder used by the downloader
//!
//! ## Supporting Modules
//!
//! - [`models`] - Package descriptors and version selectors
//! - [`utils`] - Path expansion, import-path mapping and directory links
//!
//! # Manifest Format (vend.toml)
//!
//! ```toml
//! [target]
//! path = "example.com/app"
//!
//! [build]
//! "example.com/lib/net" = "tag:v1.2.0"
//! "example.com/lib/log" = "branch:develop"
//! "example.com/lib/any" = ""
//! ```
//!
//! # Command-Line Usage
//!
//! ```bash
//! vend build
//! vend build --strict -- -o bin/app
//! vend --verbose vendor
//! ```

// Core functionality modules
pub mod build;
pub mod cli;
pub mod config;
pub mod core;
pub mod resolver;
pub mod vendor;

// Collaborators
pub mod download;
pub mod git;
pub mod manifest;
pub mod scanner;

// Supporting modules
pub mod models;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
