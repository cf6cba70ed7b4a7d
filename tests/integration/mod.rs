//! Integration test suite for vend
//!
//! End-to-end tests over real project and install-repository trees in temporary
//! directories. Downloads are served by the in-memory downloader from
//! `vend::test_utils`, so no test touches the network.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **resolve**: Graph walk over real sources and manifests
//! - **vendor_tree**: Vendor tree layout produced by the pipeline
//! - **cli**: The `vend` binary, including toolchain invocation

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod cli;
mod resolve;
mod vendor_tree;
