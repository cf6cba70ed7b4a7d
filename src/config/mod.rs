//! Configuration for vend.
//!
//! Two layers feed a build:
//!
//! | Layer | File | Purpose |
//! |-------|------|---------|
//! | Global | `~/.vend/config.toml` | Install repository, toolchain, walk policies |
//! | Project | `vend.toml` | Target import path and pinned versions (see [`crate::manifest`]) |
//!
//! The global layer is loaded into a [`GlobalConfig`] and then resolved into a
//! [`BuildSettings`], which is passed explicitly to every component that needs it.

mod global;

pub use global::{CONFIG_PATH_ENV, GlobalConfig};

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::utils::platform::resolve_path;

/// Policy for a transitively discovered package whose download fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadFailurePolicy {
    /// Log the failure and keep walking; the missing sources surface later.
    #[default]
    Warn,
    /// Stop the walk with the failing import path.
    Abort,
}

/// Policy for re-entering an import that is still being resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CyclePolicy {
    /// Reject the cycle with the import chain.
    #[default]
    Error,
    /// Treat the repeated entry as already resolved.
    Skip,
}

/// Fully resolved settings for one build invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSettings {
    /// Absolute install-repository root.
    pub install_repo: PathBuf,
    /// Toolchain program.
    pub toolchain: String,
    /// Module-search environment variable.
    pub search_path_var: String,
    /// Vendor tree directory name under the project.
    pub vendor_dir: String,
    /// Download failure policy.
    pub on_download_failure: DownloadFailurePolicy,
    /// Cycle policy.
    pub on_cycle: CyclePolicy,
    /// Per-invocation git timeout.
    pub git_timeout: Option<Duration>,
}

impl BuildSettings {
    /// Resolve a [`GlobalConfig`], expanding the install repository placeholder.
    ///
    /// # Errors
    ///
    /// Returns an error if `install_repo` cannot be expanded.
    pub fn from_global(config: &GlobalConfig) -> Result<Self> {
        let install_repo = resolve_path(&config.install_repo).with_context(|| {
            format!("Failed to resolve install repository path '{}'", config.install_repo)
        })?;

        Ok(Self {
            install_repo,
            toolchain: config.toolchain.clone(),
            search_path_var: config.search_path_var.clone(),
            vendor_dir: config.vendor_dir.clone(),
            on_download_failure: config.on_download_failure,
            on_cycle: config.on_cycle,
            git_timeout: config.git_timeout_secs.map(Duration::from_secs),
        })
    }

    /// Settings for an explicit install repository with every other field at its default.
    #[must_use]
    pub fn with_install_repo(install_repo: impl Into<PathBuf>) -> Self {
        let defaults = GlobalConfig::default();
        Self {
            install_repo: install_repo.into(),
            toolchain: defaults.toolchain,
            search_path_var: defaults.search_path_var,
            vendor_dir: defaults.vendor_dir,
            on_download_failure: defaults.on_download_failure,
            on_cycle: defaults.on_cycle,
            git_timeout: None,
        }
    }
}
