//! Global configuration management for vend.
//!
//! The global configuration file (`~/.vend/config.toml`) stores user-wide settings:
//! where downloaded packages live, which toolchain to drive, and how strict the
//! dependency walk should be.
//!
//! # Configuration File Location
//!
//! - **Unix/macOS**: `~/.vend/config.toml`
//! - **Windows**: `%LOCALAPPDATA%\vend\config.toml`
//!
//! The location can be overridden using the `VEND_CONFIG_PATH` environment variable.
//!
//! # File Format
//!
//! ```toml
//! # Shared store of downloaded package sources, addressed by import path
//! install_repo = "~/.vend/repos"
//!
//! # Program invoked as `<toolchain> build ...` against the vendor tree
//! toolchain = "go"
//!
//! # Environment variable pointed at the vendor tree during the build
//! search_path_var = "GOPATH"
//!
//! # Vendor tree directory, relative to the project
//! vendor_dir = "vendor"
//!
//! # "warn" keeps walking after a failed download, "abort" stops immediately
//! on_download_failure = "warn"
//!
//! # "error" rejects import cycles, "skip" treats the repeated entry as resolved
//! on_cycle = "error"
//!
//! # Optional timeout for a single git invocation of the downloader
//! git_timeout_secs = 300
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::{CyclePolicy, DownloadFailurePolicy};
use crate::core::VendError;

/// Environment variable overriding the global config location.
pub const CONFIG_PATH_ENV: &str = "VEND_CONFIG_PATH";

fn default_install_repo() -> String {
    "~/.vend/repos".to_string()
}

fn default_toolchain() -> String {
    "go".to_string()
}

fn default_search_path_var() -> String {
    "GOPATH".to_string()
}

fn default_vendor_dir() -> String {
    "vendor".to_string()
}

/// Global configuration structure.
///
/// Every field has a default so a missing or partial file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GlobalConfig {
    /// Install-repository root; `~` expands to the home directory.
    #[serde(default = "default_install_repo")]
    pub install_repo: String,

    /// Toolchain program driven by `vend build`.
    #[serde(default = "default_toolchain")]
    pub toolchain: String,

    /// Module-search environment variable swapped during the build.
    #[serde(default = "default_search_path_var")]
    pub search_path_var: String,

    /// Vendor tree directory name under the project.
    #[serde(default = "default_vendor_dir")]
    pub vendor_dir: String,

    /// What to do when a transitively discovered package fails to download.
    #[serde(default)]
    pub on_download_failure: DownloadFailurePolicy,

    /// What to do when the walk re-enters a package still being resolved.
    #[serde(default)]
    pub on_cycle: CyclePolicy,

    /// Timeout in seconds for a single downloader git invocation.
    #[serde(default)]
    pub git_timeout_secs: Option<u64>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            install_repo: default_install_repo(),
            toolchain: default_toolchain(),
            search_path_var: default_search_path_var(),
            vendor_dir: default_vendor_dir(),
            on_download_failure: DownloadFailurePolicy::default(),
            on_cycle: CyclePolicy::default(),
            git_timeout_secs: None,
        }
    }
}

impl GlobalConfig {
    /// Load from `path` if given, else from the default location.
    ///
    /// A path that does not exist yields the default configuration.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => Self::default_path()?,
        };
        if path.exists() {
            Self::load_from(&path).await
        } else {
            tracing::debug!("No global config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load the global configuration from a specific file path.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read global config from {}", path.display()))?;

        toml::from_str(&content).map_err(|e| {
            VendError::ConfigError {
                message: format!("{}: {}", path.display(), e.message().trim()),
            }
            .into()
        })
    }

    /// Get the default file path for the global configuration.
    ///
    /// `VEND_CONFIG_PATH` takes precedence over the platform location.
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("vend")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".vend")
        };

        Ok(config_dir.join("config.toml"))
    }
}
