//! Per-directory manifest (`vend.toml`) access.
//!
//! A manifest is optional. When present it may declare the project's own
//! canonical import path and pin the versions of direct dependencies:
//!
//! ```toml
//! [target]
//! path = "example.com/app"
//!
//! [build]
//! "example.com/lib/net" = "tag:v1.2.0"
//! "example.com/lib/log" = "branch:develop"
//! "example.com/lib/fmt" = "commit:1a2b3c"
//! "example.com/lib/any" = ""   # latest
//! ```
//!
//! Pins apply only to imports of the directory whose manifest declares them;
//! packages discovered further down the graph fall back to the latest selector.
//!
//! The resolver reads manifests through the [`ManifestSource`] trait so tests can
//! substitute an in-memory source.

use anyhow::Result;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::core::VendError;
use crate::models::{VersionSelector, parse_selector};

/// Manifest file name looked up in every resolved directory.
pub const MANIFEST_FILE_NAME: &str = "vend.toml";

#[derive(Debug, Default, Deserialize)]
struct RawManifest {
    #[serde(default)]
    target: Option<RawTarget>,
    #[serde(default)]
    build: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawTarget {
    #[serde(default)]
    path: String,
}

/// A parsed, validated manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    target: Option<String>,
    build: Option<BTreeMap<String, VersionSelector>>,
}

impl Manifest {
    /// Parse manifest text. `file` is used only for error messages.
    ///
    /// # Errors
    ///
    /// Returns [`VendError::ManifestParseError`] for invalid TOML and
    /// [`VendError::InvalidVersionSelector`] for a malformed pin.
    pub fn parse(content: &str, file: &str) -> Result<Self, VendError> {
        let raw: RawManifest =
            toml::from_str(content).map_err(|e| VendError::ManifestParseError {
                file: file.to_string(),
                reason: e.message().to_string(),
            })?;

        let build = match raw.build {
            Some(pins) => {
                let mut parsed = BTreeMap::new();
                for (import_path, text) in pins {
                    let selector = parse_selector(&import_path, &text)?;
                    parsed.insert(import_path, selector);
                }
                Some(parsed)
            }
            None => None,
        };

        let target = raw.target.map(|t| t.path.trim().to_string()).filter(|p| !p.is_empty());

        Ok(Self {
            target,
            build,
        })
    }

    /// Read and parse a manifest file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, otherwise as [`Manifest::parse`].
    pub fn load(path: &Path) -> Result<Self, VendError> {
        let content = std::fs::read_to_string(path).map_err(|e| VendError::ManifestParseError {
            file: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    /// The declared canonical import path of the project, if any.
    #[must_use]
    pub fn target_path(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// The `[build]` pins, or `None` when the section is absent.
    #[must_use]
    pub const fn build_pins(&self) -> Option<&BTreeMap<String, VersionSelector>> {
        self.build.as_ref()
    }

    /// Builder-style target declaration.
    #[must_use]
    pub fn with_target(mut self, path: impl Into<String>) -> Self {
        self.target = Some(path.into());
        self
    }

    /// Builder-style pin declaration.
    #[must_use]
    pub fn with_pin(mut self, import_path: impl Into<String>, selector: VersionSelector) -> Self {
        self.build.get_or_insert_with(BTreeMap::new).insert(import_path.into(), selector);
        self
    }
}

/// Yields the manifest declared for a directory, if any.
pub trait ManifestSource {
    /// Load the manifest of `dir`. Absence is `Ok(None)`, never an error.
    fn load(&self, dir: &Path) -> Result<Option<Manifest>>;
}

/// Reads `vend.toml` from the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsManifestSource;

impl ManifestSource for FsManifestSource {
    fn load(&self, dir: &Path) -> Result<Option<Manifest>> {
        let path = dir.join(MANIFEST_FILE_NAME);
        if !path.is_file() {
            return Ok(None);
        }
        tracing::debug!("Loading manifest {}", path.display());
        Ok(Some(Manifest::load(&path)?))
    }
}
