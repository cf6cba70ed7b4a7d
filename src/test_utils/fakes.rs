//! In-memory collaborators.

use anyhow::Result;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::core::VendError;
use crate::download::Downloader;
use crate::manifest::{Manifest, ManifestSource};
use crate::models::PackageDescriptor;
use crate::scanner::ImportScanner;
use crate::utils::import_path_under;

/// Import scanner over a fixed directory → imports table.
///
/// Scanning a directory that was never registered fails like a missing package
/// directory does.
#[derive(Debug, Clone, Default)]
pub struct MemoryScanner {
    packages: BTreeMap<PathBuf, BTreeSet<String>>,
}

impl MemoryScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `dir` as a package importing `imports`.
    #[must_use]
    pub fn package<I, S>(mut self, dir: impl Into<PathBuf>, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.packages.insert(dir.into(), imports.into_iter().map(Into::into).collect());
        self
    }
}

impl ImportScanner for MemoryScanner {
    fn scan(&self, dir: &Path) -> Result<BTreeSet<String>> {
        self.packages.get(dir).cloned().ok_or_else(|| {
            VendError::ImportScanFailed {
                dir: dir.display().to_string(),
                reason: "no such package".to_string(),
            }
            .into()
        })
    }
}

/// Manifest source over a fixed directory → manifest table.
#[derive(Debug, Clone, Default)]
pub struct MemoryManifests {
    manifests: BTreeMap<PathBuf, Manifest>,
}

impl MemoryManifests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `manifest` to `dir`.
    #[must_use]
    pub fn manifest(mut self, dir: impl Into<PathBuf>, manifest: Manifest) -> Self {
        self.manifests.insert(dir.into(), manifest);
        self
    }
}

impl ManifestSource for MemoryManifests {
    fn load(&self, dir: &Path) -> Result<Option<Manifest>> {
        Ok(self.manifests.get(dir).cloned())
    }
}

/// Downloader that records requests instead of fetching anything.
///
/// Every package counts as installed unless marked [`missing`](Self::missing). A
/// successful download clears the mark and writes any files registered with
/// [`serving`](Self::serving) into the install repository.
#[derive(Debug, Default)]
pub struct RecordingDownloader {
    missing: Mutex<BTreeSet<String>>,
    failing: BTreeSet<String>,
    files: BTreeMap<String, Vec<(String, String)>>,
    requests: Mutex<Vec<PackageDescriptor>>,
}

impl RecordingDownloader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat `import_path` as absent from the install repository.
    #[must_use]
    pub fn missing(self, import_path: &str) -> Self {
        self.missing.lock().unwrap().insert(import_path.to_string());
        self
    }

    /// Fail every download of `import_path`.
    #[must_use]
    pub fn failing(mut self, import_path: &str) -> Self {
        self.failing.insert(import_path.to_string());
        self
    }

    /// Write `name` with `content` into the package directory when `import_path` is
    /// downloaded.
    #[must_use]
    pub fn serving(mut self, import_path: &str, name: &str, content: &str) -> Self {
        self.files
            .entry(import_path.to_string())
            .or_default()
            .push((name.to_string(), content.to_string()));
        self
    }

    /// Download requests received so far, in order.
    pub fn requests(&self) -> Vec<PackageDescriptor> {
        self.requests.lock().unwrap().clone()
    }
}

impl Downloader for RecordingDownloader {
    fn is_installed(&self, package: &PackageDescriptor, _install_repo: &Path) -> bool {
        !self.missing.lock().unwrap().contains(&package.import_path)
    }

    async fn download(&self, package: &PackageDescriptor, install_repo: &Path) -> Result<()> {
        self.requests.lock().unwrap().push(package.clone());

        if self.failing.contains(&package.import_path) {
            return Err(VendError::DownloadFailed {
                import_path: package.import_path.clone(),
                reason: "simulated failure".to_string(),
            }
            .into());
        }

        if let Some(files) = self.files.get(&package.import_path) {
            let dir = import_path_under(install_repo, &package.import_path);
            std::fs::create_dir_all(&dir)?;
            for (name, content) in files {
                std::fs::write(dir.join(name), content)?;
            }
        }
        self.missing.lock().unwrap().remove(&package.import_path);
        Ok(())
    }
}
