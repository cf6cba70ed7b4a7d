//! Build orchestration.
//!
//! [`Orchestrator`] runs the whole pipeline for one project:
//!
//! 1. read the project's manifest for its target path
//! 2. walk the import graph into a [`PackageCache`]
//! 3. rebuild the vendor tree from the cache
//! 4. point the search-path variable at the vendor tree and run the toolchain
//!
//! Step 4 holds a [`SearchPathGuard`], so the caller's environment is restored
//! whether the toolchain succeeds or not.

mod guard;
mod toolchain;

pub use guard::SearchPathGuard;
pub use toolchain::Toolchain;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::BuildSettings;
use crate::download::Downloader;
use crate::manifest::ManifestSource;
use crate::resolver::{DependencyWalker, PackageCache};
use crate::scanner::ImportScanner;
use crate::vendor::{VendorReport, VendorTreeBuilder};

/// Result of resolving and vendoring a project.
#[derive(Debug, Clone)]
pub struct Prepared {
    /// Every non-local transitive dependency.
    pub cache: PackageCache,
    /// What the vendor tree builder did.
    pub report: VendorReport,
    /// The vendor directory, used as the toolchain search root.
    pub vendor_dir: PathBuf,
    /// Import paths downloaded during the walk.
    pub downloads: Vec<String>,
}

/// Runs resolution, vendoring and the toolchain for one project.
pub struct Orchestrator<'a, M, S, D> {
    settings: &'a BuildSettings,
    manifests: &'a M,
    scanner: &'a S,
    downloader: &'a D,
    project_dir: PathBuf,
}

impl<'a, M, S, D> Orchestrator<'a, M, S, D>
where
    M: ManifestSource,
    S: ImportScanner,
    D: Downloader,
{
    /// An orchestrator for the project at `project_dir`.
    pub fn new(
        settings: &'a BuildSettings,
        manifests: &'a M,
        scanner: &'a S,
        downloader: &'a D,
        project_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            settings,
            manifests,
            scanner,
            downloader,
            project_dir: project_dir.into(),
        }
    }

    /// Resolve the project and rebuild its vendor tree.
    ///
    /// # Errors
    ///
    /// Returns the first manifest, scan, download (under the abort policy), cycle or
    /// vendor tree error.
    pub async fn vendor(&self) -> Result<Prepared> {
        let manifest = self
            .manifests
            .load(&self.project_dir)
            .with_context(|| format!("Failed to load manifest in {}", self.project_dir.display()))?;
        let target = manifest.as_ref().and_then(|m| m.target_path()).map(str::to_string);
        tracing::debug!("Project target: {}", target.as_deref().unwrap_or("<none>"));

        let mut cache = PackageCache::new();
        let mut walker = DependencyWalker::new(
            self.manifests,
            self.scanner,
            self.downloader,
            self.settings,
            self.project_dir.clone(),
            target.clone(),
        );
        walker.walk_into(&mut cache).await?;
        let downloads = walker.downloads().to_vec();

        let builder = VendorTreeBuilder::new(
            &self.settings.install_repo,
            &self.project_dir,
            &self.settings.vendor_dir,
        )
        .with_target(target);
        let report = builder.build(&cache)?;

        Ok(Prepared {
            cache,
            report,
            vendor_dir: builder.vendor_dir().to_path_buf(),
            downloads,
        })
    }

    /// Run `toolchain` in the project directory with the search path pointing at
    /// `vendor_dir`.
    ///
    /// # Errors
    ///
    /// Returns the toolchain's failure. The search-path variable is restored either
    /// way.
    pub async fn run_toolchain(
        &self,
        toolchain: &Toolchain,
        vendor_dir: &Path,
        args: &[String],
    ) -> Result<()> {
        let _guard = SearchPathGuard::acquire(&self.settings.search_path_var, vendor_dir);
        toolchain.build(&self.project_dir, args).await
    }
}
