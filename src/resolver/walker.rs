//! Transitive dependency walk.
//!
//! The walk is a depth-first traversal starting at the project directory. Each
//! visited directory is resolved with [`resolve_packages`]; every import not yet in
//! the [`PackageCache`] is located (downloading it if it is missing from the install
//! repository) and visited in turn. A package is inserted into the cache only after
//! all of its own imports have been visited, so the cache is filled in postorder.
//!
//! Every walk key carries a [`VisitState`]. Re-entering a key that is still
//! [`VisitState::InProgress`] means the import graph has a cycle; what happens then
//! is decided by [`CyclePolicy`].

use anyhow::{Context, Result};
use futures::FutureExt;
use futures::future::LocalBoxFuture;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{PackageCache, resolve_packages};
use crate::config::{BuildSettings, CyclePolicy, DownloadFailurePolicy};
use crate::core::VendError;
use crate::download::Downloader;
use crate::manifest::ManifestSource;
use crate::models::PackageDescriptor;
use crate::scanner::{ImportScanner, is_local_import};
use crate::utils::{import_path_under, normalize_path};

/// Visit state of one walk key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitState {
    /// Key has not been visited.
    Unvisited,
    /// Key is on the current walk path.
    InProgress,
    /// Key and everything below it has been visited.
    Done,
}

// Remote packages are identified by import path, local ones by directory since
// relative imports of the same package differ per importer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum WalkKey {
    Remote(String),
    Local(PathBuf),
}

/// Walks the import graph of a project and fills a [`PackageCache`].
pub struct DependencyWalker<'a, M, S, D> {
    manifests: &'a M,
    scanner: &'a S,
    downloader: &'a D,
    settings: &'a BuildSettings,
    project_dir: PathBuf,
    target: Option<String>,
    states: HashMap<WalkKey, VisitState>,
    path: Vec<String>,
    downloads: Vec<String>,
}

impl<'a, M, S, D> DependencyWalker<'a, M, S, D>
where
    M: ManifestSource,
    S: ImportScanner,
    D: Downloader,
{
    /// A walker for the project at `project_dir`, whose canonical import path is
    /// `target` when declared.
    pub fn new(
        manifests: &'a M,
        scanner: &'a S,
        downloader: &'a D,
        settings: &'a BuildSettings,
        project_dir: impl Into<PathBuf>,
        target: Option<String>,
    ) -> Self {
        Self {
            manifests,
            scanner,
            downloader,
            settings,
            project_dir: normalize_path(&project_dir.into()),
            target: target.filter(|t| !t.is_empty()),
            states: HashMap::new(),
            path: Vec::new(),
            downloads: Vec::new(),
        }
    }

    /// Walk from the project directory and return the finished cache.
    pub async fn walk(mut self) -> Result<PackageCache> {
        let mut cache = PackageCache::new();
        self.walk_into(&mut cache).await?;
        Ok(cache)
    }

    /// Walk from the project directory into an existing cache.
    ///
    /// The project itself is never cached. Imports already present in `cache` are not
    /// visited again.
    pub async fn walk_into(&mut self, cache: &mut PackageCache) -> Result<()> {
        let root = self.project_dir.clone();
        let key = WalkKey::Local(root.clone());
        self.states.insert(key.clone(), VisitState::InProgress);
        self.path.push(self.target.clone().unwrap_or_else(|| root.display().to_string()));

        self.visit(root, None, cache).await?;

        self.path.pop();
        self.states.insert(key, VisitState::Done);
        tracing::debug!("Walk finished with {} cached packages", cache.len());
        Ok(())
    }

    /// Import paths downloaded during the walk, in download order.
    #[must_use]
    pub fn downloads(&self) -> &[String] {
        &self.downloads
    }

    fn state(&self, key: &WalkKey) -> VisitState {
        self.states.get(key).copied().unwrap_or(VisitState::Unvisited)
    }

    fn visit<'s>(
        &'s mut self,
        dir: PathBuf,
        parent: Option<PackageDescriptor>,
        cache: &'s mut PackageCache,
    ) -> LocalBoxFuture<'s, Result<()>> {
        async move {
            let packages = resolve_packages(
                &dir,
                false,
                self.manifests,
                self.scanner,
                self.target.as_deref(),
            )
            .with_context(|| format!("Failed to resolve imports of {}", dir.display()))?;

            for (import_path, package) in packages {
                if cache.contains(&import_path) {
                    continue;
                }

                let (key, child_dir) = self.locate(&dir, &package);
                match self.state(&key) {
                    VisitState::Done => continue,
                    VisitState::InProgress => {
                        self.on_cycle(&import_path)?;
                        continue;
                    }
                    VisitState::Unvisited => {}
                }

                if !package.is_local
                    && !self.downloader.is_installed(&package, &self.settings.install_repo)
                {
                    self.fetch(&package).await?;
                }

                self.states.insert(key.clone(), VisitState::InProgress);
                self.path.push(import_path.clone());
                self.visit(child_dir, Some(package), cache).await?;
                self.path.pop();
                self.states.insert(key, VisitState::Done);
            }

            if let Some(parent) = parent
                && !parent.is_local
            {
                tracing::debug!("Cached {}", parent);
                cache.insert(parent);
            }

            Ok(())
        }
        .boxed_local()
    }

    // Walk key and source directory of an import seen from `dir`.
    fn locate(&self, dir: &Path, package: &PackageDescriptor) -> (WalkKey, PathBuf) {
        let import_path = package.import_path.as_str();
        if is_local_import(import_path) {
            let child = normalize_path(&dir.join(import_path));
            return (WalkKey::Local(child.clone()), child);
        }
        if package.is_local {
            // Nested under the declared target: lives inside the project.
            let rest = self
                .target
                .as_deref()
                .and_then(|t| import_path.strip_prefix(t))
                .unwrap_or_default();
            let child = import_path_under(&self.project_dir, rest);
            return (WalkKey::Local(child.clone()), child);
        }
        (
            WalkKey::Remote(import_path.to_string()),
            import_path_under(&self.settings.install_repo, import_path),
        )
    }

    // Missing packages are always fetched at the latest revision; pins only
    // shape the descriptor recorded in the cache.
    async fn fetch(&mut self, package: &PackageDescriptor) -> Result<()> {
        self.downloads.push(package.import_path.clone());
        let request = PackageDescriptor::latest(&package.import_path);
        let result = self.downloader.download(&request, &self.settings.install_repo).await;

        match (result, self.settings.on_download_failure) {
            (Ok(()), _) => Ok(()),
            (Err(e), DownloadFailurePolicy::Abort) => Err(e).with_context(|| {
                format!("Failed to download {} (imported via {})", package, self.path.join(" -> "))
            }),
            (Err(e), DownloadFailurePolicy::Warn) => {
                tracing::warn!("Download of {} failed, continuing: {:#}", package, e);
                Ok(())
            }
        }
    }

    fn on_cycle(&self, import_path: &str) -> Result<()> {
        let mut chain = self.path.clone();
        chain.push(import_path.to_string());
        let chain = chain.join(" -> ");

        match self.settings.on_cycle {
            CyclePolicy::Error => Err(VendError::CircularImport {
                chain,
            }
            .into()),
            CyclePolicy::Skip => {
                tracing::warn!("Skipping circular import: {}", chain);
                Ok(())
            }
        }
    }
}
