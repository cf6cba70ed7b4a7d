//! Fetching package sources into the install repository.
//!
//! The walker only needs "make `<install_repo>/<import path>` exist", expressed by
//! the [`Downloader`] trait. [`GitDownloader`] fulfils it by cloning the repository
//! that hosts the import path.
//!
//! # Repository roots
//!
//! An import path may name a package nested inside a repository
//! (`github.com/user/repo/sub/pkg`). For well-known hosts the repository root is the
//! first three segments; for any other host the whole import path is cloned.
//!
//! Clones land in a sibling `*.vend-partial` directory first and are renamed into
//! place only after the clone and checkout succeed, so an interrupted download
//! never leaves a half-populated package behind.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::VendError;
use crate::git::GitCommand;
use crate::models::{PackageDescriptor, VersionKind};
use crate::utils::{import_path_under, remove_dir_all};

/// Hosts whose repository root is `<host>/<owner>/<repo>`.
pub const KNOWN_HOSTS: &[&str] = &["github.com", "gitlab.com", "bitbucket.org"];

const PARTIAL_SUFFIX: &str = "vend-partial";

/// Fetches one package into the install repository.
#[allow(async_fn_in_trait)]
pub trait Downloader {
    /// Whether `package` already has sources under `install_repo`.
    fn is_installed(&self, package: &PackageDescriptor, install_repo: &Path) -> bool {
        import_path_under(install_repo, &package.import_path).exists()
    }

    /// Fetch `package` so that its sources exist under `install_repo`.
    ///
    /// # Errors
    ///
    /// Returns an error naming the import path when the package cannot be fetched.
    async fn download(&self, package: &PackageDescriptor, install_repo: &Path) -> Result<()>;
}

/// Downloads packages with `git clone`.
#[derive(Debug, Clone, Default)]
pub struct GitDownloader {
    timeout: Option<Duration>,
}

impl GitDownloader {
    /// A downloader whose git invocations time out after `timeout`, if set.
    #[must_use]
    pub const fn new(timeout: Option<Duration>) -> Self {
        Self {
            timeout,
        }
    }

    async fn fetch(&self, package: &PackageDescriptor, install_repo: &Path) -> Result<()> {
        let root = repo_root(&package.import_path);
        let dest = import_path_under(install_repo, root);
        if dest.exists() {
            tracing::debug!("Repository {} already present at {}", root, dest.display());
            return Ok(());
        }

        let partial = partial_path(&dest);
        remove_dir_all(&partial)?;
        if let Some(parent) = partial.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let selector = &package.selector;
        let branch = (selector.kind == VersionKind::Branch && !selector.value.is_empty())
            .then_some(selector.value.as_str());
        let url = format!("https://{root}");

        let result = async {
            GitCommand::clone_repo(&url, &partial, branch)
                .with_timeout(self.timeout)
                .with_context(&package.import_path)
                .execute()
                .await?;

            if matches!(selector.kind, VersionKind::Tag | VersionKind::Commit) {
                GitCommand::checkout(&partial, &selector.value)
                    .with_timeout(self.timeout)
                    .with_context(&package.import_path)
                    .execute()
                    .await?;
            }

            tokio::fs::rename(&partial, &dest).await.with_context(|| {
                format!("Failed to move {} into {}", partial.display(), dest.display())
            })
        }
        .await;

        if result.is_err() {
            // Best effort cleanup.
            let _ = remove_dir_all(&partial);
        }
        result
    }
}

impl Downloader for GitDownloader {
    async fn download(&self, package: &PackageDescriptor, install_repo: &Path) -> Result<()> {
        tracing::info!("Downloading {}", package);
        self.fetch(package, install_repo).await.map_err(|e| {
            VendError::DownloadFailed {
                import_path: package.import_path.clone(),
                reason: format!("{e:#}"),
            }
            .into()
        })
    }
}

/// The repository root hosting `import_path`.
#[must_use]
pub fn repo_root(import_path: &str) -> &str {
    let host = import_path.split('/').next().unwrap_or_default();
    if !KNOWN_HOSTS.contains(&host) {
        return import_path;
    }
    match import_path.match_indices('/').nth(2) {
        Some((idx, _)) => &import_path[..idx],
        None => import_path,
    }
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".");
    name.push(PARTIAL_SUFFIX);
    dest.with_file_name(name)
}
