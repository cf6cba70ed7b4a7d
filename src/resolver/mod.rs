//! Dependency resolution.
//!
//! Resolution happens in two layers:
//!
//! - [`resolve_packages`] turns one directory into its direct dependencies by
//!   combining the directory's manifest pins with the import scanner's output.
//! - [`DependencyWalker`] applies it across the transitive closure, downloading
//!   missing packages and filling a [`PackageCache`] in postorder.
//!
//! # Locality
//!
//! An import is *local* when it resolves inside the project rather than the
//! install repository: relative imports (`./util`, `../shared`) and imports equal
//! to or nested under the project's declared target path. Local packages are
//! walked but never cached, and never downloaded.

mod cache;
mod walker;

pub use cache::PackageCache;
pub use walker::{DependencyWalker, VisitState};

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;

use crate::manifest::ManifestSource;
use crate::models::PackageDescriptor;
use crate::scanner::{ImportScanner, is_local_import, is_system_import};

/// Whether `import_path` is `target` itself or nested under it.
#[must_use]
pub fn is_under_target(import_path: &str, target: Option<&str>) -> bool {
    match target {
        Some(target) if !target.is_empty() => {
            import_path == target
                || import_path.strip_prefix(target).is_some_and(|rest| rest.starts_with('/'))
        }
        _ => false,
    }
}

/// Resolve the direct dependencies of `dir`.
///
/// Loads the directory's manifest (if any) for `[build]` pins, scans its imports and
/// maps every import to a descriptor: the pinned selector when the manifest pins that
/// exact import path, the latest selector otherwise. Imports that are relative, or
/// under `target`, are marked local. Other system imports are dropped unless
/// `include_system` is set.
///
/// # Errors
///
/// Manifest load failures and scan failures are returned as-is; nothing is
/// fabricated for a directory that cannot be scanned.
pub fn resolve_packages<M, S>(
    dir: &Path,
    include_system: bool,
    manifests: &M,
    scanner: &S,
    target: Option<&str>,
) -> Result<BTreeMap<String, PackageDescriptor>>
where
    M: ManifestSource + ?Sized,
    S: ImportScanner + ?Sized,
{
    let manifest = manifests
        .load(dir)
        .with_context(|| format!("Failed to load manifest in {}", dir.display()))?;
    let pins = manifest.as_ref().and_then(|m| m.build_pins());

    let imports = scanner.scan(dir)?;

    let mut packages = BTreeMap::new();
    for import_path in imports {
        let is_local = is_local_import(&import_path) || is_under_target(&import_path, target);
        if !include_system && !is_local && is_system_import(&import_path) {
            continue;
        }

        let descriptor = match pins.and_then(|p| p.get(&import_path)) {
            Some(selector) => PackageDescriptor::pinned(import_path.clone(), selector.clone()),
            None => PackageDescriptor::latest(import_path.clone()),
        };
        let descriptor = if is_local { descriptor.local() } else { descriptor };

        packages.insert(import_path, descriptor);
    }

    Ok(packages)
}
