//! File system helpers for the vendor tree.
//!
//! The vendor tree is disposable: it is removed wholesale and re-created from
//! directory links on every build. These helpers never follow links when removing,
//! so deleting a vendor tree cannot touch the install repository or the project
//! sources the links point at.

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Ensures a directory exists, creating it and any missing parents.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the path exists but is
/// not a directory.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    } else if !path.is_dir() {
        return Err(anyhow::anyhow!("Path exists but is not a directory: {}", path.display()));
    }
    Ok(())
}

/// Removes a directory tree if it exists.
///
/// Symlinks inside the tree are unlinked, not followed. A symlink at `path` itself
/// is removed as a link.
///
/// # Errors
///
/// Returns an error if the tree exists and cannot be removed.
pub fn remove_dir_all(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => remove_link(path)
            .with_context(|| format!("Failed to remove link: {}", path.display())),
        Ok(_) => fs::remove_dir_all(path)
            .with_context(|| format!("Failed to remove directory: {}", path.display())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => {
            Err(e).with_context(|| format!("Failed to inspect directory: {}", path.display()))
        }
    }
}

/// Normalizes a path by resolving `.` and `..` components lexically.
///
/// The filesystem is not consulted, so symlinks are not resolved and the path need
/// not exist.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(components.last(), Some(Component::Normal(_))) {
                    components.pop();
                } else if !matches!(
                    components.last(),
                    Some(Component::RootDir | Component::Prefix(_))
                ) {
                    components.push(component);
                }
            }
            c => components.push(c),
        }
    }

    components.iter().collect()
}

/// Links directory `src` at `dst`, creating the parent directories of `dst`.
///
/// Unix uses a symbolic link; Windows uses a directory symlink.
///
/// # Errors
///
/// Returns the underlying I/O error if a parent cannot be created or `dst`
/// already exists.
pub fn link_dir(src: &Path, dst: &Path) -> io::Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    make_link(src, dst)
}

#[cfg(unix)]
fn make_link(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

#[cfg(windows)]
fn make_link(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(src, dst)
}

#[cfg(unix)]
fn remove_link(path: &Path) -> io::Result<()> {
    fs::remove_file(path)
}

// Directory symlinks on Windows are removed as directories.
#[cfg(windows)]
fn remove_link(path: &Path) -> io::Result<()> {
    fs::remove_dir(path)
}
