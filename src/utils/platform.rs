//! Platform-specific helpers: home directory lookup, path expansion and
//! import-path to filesystem-path mapping.
//!
//! # Examples
//!
//! ```rust,no_run
//! use vend::utils::platform::{get_home_dir, resolve_path};
//!
//! # fn example() -> anyhow::Result<()> {
//! let home = get_home_dir()?;
//! let repos = resolve_path("~/.vend/repos")?;
//! assert!(repos.starts_with(&home));
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Checks if the current platform is Windows.
#[must_use]
pub const fn is_windows() -> bool {
    cfg!(windows)
}

/// Gets the home directory path for the current user.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined (for example when
/// `HOME` / `USERPROFILE` is unset).
pub fn get_home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| {
        let platform_help = if is_windows() {
            "On Windows: Check that the USERPROFILE environment variable is set"
        } else {
            "On Unix/Linux: Check that the HOME environment variable is set"
        };
        anyhow::anyhow!("Could not determine home directory.\n\n{platform_help}")
    })
}

/// Returns the git executable name for the current platform.
#[must_use]
pub const fn get_git_command() -> &'static str {
    if is_windows() {
        "git.exe"
    } else {
        "git"
    }
}

/// Resolves a configured path, expanding the `~` home placeholder and environment
/// variables.
///
/// A bare `~` expands to the home directory, `~/rest` to a path under it. `~user`
/// forms are rejected. `$VAR` and `${VAR}` are expanded with `shellexpand`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined, the tilde form is
/// unsupported, or an environment variable is undefined.
pub fn resolve_path(path: &str) -> Result<PathBuf> {
    let expanded = if path == "~" {
        get_home_dir()?
    } else if let Some(stripped) = path.strip_prefix("~/") {
        get_home_dir()?.join(stripped)
    } else if path.starts_with('~') {
        return Err(anyhow::anyhow!(
            "Invalid path: {path}\n\n\
            Tilde expansion only supports '~/' for home directory.\n\
            Use '~/' followed by a relative path, like '~/.vend/repos'"
        ));
    } else {
        PathBuf::from(path)
    };

    let path_str = expanded.to_string_lossy();
    let expanded_str = shellexpand::env(&path_str)
        .with_context(|| {
            format!(
                "Failed to expand environment variables in path: {path_str}\n\n\
                Common issues:\n\
                - Undefined environment variable (e.g., $UNDEFINED_VAR)\n\
                - Invalid variable syntax (use $VAR or ${{VAR}})"
            )
        })?
        .into_owned();

    Ok(PathBuf::from(expanded_str))
}

/// Maps a slash-separated import path onto `root`, one path component per segment.
///
/// Empty segments (from doubled or trailing slashes) are skipped so the result never
/// escapes `root` through an absolute component.
#[must_use]
pub fn import_path_under(root: &Path, import_path: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    for segment in import_path.split('/').filter(|s| !s.is_empty()) {
        path.push(segment);
    }
    path
}
