//! Cross-platform utilities
//!
//! - [`fs`] - Directory creation, symlink-safe removal and directory linking
//! - [`platform`] - Home directory lookup, path expansion and import-path mapping

pub mod fs;
pub mod platform;

pub use fs::{ensure_dir, link_dir, normalize_path, remove_dir_all};
pub use platform::{get_git_command, get_home_dir, import_path_under, is_windows, resolve_path};
