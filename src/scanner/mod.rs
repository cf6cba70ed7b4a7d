//! Import scanning: the direct import paths of one package directory.
//!
//! [`SourceImportScanner`] reads the source files that sit directly in a directory
//! (no recursion; subdirectories are separate packages) and extracts both the
//! single-line and the grouped import forms:
//!
//! ```text
//! import "example.com/lib/net"
//! import log "example.com/lib/log"
//! import (
//!     "fmt"
//!     util "./util"
//! )
//! ```
//!
//! Test files (`*_test.go`) and files the toolchain ignores (leading `_` or `.`)
//! are skipped.

use anyhow::Result;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::LazyLock;
use walkdir::WalkDir;

use crate::core::VendError;

/// Source file extension of the ecosystem.
pub const SOURCE_EXTENSION: &str = "go";

static BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("block comment pattern"));
static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)//.*$").expect("line comment pattern"));
static SINGLE_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*import\s+(?:[\w.]+\s+)?"([^"]+)""#).expect("single import pattern")
});
static GROUPED_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ms)^\s*import\s*\((.*?)\)").expect("grouped import pattern")
});
static GROUP_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*(?:[\w.]+\s+)?"([^"]+)""#).expect("group entry pattern")
});

/// Yields a package's direct import paths.
pub trait ImportScanner {
    /// Scan `dir` for its direct imports.
    ///
    /// # Errors
    ///
    /// Fails when `dir` cannot be read or is not a package.
    fn scan(&self, dir: &Path) -> Result<BTreeSet<String>>;
}

/// Scans source files on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceImportScanner;

impl ImportScanner for SourceImportScanner {
    fn scan(&self, dir: &Path) -> Result<BTreeSet<String>> {
        if !dir.is_dir() {
            return Err(VendError::ImportScanFailed {
                dir: dir.display().to_string(),
                reason: "directory does not exist".to_string(),
            }
            .into());
        }

        let mut imports = BTreeSet::new();
        let mut source_files = 0usize;

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| VendError::ImportScanFailed {
                dir: dir.display().to_string(),
                reason: e.to_string(),
            })?;
            if !entry.file_type().is_file() || !is_buildable_source(entry.path()) {
                continue;
            }

            let content = std::fs::read_to_string(entry.path()).map_err(|e| {
                VendError::ImportScanFailed {
                    dir: dir.display().to_string(),
                    reason: format!("{}: {e}", entry.path().display()),
                }
            })?;
            source_files += 1;
            imports.extend(scan_imports_in_text(&content));
        }

        if source_files == 0 {
            return Err(VendError::NotAPackage {
                dir: dir.display().to_string(),
            }
            .into());
        }

        tracing::debug!("Scanned {} ({} imports)", dir.display(), imports.len());
        Ok(imports)
    }
}

fn is_buildable_source(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name.starts_with('_') || name.starts_with('.') {
        return false;
    }
    let Some(stem) = name.strip_suffix(&format!(".{SOURCE_EXTENSION}")) else {
        return false;
    };
    !stem.ends_with("_test")
}

/// Extract import paths from one source file's text.
#[must_use]
pub fn scan_imports_in_text(src: &str) -> BTreeSet<String> {
    let without_blocks = BLOCK_COMMENT.replace_all(src, "");
    let text = LINE_COMMENT.replace_all(&without_blocks, "");

    let mut imports: BTreeSet<String> =
        SINGLE_IMPORT.captures_iter(&text).map(|c| c[1].to_string()).collect();

    for group in GROUPED_IMPORT.captures_iter(&text) {
        imports.extend(GROUP_ENTRY.captures_iter(&group[1]).map(|c| c[1].to_string()));
    }

    imports
}

/// Whether `import_path` is resolved relative to the importing directory.
#[must_use]
pub fn is_local_import(import_path: &str) -> bool {
    import_path == "."
        || import_path == ".."
        || import_path.starts_with("./")
        || import_path.starts_with("../")
}

/// Whether `import_path` names a standard-library or toolchain pseudo package.
///
/// Standard packages have no dot in their first path segment (`fmt`,
/// `net/http`); remote import paths start with a host name.
#[must_use]
pub fn is_system_import(import_path: &str) -> bool {
    if is_local_import(import_path) {
        return false;
    }
    let first = import_path.split('/').next().unwrap_or_default();
    !first.contains('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_scan_single_and_grouped_imports() {
        let src = r#"
package main

import "fmt"
import log "example.com/lib/log"

import (
    "os"
    net "example.com/lib/net"
    _ "example.com/lib/driver"
    . "example.com/lib/dot"
    // "example.com/commented/out"
)

func main() {}
"#;
        let imports = scan_imports_in_text(src);
        let expected: BTreeSet<String> = [
            "fmt",
            "os",
            "example.com/lib/log",
            "example.com/lib/net",
            "example.com/lib/driver",
            "example.com/lib/dot",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        assert_eq!(imports, expected);
    }

    #[test]
    fn test_block_comments_are_ignored() {
        let src = "package x\n/*\nimport \"example.com/hidden\"\n*/\nimport \"example.com/seen\"\n";
        let imports = scan_imports_in_text(src);
        assert!(imports.contains("example.com/seen"));
        assert!(!imports.contains("example.com/hidden"));
    }

    #[test]
    fn test_scanner_skips_tests_and_subdirectories() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("a.go"), "package a\nimport \"example.com/x\"\n").unwrap();
        std::fs::write(temp.path().join("a_test.go"), "package a\nimport \"example.com/t\"\n")
            .unwrap();
        std::fs::write(temp.path().join("_gen.go"), "package a\nimport \"example.com/g\"\n")
            .unwrap();
        std::fs::create_dir(temp.path().join("sub")).unwrap();
        std::fs::write(temp.path().join("sub/b.go"), "package b\nimport \"example.com/s\"\n")
            .unwrap();

        let imports = SourceImportScanner.scan(temp.path()).unwrap();
        assert_eq!(imports.into_iter().collect::<Vec<_>>(), vec!["example.com/x".to_string()]);
    }

    #[test]
    fn test_scanner_missing_directory_fails() {
        let temp = TempDir::new().unwrap();
        let err = SourceImportScanner.scan(&temp.path().join("nope")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<VendError>(),
            Some(VendError::ImportScanFailed { .. })
        ));
    }

    #[test]
    fn test_scanner_empty_directory_is_not_a_package() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("README.md"), "docs").unwrap();
        let err = SourceImportScanner.scan(temp.path()).unwrap_err();
        assert!(matches!(err.downcast_ref::<VendError>(), Some(VendError::NotAPackage { .. })));
    }

    #[test]
    fn test_import_classification() {
        assert!(is_local_import("./util"));
        assert!(is_local_import("../shared"));
        assert!(is_local_import("."));
        assert!(!is_local_import("example.com/lib"));

        assert!(is_system_import("fmt"));
        assert!(is_system_import("net/http"));
        assert!(is_system_import("C"));
        assert!(!is_system_import("example.com/lib"));
        assert!(!is_system_import("./util"));
    }
}
