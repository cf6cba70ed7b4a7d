//! A project and install repository on disk.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::config::BuildSettings;
use crate::manifest::MANIFEST_FILE_NAME;
use crate::utils::import_path_under;

/// Source text of a package named `name` importing `imports`.
pub fn go_source(name: &str, imports: &[&str]) -> String {
    let mut src = format!("package {name}\n");
    if !imports.is_empty() {
        src.push_str("\nimport (\n");
        for import in imports {
            src.push_str(&format!("\t\"{import}\"\n"));
        }
        src.push_str(")\n");
    }
    src.push_str("\nfunc init() {}\n");
    src
}

/// Temporary `project/` and `repos/` directories with helpers to populate them.
pub struct TestProject {
    pub temp_dir: TempDir,
    pub project_dir: PathBuf,
    pub install_repo: PathBuf,
}

impl TestProject {
    /// Create empty project and install repository directories.
    pub fn new() -> Result<Self> {
        super::init_test_logging(None);

        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().join("project");
        let install_repo = temp_dir.path().join("repos");
        fs::create_dir_all(&project_dir)?;
        fs::create_dir_all(&install_repo)?;

        Ok(Self {
            temp_dir,
            project_dir,
            install_repo,
        })
    }

    /// Write a source file importing `imports` into `rel_dir` of the project.
    /// An empty `rel_dir` is the project root.
    pub fn add_source(&self, rel_dir: &str, imports: &[&str]) -> Result<PathBuf> {
        let dir = import_path_under(&self.project_dir, rel_dir);
        write_package(&dir, imports)?;
        Ok(dir)
    }

    /// Write an installed package at `import_path` importing `imports`.
    pub fn add_package(&self, import_path: &str, imports: &[&str]) -> Result<PathBuf> {
        let dir = import_path_under(&self.install_repo, import_path);
        write_package(&dir, imports)?;
        Ok(dir)
    }

    /// Write the project manifest.
    pub fn write_manifest(&self, content: &str) -> Result<()> {
        let path = self.project_dir.join(MANIFEST_FILE_NAME);
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Build settings pointing at this install repository.
    pub fn settings(&self) -> BuildSettings {
        BuildSettings::with_install_repo(&self.install_repo)
    }

    /// Path of `import_path` inside the vendor source root.
    pub fn vendored(&self, import_path: &str) -> PathBuf {
        import_path_under(&self.project_dir.join("vendor").join("src"), import_path)
    }

    /// Root of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }
}

fn write_package(dir: &Path, imports: &[&str]) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    let name = dir
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.replace(['-', '.'], "_"))
        .unwrap_or_else(|| "main".to_string());
    let path = dir.join(format!("{name}.go"));
    fs::write(&path, go_source(&name, imports))
        .with_context(|| format!("Failed to write {}", path.display()))
}
