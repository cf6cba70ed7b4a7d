//! Common test utilities for vend integration tests

// Not every helper is used by every test module
#![allow(dead_code)]

use anyhow::{Context, Result};
use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use vend::test_utils::TestProject;

/// A [`TestProject`] plus an isolated global config for running the binary.
pub struct CliProject {
    pub project: TestProject,
    pub config_path: PathBuf,
}

impl CliProject {
    /// A project whose global config points at its own install repository.
    pub fn new() -> Result<Self> {
        let project = TestProject::new()?;
        let config_path = project.root().join("config.toml");
        let cli = Self {
            project,
            config_path,
        };
        cli.write_config(&[])?;
        Ok(cli)
    }

    /// Rewrite the global config with `extra` lines. `install_repo` points at the
    /// project's install repository unless `extra` sets it.
    pub fn write_config(&self, extra: &[&str]) -> Result<()> {
        let mut content = String::new();
        if !extra.iter().any(|line| line.starts_with("install_repo")) {
            content.push_str(&format!(
                "install_repo = \"{}\"\n",
                self.project.install_repo.display().to_string().replace('\\', "/")
            ));
        }
        for line in extra {
            content.push_str(line);
            content.push('\n');
        }
        fs::write(&self.config_path, content)
            .with_context(|| format!("Failed to write {}", self.config_path.display()))
    }

    /// Install a shell script standing in for the toolchain and configure it.
    ///
    /// The script prints the search path and its arguments, then exits with
    /// `exit_code`.
    #[cfg(unix)]
    pub fn fake_toolchain(&self, exit_code: i32) -> Result<PathBuf> {
        use std::os::unix::fs::PermissionsExt;

        let bin = self.project.root().join("bin");
        fs::create_dir_all(&bin)?;
        let script = bin.join("fake-go");
        fs::write(
            &script,
            format!(
                "#!/bin/sh\necho \"SEARCH_PATH=$VEND_IT_SEARCH_PATH\"\necho \"ARGS=$*\"\nexit {exit_code}\n"
            ),
        )?;
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755))?;

        let toolchain = format!("toolchain = \"{}\"", script.display());
        self.write_config(&[&toolchain, "search_path_var = \"VEND_IT_SEARCH_PATH\""])?;
        Ok(script)
    }

    /// The `vend` binary, run inside the project with this config.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("vend").expect("vend binary is built for tests");
        cmd.current_dir(&self.project.project_dir)
            .env("VEND_CONFIG_PATH", &self.config_path)
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .env_remove("VEND_IT_SEARCH_PATH");
        cmd
    }
}
