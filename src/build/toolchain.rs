//! Invocation of the external build toolchain.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::core::VendError;

/// The external program that performs the actual compilation.
#[derive(Debug, Clone)]
pub struct Toolchain {
    program: String,
    path: PathBuf,
}

impl Toolchain {
    /// Locate `program` on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`VendError::ToolchainNotFound`] when the program cannot be found.
    pub fn locate(program: &str) -> Result<Self> {
        let path = which::which(program).map_err(|_| VendError::ToolchainNotFound {
            program: program.to_string(),
        })?;
        tracing::debug!("Using toolchain {} at {}", program, path.display());
        Ok(Self {
            program: program.to_string(),
            path,
        })
    }

    /// Program name as configured.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run `<program> build <args...>` in `work_dir` with inherited standard streams.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned, and
    /// [`VendError::ToolchainFailed`] if it exits unsuccessfully.
    pub async fn build(&self, work_dir: &Path, args: &[String]) -> Result<()> {
        tracing::info!("Running {} build {}", self.program, args.join(" "));

        let status = Command::new(&self.path)
            .arg("build")
            .args(args)
            .current_dir(work_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .with_context(|| format!("Failed to start {}", self.path.display()))?;

        if !status.success() {
            return Err(VendError::ToolchainFailed {
                program: self.program.clone(),
                status: status.to_string(),
            }
            .into());
        }
        Ok(())
    }
}
