//! Fluent builder for git invocations.
//!
//! Every git call made by the downloader goes through [`GitCommand`] so that
//! logging, timeouts and error mapping are uniform.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use crate::core::VendError;
use crate::utils::platform::get_git_command;

/// A git command under construction.
#[derive(Debug, Default)]
pub struct GitCommand {
    args: Vec<String>,
    current_dir: Option<PathBuf>,
    timeout_duration: Option<Duration>,
    context: Option<String>,
}

/// Captured output of a successful git command.
#[derive(Debug)]
pub struct GitCommandOutput {
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
}

impl GitCommand {
    /// A command with no arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// `git clone` of `url` into `target`, optionally on `branch`.
    pub fn clone_repo(url: &str, target: &Path, branch: Option<&str>) -> Self {
        let mut cmd = Self::new().arg("clone").arg("--quiet");
        if let Some(branch) = branch {
            cmd = cmd.args(["--branch", branch]);
        }
        cmd.arg(url).arg(target.display().to_string())
    }

    /// `git checkout` of `reference` inside `repo`.
    pub fn checkout(repo: &Path, reference: &str) -> Self {
        Self::new().current_dir(repo).args(["checkout", "--quiet", reference])
    }

    /// Run git as if started in `dir` (`git -C <dir>`).
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Abort the command after `duration`; `None` waits indefinitely.
    pub const fn with_timeout(mut self, duration: Option<Duration>) -> Self {
        self.timeout_duration = duration;
        self
    }

    /// Label used in log lines, usually the import path being fetched.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Run the command, capturing its output.
    ///
    /// # Errors
    ///
    /// Returns [`VendError::GitCommandError`] on a non-zero exit or timeout, and an
    /// I/O error if git cannot be spawned.
    pub async fn execute(self) -> Result<GitCommandOutput> {
        let git_command = get_git_command();
        let mut full_args = Vec::new();
        if let Some(ref dir) = self.current_dir {
            full_args.push("-C".to_string());
            full_args.push(dir.display().to_string());
        }
        full_args.extend(self.args.iter().cloned());

        let operation = self.args.first().cloned().unwrap_or_else(|| "unknown".to_string());
        let context = self.context.as_deref().unwrap_or("git");

        tracing::debug!(target: "git", "({}) Executing command: {} {}", context, git_command, full_args.join(" "));

        let mut cmd = Command::new(git_command);
        cmd.args(&full_args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .env("GIT_TERMINAL_PROMPT", "0");

        let output_future = cmd.output();
        let output = match self.timeout_duration {
            Some(duration) => match timeout(duration, output_future).await {
                Ok(result) => {
                    result.with_context(|| format!("Failed to execute git {}", full_args.join(" ")))?
                }
                Err(_) => {
                    tracing::warn!(
                        target: "git",
                        "Command timed out after {} seconds: git {}",
                        duration.as_secs(),
                        full_args.join(" ")
                    );
                    return Err(VendError::GitCommandError {
                        operation,
                        stderr: format!("timed out after {} seconds", duration.as_secs()),
                    }
                    .into());
                }
            },
            None => output_future
                .await
                .with_context(|| format!("Failed to execute git {}", full_args.join(" ")))?,
        };

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !output.status.success() {
            tracing::debug!(target: "git", "({}) Command failed with exit code: {:?}", context, output.status.code());
            return Err(VendError::GitCommandError {
                operation,
                stderr: if stderr.is_empty() {
                    stdout
                } else {
                    stderr
                },
            }
            .into());
        }

        if !stderr.is_empty() {
            tracing::debug!(target: "git", "({}) {}", context, stderr);
        }

        Ok(GitCommandOutput {
            stdout,
            stderr,
        })
    }
}
