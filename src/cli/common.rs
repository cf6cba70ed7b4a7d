//! Common utilities for CLI commands

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::CliConfig;
use crate::build::Prepared;
use crate::config::{BuildSettings, DownloadFailurePolicy, GlobalConfig};
use crate::utils::{normalize_path, resolve_path};

/// Resolution flags shared by `build` and `vendor`.
#[derive(Args, Debug, Clone, Default)]
pub struct ResolveArgs {
    /// Abort on the first failed download instead of warning.
    #[arg(long)]
    pub strict: bool,

    /// Install repository to use instead of the configured one.
    #[arg(long, value_name = "PATH")]
    pub install_repo: Option<String>,
}

/// Settings and project location for one command run.
#[derive(Debug)]
pub struct CommandContext {
    /// Resolved build settings, CLI overrides applied
    pub settings: BuildSettings,
    /// Absolute project directory
    pub project_dir: PathBuf,
    /// Whether progress lines are suppressed
    pub quiet: bool,
}

impl CommandContext {
    /// Load the global config and apply `config` and `args` on top of it.
    pub async fn load(config: &CliConfig, args: &ResolveArgs) -> Result<Self> {
        let global = GlobalConfig::load_with_optional(config.config_path.clone()).await?;
        let mut settings = BuildSettings::from_global(&global)?;

        if args.strict {
            settings.on_download_failure = DownloadFailurePolicy::Abort;
        }
        if let Some(repo) = &args.install_repo {
            settings.install_repo = resolve_path(repo)
                .with_context(|| format!("Invalid --install-repo value '{repo}'"))?;
        }

        let cwd = std::env::current_dir().context("Failed to determine current directory")?;
        settings.install_repo = normalize_path(&cwd.join(&settings.install_repo));
        let project_dir = match &config.project_dir {
            Some(dir) => normalize_path(&cwd.join(dir)),
            None => cwd,
        };
        if !project_dir.is_dir() {
            anyhow::bail!("Project directory {} does not exist", project_dir.display());
        }

        tracing::debug!(
            "Project {} with install repository {}",
            project_dir.display(),
            settings.install_repo.display()
        );

        Ok(Self {
            settings,
            project_dir,
            quiet: config.quiet,
        })
    }

    /// Print a progress line unless quiet.
    pub fn status(&self, message: impl AsRef<str>) {
        if !self.quiet {
            println!("{} {}", "::".cyan().bold(), message.as_ref());
        }
    }

    /// Print what resolution and vendoring produced.
    pub fn report(&self, prepared: &Prepared) {
        if self.quiet {
            return;
        }
        for import_path in &prepared.downloads {
            println!("  {} {}", "downloaded".yellow(), import_path);
        }
        for import_path in &prepared.report.linked {
            println!("  {} {}", "linked".green(), import_path);
        }
        if let Some(target) = &prepared.report.target {
            println!("  {} {} {}", "linked".green(), target, "(project)".dimmed());
        }
        println!(
            "{} {} packages vendored into {}",
            "::".cyan().bold(),
            prepared.cache.len(),
            prepared.vendor_dir.display()
        );
    }
}
