//! Command-line interface for vend.
//!
//! # Available Commands
//!
//! - `build` - Resolve dependencies, rebuild the vendor tree and run the toolchain
//! - `vendor` - Resolve dependencies and rebuild the vendor tree only
//!
//! # Examples
//!
//! ```bash
//! # Build the project in the current directory
//! vend build
//!
//! # Forward arguments to the toolchain's build step
//! vend build -- -o bin/app -v
//!
//! # Inspect the vendor tree of another project with debug logging
//! vend --verbose --project ../service vendor
//!
//! # Stop at the first failed download
//! vend build --strict
//! ```
//!
//! # Global Options
//!
//! - `--verbose` / `--quiet` select the log level and progress output
//! - `--config` points at an alternative global config file
//! - `--project` selects the project directory (defaults to the current directory)

mod build;
mod common;
mod vendor;

pub use common::{CommandContext, ResolveArgs};

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Runtime options derived from the global flags.
///
/// Separate from [`Cli`] so tests can drive commands without parsing arguments.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Diagnostics level used when `RUST_LOG` is unset.
    pub log_level: Option<String>,

    /// Suppress progress lines.
    pub quiet: bool,

    /// Alternative global config file.
    pub config_path: Option<PathBuf>,

    /// Project directory; the current directory when unset.
    pub project_dir: Option<PathBuf>,
}

impl CliConfig {
    /// A configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the tracing subscriber for this run.
    ///
    /// `RUST_LOG` wins over [`CliConfig::log_level`]. Diagnostics go to stderr so
    /// they never mix with toolchain output on stdout. Calling this more than once
    /// is harmless.
    pub fn init_logging(&self) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(self.log_level.as_deref().unwrap_or("warn"))
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Vendoring build driver.
#[derive(Parser, Debug)]
#[command(
    name = "vend",
    about = "Vendoring build driver - resolve dependencies into an isolated workspace and build",
    version,
    long_about = "vend walks a project's imports, fetches missing packages into a shared install \
                  repository, links exactly the needed sources into <project>/vendor/src and runs \
                  the toolchain with its search path pointed at that tree."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Show debug diagnostics.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only print errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to an alternative global config file.
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Project directory to operate on.
    #[arg(short, long, global = true, value_name = "DIR")]
    project: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve, vendor and run `<toolchain> build`.
    Build(build::BuildCommand),

    /// Resolve and rebuild the vendor tree without building.
    Vendor(vendor::VendorCommand),
}

impl Cli {
    /// Execute the parsed command line.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Translate the global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        };

        CliConfig {
            log_level: Some(log_level.to_string()),
            quiet: self.quiet,
            config_path: self.config.clone(),
            project_dir: self.project.clone(),
        }
    }

    /// Execute with an explicit configuration.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();

        match self.command {
            Commands::Build(cmd) => cmd.execute(&config).await,
            Commands::Vendor(cmd) => cmd.execute(&config).await,
        }
    }
}
