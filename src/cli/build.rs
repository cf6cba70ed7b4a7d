//! `vend build`: the full pipeline.
//!
//! Arguments after `--` are forwarded verbatim to `<toolchain> build`.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::{CliConfig, CommandContext, ResolveArgs};
use crate::build::{Orchestrator, Toolchain};
use crate::download::GitDownloader;
use crate::manifest::FsManifestSource;
use crate::scanner::SourceImportScanner;

/// Resolve, vendor and build the project.
#[derive(Args, Debug)]
pub struct BuildCommand {
    #[command(flatten)]
    pub resolve: ResolveArgs,

    /// Arguments passed to the toolchain's build step.
    #[arg(last = true, value_name = "ARGS")]
    pub args: Vec<String>,
}

impl BuildCommand {
    /// Execute the command.
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let ctx = CommandContext::load(config, &self.resolve).await?;
        let toolchain = Toolchain::locate(&ctx.settings.toolchain)?;
        let downloader = GitDownloader::new(ctx.settings.git_timeout);
        let orchestrator = Orchestrator::new(
            &ctx.settings,
            &FsManifestSource,
            &SourceImportScanner,
            &downloader,
            &ctx.project_dir,
        );

        ctx.status(format!("Resolving dependencies of {}", ctx.project_dir.display()));
        let prepared = orchestrator.vendor().await?;
        ctx.report(&prepared);

        ctx.status(format!(
            "Building with {} ({}={})",
            toolchain.program(),
            ctx.settings.search_path_var,
            prepared.vendor_dir.display()
        ));
        orchestrator.run_toolchain(&toolchain, &prepared.vendor_dir, &self.args).await?;

        if !ctx.quiet {
            println!("{}", "Build succeeded".green().bold());
        }
        Ok(())
    }
}
