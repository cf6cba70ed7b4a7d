//! `vend vendor`: resolve and rebuild the vendor tree without building.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::{CliConfig, CommandContext, ResolveArgs};
use crate::build::Orchestrator;
use crate::download::GitDownloader;
use crate::manifest::FsManifestSource;
use crate::scanner::SourceImportScanner;

/// Rebuild `<project>/vendor` from the project's imports.
#[derive(Args, Debug)]
pub struct VendorCommand {
    #[command(flatten)]
    pub resolve: ResolveArgs,
}

impl VendorCommand {
    /// Execute the command.
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let ctx = CommandContext::load(config, &self.resolve).await?;
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

        if !ctx.quiet {
            println!("{}", "Vendor tree ready".green().bold());
        }
        Ok(())
    }
}
