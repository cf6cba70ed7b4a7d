//! vend CLI entry point
//!
//! Parses the command line, runs the command and renders errors with suggestions.
//!
//! - `build` - Resolve dependencies, rebuild the vendor tree and run the toolchain
//! - `vendor` - Resolve dependencies and rebuild the vendor tree only

use anyhow::Result;
use clap::Parser;
use vend::cli;
use vend::core::user_friendly_error;

// Single-threaded: the search-path guard mutates the process environment.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
