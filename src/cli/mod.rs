//! Command Line Interface module
//!
//! This module contains the CLI argument parsing and the command
//! implementations.

pub mod args;
pub mod commands;

pub use args::*;

use crate::utils::logging;
use anyhow::Result;

/// Main CLI application runner
pub async fn run() -> Result<()> {
    let cli = Cli::parse_args();
    logging::init_cli_logging(cli.verbose, cli.quiet)?;

    match &cli.command {
        Some(command) => commands::execute_command(command.clone(), &cli).await,
        // A bare invocation flashes with the root-level flags, matching the
        // single-purpose upload scripts this tool replaces
        None => commands::flash::execute_flash_command(&cli, &cli.flash).await,
    }
}
