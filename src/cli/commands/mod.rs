//! CLI command implementations

pub mod flash;
pub mod ports;

use crate::cli::args::{Cli, Commands};
use anyhow::Result;

/// Execute a CLI command
pub async fn execute_command(command: Commands, cli: &Cli) -> Result<()> {
    match command {
        Commands::Flash(args) => flash::execute_flash_command(cli, &args).await,
        Commands::Ports => ports::execute_ports_command(),
    }
}
