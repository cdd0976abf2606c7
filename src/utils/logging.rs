//! Logging initialization for espupload

use anyhow::Result;
use env_logger::{Builder, Target};
use log::LevelFilter;

/// Initialize stderr logging for the CLI
pub fn init_cli_logging(verbose: u8, quiet: bool) -> Result<()> {
    let level = level_for(quiet, verbose);

    Builder::from_default_env()
        .target(Target::Stderr)
        .filter_level(level)
        .format_timestamp_secs()
        .format_module_path(false)
        .init();

    // Initialize panic logging
    #[cfg(debug_assertions)]
    log_panics::init();

    log::debug!("espupload logging initialized with level: {:?}", level);
    Ok(())
}

/// Map `-q`/`-v` counters to a log level
fn level_for(quiet: bool, verbose: u8) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    }
}
