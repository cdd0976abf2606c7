//! Command line argument parsing

use crate::config::{UploadConfig, parse_offset};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "espupload")]
#[command(
    about = "🔥 LittleFS image uploader for ESP32 boards - drives PlatformIO's esptool.py over serial"
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease logging verbosity (only errors)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Path to configuration file (defaults to espupload.toml in the current directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub flash: FlashArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Write the filesystem image to flash (default when no subcommand is given)
    Flash(FlashArgs),
    /// List serial ports available on this machine
    Ports,
}

/// Flags for the flash operation, overriding file and environment configuration
#[derive(Args, Clone, Default)]
pub struct FlashArgs {
    /// Serial port the board is attached to (e.g. /dev/ttyUSB0, COM3)
    #[arg(short, long)]
    pub port: Option<String>,

    /// Flash offset to write the image at (hex like 0x580000, or decimal)
    #[arg(short, long, value_parser = parse_offset)]
    pub offset: Option<u32>,

    /// Path to the filesystem image to write
    #[arg(short, long)]
    pub image: Option<PathBuf>,

    /// PlatformIO packages directory (defaults to ~/.platformio/packages)
    #[arg(long, value_name = "DIR")]
    pub packages_dir: Option<PathBuf>,

    /// Explicit path to esptool.py, skipping PlatformIO discovery
    #[arg(long, value_name = "FILE")]
    pub esptool: Option<PathBuf>,

    /// Python interpreter used to run esptool.py
    #[arg(long, value_name = "FILE")]
    pub python: Option<PathBuf>,

    /// Chip type passed to esptool (e.g. esp32, esp32s3)
    #[arg(long)]
    pub chip: Option<String>,

    /// Baud rate for the serial connection
    #[arg(short, long)]
    pub baud: Option<u32>,

    /// Stream tool output to the terminal instead of capturing it
    #[arg(long)]
    pub stream: bool,

    /// Run the tool from its install directory instead of the current directory
    #[arg(long)]
    pub tool_dir: bool,

    /// Kill the tool if it runs longer than this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

impl FlashArgs {
    /// Apply command line overrides on top of file and environment values
    pub fn apply(&self, config: &mut UploadConfig) {
        if let Some(port) = &self.port {
            config.port = port.clone();
        }
        if let Some(offset) = self.offset {
            config.offset = offset;
        }
        if let Some(image) = &self.image {
            config.image = image.clone();
        }
        if let Some(dir) = &self.packages_dir {
            config.packages_dir = Some(dir.clone());
        }
        if let Some(tool) = &self.esptool {
            config.esptool = Some(tool.clone());
        }
        if let Some(python) = &self.python {
            config.python = Some(python.clone());
        }
        if let Some(chip) = &self.chip {
            config.chip = Some(chip.clone());
        }
        if let Some(baud) = self.baud {
            config.baud = Some(baud);
        }
        if self.stream {
            config.stream = true;
        }
        if self.tool_dir {
            config.run_in_tool_dir = true;
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = Some(timeout);
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
