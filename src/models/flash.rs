//! Flash-related data models

use std::path::PathBuf;

/// A fully resolved request to write one image to flash.
///
/// Built from configuration immediately before use and discarded after the
/// single invocation. `tool` and `image` must exist on disk when the upload
/// runs; that is validated before any process is launched.
#[derive(Debug, Clone)]
pub struct FlashRequest {
    /// Python interpreter for running a `.py` tool. `None` means the tool is
    /// a native executable and runs directly.
    pub interpreter: Option<PathBuf>,
    /// Path to the flashing tool (typically PlatformIO's esptool.py)
    pub tool: PathBuf,
    /// Optional chip type forwarded to esptool (e.g. "esp32", "esp32s3")
    pub chip: Option<String>,
    /// Serial port the board is attached to (e.g. /dev/ttyUSB0, COM3)
    pub port: String,
    /// Optional baud rate for the serial connection
    pub baud: Option<u32>,
    /// Flash offset the image is written at, in bytes
    pub offset: u32,
    /// Path to the filesystem image to write
    pub image: PathBuf,
}

/// Outcome of a single flash invocation, immutable after creation.
#[derive(Debug, Clone)]
pub struct FlashResult {
    /// Exit code of the flashing tool
    pub exit_code: i32,
    /// Captured standard output (empty in streaming mode)
    pub stdout: String,
    /// Captured standard error (empty in streaming mode)
    pub stderr: String,
}

impl FlashResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// How the child process's output is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Collect stdout/stderr and report them after the tool exits
    #[default]
    Capture,
    /// Forward output to the terminal line by line while the tool runs
    Stream,
}
