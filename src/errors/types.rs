//! Custom error types for espupload

use std::fmt;
use std::path::PathBuf;

/// Main error type for upload operations
#[derive(Debug)]
pub enum UploadError {
    /// The flashing tool does not exist at the resolved path
    ToolNotFound(PathBuf),
    /// The filesystem image to write does not exist
    ImageNotFound(PathBuf),
    /// No Python interpreter available to run esptool.py
    InterpreterNotFound,
    /// The child process could not be started at all
    Launch(std::io::Error),
    /// The tool ran but exited with a non-zero code
    Execution(i32),
    /// The tool exceeded the configured time budget and was killed
    Timeout(u64),
    /// Configuration related errors
    Config(String),
    /// General I/O errors
    Io(std::io::Error),
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadError::ToolNotFound(path) => {
                write!(f, "esptool not found at {}", path.display())
            }
            UploadError::ImageNotFound(path) => {
                write!(f, "Image file not found: {}", path.display())
            }
            UploadError::InterpreterNotFound => {
                write!(f, "No Python interpreter found to run esptool.py")
            }
            UploadError::Launch(err) => write!(f, "Failed to start flashing tool: {}", err),
            UploadError::Execution(code) => write!(f, "Flashing tool exited with code {}", code),
            UploadError::Timeout(secs) => {
                write!(f, "Flashing tool did not finish within {}s", secs)
            }
            UploadError::Config(msg) => write!(f, "Configuration error: {}", msg),
            UploadError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for UploadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UploadError::Launch(err) => Some(err),
            UploadError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for UploadError {
    fn from(err: std::io::Error) -> Self {
        UploadError::Io(err)
    }
}

impl UploadError {
    /// Process exit code the program should terminate with for this error.
    ///
    /// A tool that ran and failed propagates its own code; everything that
    /// went wrong before or at launch maps to the fixed sentinel 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            UploadError::Execution(code) => *code,
            _ => 1,
        }
    }
}

/// Result type alias for upload operations
pub type Result<T> = std::result::Result<T, UploadError>;
