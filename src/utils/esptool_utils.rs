//! esptool discovery inside a PlatformIO installation
//!
//! PlatformIO ships esptool.py under `<packages>/tool-esptoolpy/` together
//! with a bundled Python environment under `penv/`. The expected tool
//! location is computed deterministically and checked before anything is
//! executed, so a missing installation produces an immediate diagnostic
//! instead of an opaque process-launch failure.

use crate::errors::{Result, UploadError};
use std::path::{Path, PathBuf};

/// PlatformIO package directory holding esptool
pub const ESPTOOL_PACKAGE: &str = "tool-esptoolpy";

/// Filename of the esptool entry point
pub const ESPTOOL_SCRIPT: &str = "esptool.py";

/// Root of the PlatformIO installation (`~/.platformio`)
pub fn platformio_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".platformio")
}

/// PlatformIO packages directory (`~/.platformio/packages`)
pub fn platformio_packages_dir() -> PathBuf {
    platformio_dir().join("packages")
}

/// Expected esptool location beneath a packages directory
pub fn packaged_esptool_path(packages_dir: &Path) -> PathBuf {
    packages_dir.join(ESPTOOL_PACKAGE).join(ESPTOOL_SCRIPT)
}

/// Resolve the esptool executable to run.
///
/// An explicit override must exist as given. Otherwise the PlatformIO
/// packages directory is checked first, then the system PATH. Fails with
/// `ToolNotFound` naming the expected packaged location when nothing exists.
pub fn resolve_esptool(override_path: Option<&Path>, packages_dir: &Path) -> Result<PathBuf> {
    if let Some(path) = override_path {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        return Err(UploadError::ToolNotFound(path.to_path_buf()));
    }

    let packaged = packaged_esptool_path(packages_dir);
    if packaged.is_file() {
        log::debug!("Using PlatformIO esptool at {}", packaged.display());
        return Ok(packaged);
    }

    for candidate in [ESPTOOL_SCRIPT, "esptool"] {
        if let Ok(found) = which::which(candidate) {
            log::debug!("Using esptool from PATH: {}", found.display());
            return Ok(found);
        }
    }

    Err(UploadError::ToolNotFound(packaged))
}

/// Resolve the Python interpreter used to run a `.py` tool.
///
/// Prefers PlatformIO's bundled interpreter so esptool runs in the
/// environment it was installed with, then falls back to the system Python.
pub fn resolve_interpreter(override_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = override_path {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        log::warn!("Configured Python interpreter missing: {}", path.display());
        return Err(UploadError::InterpreterNotFound);
    }

    let bundled = platformio_python();
    if bundled.is_file() {
        log::debug!("Using PlatformIO Python at {}", bundled.display());
        return Ok(bundled);
    }

    for candidate in ["python3", "python"] {
        if let Ok(found) = which::which(candidate) {
            return Ok(found);
        }
    }

    Err(UploadError::InterpreterNotFound)
}

/// PlatformIO's bundled Python interpreter (`~/.platformio/penv`)
fn platformio_python() -> PathBuf {
    let penv = platformio_dir().join("penv");
    if cfg!(windows) {
        penv.join("Scripts").join("python.exe")
    } else {
        penv.join("bin").join("python")
    }
}

/// Whether a tool has to be run through a Python interpreter
pub fn needs_interpreter(tool: &Path) -> bool {
    tool.extension().is_some_and(|ext| ext == "py")
}

/// Directory the tool is installed in, used when running from the tool's
/// own directory
pub fn tool_install_dir(tool: &Path) -> PathBuf {
    match tool.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
