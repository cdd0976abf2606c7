//! Upload configuration with layered sources
//!
//! Values are resolved as: built-in defaults, then `espupload.toml`, then
//! `ESPUPLOAD_*` environment variables, then command line flags. The defaults
//! match the values the upload has historically been run with, so a bare
//! `espupload` keeps working on the board this project targets.

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the current directory
pub const CONFIG_FILE: &str = "espupload.toml";

/// Default serial port of the target board
pub const DEFAULT_PORT: &str = "COM3";

/// Default flash offset of the storage partition
pub const DEFAULT_OFFSET: u32 = 0x580000;

/// Default filesystem image filename
pub const DEFAULT_IMAGE: &str = "littlefs_image.bin";

/// Main upload configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Serial port the board is attached to
    pub port: String,
    /// Flash offset the image is written at
    #[serde(deserialize_with = "deserialize_offset")]
    pub offset: u32,
    /// Path to the filesystem image
    pub image: PathBuf,
    /// PlatformIO packages directory, overriding ~/.platformio/packages
    pub packages_dir: Option<PathBuf>,
    /// Explicit path to esptool.py, skipping discovery
    pub esptool: Option<PathBuf>,
    /// Python interpreter used to run esptool.py
    pub python: Option<PathBuf>,
    /// Chip type forwarded to esptool
    pub chip: Option<String>,
    /// Baud rate for the serial connection
    pub baud: Option<u32>,
    /// Stream tool output to the terminal instead of capturing it
    pub stream: bool,
    /// Run the tool from its install directory
    pub run_in_tool_dir: bool,
    /// Kill the tool if it runs longer than this many seconds
    pub timeout_secs: Option<u64>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            offset: DEFAULT_OFFSET,
            image: PathBuf::from(DEFAULT_IMAGE),
            packages_dir: None,
            esptool: None,
            python: None,
            chip: None,
            baud: None,
            stream: false,
            run_in_tool_dir: false,
            timeout_secs: None,
        }
    }
}

impl UploadConfig {
    /// Load configuration from a file, falling back to defaults.
    ///
    /// An explicitly given path must exist; the default `espupload.toml` is
    /// optional and silently skipped when absent.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(CONFIG_FILE), false),
        };

        if !path.exists() {
            if required {
                anyhow::bail!("Configuration file not found: {}", path.display());
            }
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply `ESPUPLOAD_*` environment variables on top of the current values.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|name| std::env::var(name).ok());
    }

    /// Apply environment overrides through a lookup function.
    pub fn apply_env_from<F>(&mut self, get: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = get("ESPUPLOAD_PORT") {
            self.port = port;
        }
        if let Some(offset) = get("ESPUPLOAD_OFFSET") {
            match parse_offset(&offset) {
                Ok(offset) => self.offset = offset,
                Err(err) => log::warn!("Ignoring ESPUPLOAD_OFFSET: {}", err),
            }
        }
        if let Some(image) = get("ESPUPLOAD_IMAGE") {
            self.image = PathBuf::from(image);
        }
        if let Some(dir) = get("ESPUPLOAD_PACKAGES_DIR") {
            self.packages_dir = Some(PathBuf::from(dir));
        }
        if let Some(tool) = get("ESPUPLOAD_ESPTOOL") {
            self.esptool = Some(PathBuf::from(tool));
        }
        if let Some(python) = get("ESPUPLOAD_PYTHON") {
            self.python = Some(PathBuf::from(python));
        }
    }
}

/// Parse a flash offset given as hexadecimal (`0x580000`) or decimal text.
pub fn parse_offset(value: &str) -> std::result::Result<u32, String> {
    let value = value.trim();
    let parsed = if let Some(hex) = value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16)
    } else {
        value.parse::<u32>()
    };
    parsed.map_err(|_| format!("Invalid flash offset: {}", value))
}

/// Accept the offset either as a TOML integer (including `0x` literals) or as
/// a quoted hex string.
fn deserialize_offset<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Offset {
        Number(u32),
        Text(String),
    }

    match Offset::deserialize(deserializer)? {
        Offset::Number(offset) => Ok(offset),
        Offset::Text(text) => parse_offset(&text).map_err(serde::de::Error::custom),
    }
}
