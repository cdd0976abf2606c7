//! espupload - LittleFS Image Uploader for ESP32 Boards
//!
//! espupload writes a prebuilt LittleFS filesystem image into the storage
//! partition of an ESP32 board by driving the esptool.py that ships inside a
//! PlatformIO installation. It resolves the tool, assembles the write_flash
//! invocation, runs it as a child process and mirrors the tool's exit code.

pub mod cli;
pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use errors::*;
pub use models::*;

/// espupload version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// espupload application name
pub const APP_NAME: &str = "espupload";
