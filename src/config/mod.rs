//! Configuration management for espupload

pub mod upload_config;

pub use upload_config::*;
