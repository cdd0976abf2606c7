//! Utility functions and helpers used throughout espupload

pub mod esptool_utils;
pub mod logging;
