//! Data models and types used throughout espupload

pub mod flash;

pub use flash::*;
