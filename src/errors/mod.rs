//! Error types used throughout espupload

pub mod types;

pub use types::*;
