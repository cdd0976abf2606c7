//! Services module containing the upload orchestration
//!
//! The upload service is the single place that validates a flash request,
//! assembles the esptool invocation and executes it, so the CLI entry points
//! all share the same behavior.

pub mod upload_service;

pub use upload_service::*;
