//! Quill Core Library
//!
//! Configuration, error types and domain models shared by every Quill crate.
//! Nothing in here performs I/O.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::StorageBackend;
