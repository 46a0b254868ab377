//! Quill Storage Library
//!
//! Object store abstraction with S3-compatible and local filesystem backends, plus the
//! blob stager that holds an inbound upload on local disk for the length of one request.
//!
//! # Object key format
//!
//! Object keys are the generated filename a blob was staged under: 32 lowercase hex
//! characters, with no directory prefix. Keys must not contain `..`, a leading `/` or
//! control characters; validation is centralized in the `keys` module so every backend
//! agrees on what a key is.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod staging;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use quill_core::StorageBackend;
#[cfg(feature = "storage-s3")]
pub use s3::{S3Settings, S3Storage};
pub use staging::{BlobStager, Reclaimed, StagedBlob};
pub use traits::{Storage, StorageError, StorageResult};
