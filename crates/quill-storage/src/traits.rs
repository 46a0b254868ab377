//! Storage abstraction trait
//!
//! This module defines the Storage trait that all object store backends implement.

use crate::StorageBackend;
use async_trait::async_trait;
use quill_core::AppError;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Upload stream error: {0}")]
    PayloadStream(String),

    #[error("Upload exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(msg) => AppError::NotFound(msg),
            StorageError::UploadFailed(msg) => AppError::S3(msg),
            StorageError::BackendError(msg) => AppError::S3(msg),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            StorageError::IoError(err) => AppError::LocalIo(err.to_string()),
            StorageError::PayloadStream(msg) => {
                AppError::InvalidInput(format!("Failed to read upload: {}", msg))
            }
            StorageError::TooLarge { limit } => AppError::PayloadTooLarge(format!(
                "File exceeds the maximum upload size of {} bytes",
                limit
            )),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
        }
    }
}

/// Storage abstraction trait
///
/// The submission pipeline writes one object per accepted upload and never deletes it.
/// Every object is written with public-read visibility, so `public_url` is the stable
/// address clients use to fetch it.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload data under `storage_key` with the declared content type.
    /// Returns the public URL of the new object.
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String>;

    /// Check if an object exists
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Cheap reachability probe used by the health endpoint
    async fn health_check(&self) -> StorageResult<()>;

    /// Public URL for a key, derived from endpoint, bucket and key without a network call
    fn public_url(&self, storage_key: &str) -> String;

    /// Bucket name, when the backend has one
    fn bucket(&self) -> Option<&str>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
