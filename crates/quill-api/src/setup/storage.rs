//! Storage setup and initialization

use std::sync::Arc;

use anyhow::{Context, Result};
use quill_core::{Config, StorageBackend};
use quill_storage::{create_storage, BlobStager, Storage};

/// Create the staging directory for inbound uploads.
pub async fn setup_stager(config: &Config) -> Result<BlobStager> {
    let stager = BlobStager::new(config.tmp_dir(), config.max_upload_size_bytes())
        .await
        .context("Failed to prepare TMP_DIR")?;
    tracing::info!(
        dir = %stager.dir().display(),
        max_upload_bytes = stager.max_size(),
        "Staging directory ready"
    );
    Ok(stager)
}

/// Build the object store; S3 refuses to start without access credentials.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!("Initializing storage abstraction...");

    if config.storage_backend() == StorageBackend::S3
        && (config.aws_access_key_id().is_none() || config.aws_secret_access_key().is_none())
    {
        return Err(anyhow::anyhow!(
            "AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY must be set when using S3 storage backend"
        ));
    }

    let storage = create_storage(config).await?;
    tracing::info!(
        backend = ?storage.backend_type(),
        bucket = storage.bucket(),
        "Storage abstraction initialized successfully"
    );

    Ok(storage)
}
