//! Unauthenticated single-file upload: stage, put, reclaim.

use std::sync::Arc;
use std::time::Duration;

use quill_core::models::StoredObject;
use quill_core::AppError;
use quill_storage::{StagedBlob, Storage};

use super::upload_staged;

#[derive(Clone)]
pub struct UploadOrchestrator {
    storage: Arc<dyn Storage>,
    call_timeout: Duration,
}

impl UploadOrchestrator {
    pub fn new(storage: Arc<dyn Storage>, call_timeout: Duration) -> Self {
        Self {
            storage,
            call_timeout,
        }
    }

    /// Upload the blob and reclaim it, whether or not the upload succeeded.
    #[tracing::instrument(skip_all, fields(staged_file = %blob.filename(), size_bytes = blob.size()))]
    pub async fn upload(&self, blob: StagedBlob) -> Result<StoredObject, AppError> {
        let result = upload_staged(self.storage.as_ref(), &blob, self.call_timeout).await;
        blob.reclaim().await;

        match &result {
            Ok(object) => tracing::info!(object_key = %object.key, "Upload stored"),
            Err(e) => tracing::warn!(error = %e, "Upload failed"),
        }
        result
    }
}
