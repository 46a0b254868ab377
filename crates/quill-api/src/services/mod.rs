//! Request pipelines built on the store seams.

pub mod submission;
pub mod upload;

pub use submission::{
    SubmissionOrchestrator, SubmissionOutcome, SubmissionReport, SubmissionRequest,
    SubmissionState,
};
pub use upload::UploadOrchestrator;

use std::future::Future;
use std::time::Duration;

use quill_core::models::StoredObject;
use quill_core::AppError;
use quill_storage::{StagedBlob, Storage};

/// Run one store call under `timeout`; expiry becomes `AppError::Timeout`.
pub async fn bounded<T, F>(timeout: Duration, operation: &str, call: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(
                operation,
                timeout_secs = timeout.as_secs_f64(),
                "Store call timed out"
            );
            Err(AppError::Timeout {
                operation: operation.to_string(),
                seconds: timeout.as_secs(),
            })
        }
    }
}

/// Read a staged blob back and put it to the object store under its generated filename.
pub(crate) async fn upload_staged(
    storage: &dyn Storage,
    blob: &StagedBlob,
    timeout: Duration,
) -> Result<StoredObject, AppError> {
    let data = blob.read().await?;
    let key = blob.filename();

    let url = bounded(timeout, "object upload", async {
        storage
            .upload_with_key(key, data, blob.content_type())
            .await
            .map_err(AppError::from)
    })
    .await?;

    Ok(StoredObject {
        backend: storage.backend_type(),
        bucket: storage.bucket().map(String::from),
        key: key.to_string(),
        url,
        content_type: blob.content_type().to_string(),
        size: blob.size(),
    })
}
