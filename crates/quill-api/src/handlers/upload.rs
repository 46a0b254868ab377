use axum::extract::{Multipart, State};
use axum::response::IntoResponse;
use axum::Json;
use quill_core::AppError;
use quill_storage::StagedBlob;
use serde::Serialize;

use super::multipart::{next_field, stage_file_field};
use crate::error::HttpAppError;
use crate::state::UploadState;

const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: &'static str,
    pub key: String,
    pub url: String,
}

/// Store one file in the object store without authentication or a document.
#[tracing::instrument(skip_all, fields(operation = "upload"))]
pub async fn upload(
    State(uploads): State<UploadState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let mut staged: Option<StagedBlob> = None;

    while let Some(field) = next_field(&mut multipart).await? {
        if field.name() == Some(FILE_FIELD) {
            let blob = stage_file_field(&uploads.stager, field, staged.is_some()).await?;
            staged = Some(blob);
        }
    }

    let blob = staged.ok_or_else(|| {
        AppError::InvalidInput(format!("No file provided in '{}' field", FILE_FIELD))
    })?;

    let object = uploads.uploads.upload(blob).await?;

    Ok(Json(UploadResponse {
        status: "OK",
        key: object.key,
        url: object.url,
    }))
}
