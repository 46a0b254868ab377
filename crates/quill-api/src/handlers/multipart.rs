//! Shared multipart handling for the upload handlers

use axum::extract::multipart::{Field, Multipart, MultipartError};
use axum::http::StatusCode;
use quill_core::AppError;
use quill_storage::{BlobStager, StagedBlob};

use crate::error::HttpAppError;

/// The body limit surfaces as a multipart error wherever the overflow lands.
fn multipart_error(e: MultipartError) -> HttpAppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return HttpAppError(AppError::PayloadTooLarge(e.body_text()));
    }
    HttpAppError(AppError::InvalidInput(format!(
        "Failed to read multipart: {}",
        e
    )))
}

pub async fn next_field(multipart: &mut Multipart) -> Result<Option<Field<'_>>, HttpAppError> {
    multipart.next_field().await.map_err(multipart_error)
}

pub async fn read_text(field: Field<'_>) -> Result<String, HttpAppError> {
    field.text().await.map_err(multipart_error)
}

/// Stream a file field to the staging directory.
///
/// Only one file field is accepted per request; a second one is rejected, and the
/// blob staged for the first is reclaimed when the caller drops it.
pub async fn stage_file_field(
    stager: &BlobStager,
    field: Field<'_>,
    already_staged: bool,
) -> Result<StagedBlob, HttpAppError> {
    let field_name = field.name().unwrap_or_default().to_string();
    if already_staged {
        return Err(HttpAppError(AppError::InvalidInput(format!(
            "Multiple '{}' fields are not allowed; send exactly one",
            field_name
        ))));
    }

    let original_filename = field.file_name().map(String::from);
    let content_type = field.content_type().map(String::from);

    let blob = stager
        .stage(
            Box::pin(field),
            original_filename.as_deref(),
            content_type.as_deref(),
        )
        .await?;
    Ok(blob)
}
