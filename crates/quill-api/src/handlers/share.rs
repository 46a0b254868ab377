use axum::extract::{Multipart, State};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use quill_core::models::Credentials;
use quill_core::AppError;
use quill_infra::RequestId;
use quill_storage::StagedBlob;
use serde::Serialize;

use super::multipart::{next_field, read_text, stage_file_field};
use crate::error::HttpAppError;
use crate::services::{SubmissionOutcome, SubmissionRequest};
use crate::state::UploadState;

const IMAGE_FIELD: &str = "image";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareResponse {
    pub status: u16,
    pub inserted_id: String,
    pub key: String,
    pub url: String,
}

#[derive(Default)]
struct ShareForm {
    username: String,
    password: String,
    title: String,
    comments: String,
    image: Option<StagedBlob>,
}

/// Submit an article: the image is staged, then credentials are checked, then the image
/// is uploaded and the article document recorded.
#[tracing::instrument(skip_all, fields(operation = "share"))]
pub async fn share(
    State(uploads): State<UploadState>,
    Extension(request_id): Extension<RequestId>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let mut form = ShareForm::default();

    while let Some(field) = next_field(&mut multipart).await? {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();
        match field_name.as_str() {
            "username" => form.username = read_text(field).await?,
            "password" => form.password = read_text(field).await?,
            "title" => form.title = read_text(field).await?,
            "comments" => form.comments = read_text(field).await?,
            IMAGE_FIELD => {
                let blob =
                    stage_file_field(&uploads.stager, field, form.image.is_some()).await?;
                form.image = Some(blob);
            }
            _ => {}
        }
    }

    let blob = form.image.ok_or_else(|| {
        AppError::InvalidInput(format!("No file provided in '{}' field", IMAGE_FIELD))
    })?;

    let report = uploads
        .submissions
        .submit(SubmissionRequest {
            submission_id: request_id.0,
            credentials: Credentials::new(form.username, form.password),
            title: form.title,
            comments: form.comments,
            blob,
        })
        .await;

    match report.outcome {
        SubmissionOutcome::Completed {
            document_id,
            object,
        } => Ok(Json(ShareResponse {
            status: 200,
            inserted_id: document_id,
            key: object.key,
            url: object.url,
        })),
        SubmissionOutcome::Unauthorized => {
            Err(AppError::Unauthorized("Invalid username or password".to_string()).into())
        }
        SubmissionOutcome::Failed { error, .. } => Err(error.into()),
    }
}
