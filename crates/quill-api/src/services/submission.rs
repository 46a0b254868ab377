//! Article submission pipeline.
//!
//! A submission moves `Staged → Authenticating → Uploading → Recording` and ends in
//! `Completed`, `Unauthorized` or `Failed`. Credentials are checked before any byte leaves
//! for the object store, and the document is only inserted once the upload returned.
//! The staged blob is reclaimed exactly once before `submit` returns, whichever terminal
//! state was reached; if the future is dropped midway the blob's `Drop` does it instead.
//!
//! There is no compensation: a document insert failing after a successful upload leaves
//! the object in the store, and its key is reported as orphaned.

use std::sync::Arc;
use std::time::Duration;

use quill_core::models::{Credentials, NewArticle, StoredObject};
use quill_core::AppError;
use quill_db::{ArticleStore, CredentialVerifier};
use quill_storage::{Reclaimed, StagedBlob, Storage};
use serde::Serialize;

use super::{bounded, upload_staged};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    Staged,
    Authenticating,
    Uploading,
    Recording,
    Completed,
    Unauthorized,
    Failed,
}

#[derive(Debug)]
pub enum SubmissionOutcome {
    Completed {
        document_id: String,
        object: StoredObject,
    },
    Unauthorized,
    Failed {
        /// State the pipeline was in when the error occurred
        stage: SubmissionState,
        error: AppError,
        /// Key of an object that was uploaded but never referenced by a document
        orphaned_key: Option<String>,
    },
}

impl SubmissionOutcome {
    pub fn state(&self) -> SubmissionState {
        match self {
            SubmissionOutcome::Completed { .. } => SubmissionState::Completed,
            SubmissionOutcome::Unauthorized => SubmissionState::Unauthorized,
            SubmissionOutcome::Failed { .. } => SubmissionState::Failed,
        }
    }
}

/// One staged upload plus the form fields submitted with it.
#[derive(Debug)]
pub struct SubmissionRequest {
    pub submission_id: String,
    pub credentials: Credentials,
    pub title: String,
    pub comments: String,
    pub blob: StagedBlob,
}

#[derive(Debug)]
pub struct SubmissionReport {
    pub submission_id: String,
    pub outcome: SubmissionOutcome,
    /// Every state entered, in order, ending with the terminal one
    pub transitions: Vec<SubmissionState>,
    pub reclaimed: Reclaimed,
}

#[derive(Clone)]
pub struct SubmissionOrchestrator {
    credentials: Arc<dyn CredentialVerifier>,
    storage: Arc<dyn Storage>,
    articles: Arc<dyn ArticleStore>,
    call_timeout: Duration,
}

impl SubmissionOrchestrator {
    pub fn new(
        credentials: Arc<dyn CredentialVerifier>,
        storage: Arc<dyn Storage>,
        articles: Arc<dyn ArticleStore>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            credentials,
            storage,
            articles,
            call_timeout,
        }
    }

    #[tracing::instrument(
        skip_all,
        fields(
            submission_id = %request.submission_id,
            identifier = %request.credentials.identifier,
            staged_file = %request.blob.filename(),
        )
    )]
    pub async fn submit(&self, request: SubmissionRequest) -> SubmissionReport {
        let SubmissionRequest {
            submission_id,
            credentials,
            title,
            comments,
            blob,
        } = request;

        let start = std::time::Instant::now();
        let mut transitions = vec![SubmissionState::Staged];

        let outcome = self
            .run(&mut transitions, &credentials, title, comments, &blob)
            .await;
        transitions.push(outcome.state());

        let reclaimed = blob.reclaim().await;

        match &outcome {
            SubmissionOutcome::Completed {
                document_id,
                object,
            } => tracing::info!(
                document_id = %document_id,
                object_key = %object.key,
                size_bytes = object.size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Submission completed"
            ),
            SubmissionOutcome::Unauthorized => {
                tracing::info!("Submission rejected: credentials not verified")
            }
            SubmissionOutcome::Failed {
                stage,
                error,
                orphaned_key,
            } => tracing::warn!(
                stage = ?stage,
                error = %error,
                orphaned_key = orphaned_key.as_deref(),
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Submission failed"
            ),
        }

        SubmissionReport {
            submission_id,
            outcome,
            transitions,
            reclaimed,
        }
    }

    async fn run(
        &self,
        transitions: &mut Vec<SubmissionState>,
        credentials: &Credentials,
        title: String,
        comments: String,
        blob: &StagedBlob,
    ) -> SubmissionOutcome {
        transitions.push(SubmissionState::Authenticating);
        let verified = bounded(
            self.call_timeout,
            "credential check",
            self.credentials
                .verify(&credentials.identifier, &credentials.secret),
        )
        .await;
        match verified {
            Ok(true) => {}
            Ok(false) => return SubmissionOutcome::Unauthorized,
            Err(error) => {
                return SubmissionOutcome::Failed {
                    stage: SubmissionState::Authenticating,
                    error,
                    orphaned_key: None,
                }
            }
        }

        transitions.push(SubmissionState::Uploading);
        let object = match upload_staged(self.storage.as_ref(), blob, self.call_timeout).await {
            Ok(object) => object,
            Err(error) => {
                return SubmissionOutcome::Failed {
                    stage: SubmissionState::Uploading,
                    error,
                    orphaned_key: None,
                }
            }
        };

        transitions.push(SubmissionState::Recording);
        let article = NewArticle {
            title,
            comments,
            image_key: object.key.clone(),
        };
        match bounded(
            self.call_timeout,
            "document insert",
            self.articles.insert(article),
        )
        .await
        {
            Ok(document_id) => SubmissionOutcome::Completed {
                document_id,
                object,
            },
            Err(error) => {
                tracing::error!(
                    error = %error,
                    orphaned_key = %object.key,
                    "Document insert failed after upload; object left without a document"
                );
                SubmissionOutcome::Failed {
                    stage: SubmissionState::Recording,
                    error,
                    orphaned_key: Some(object.key),
                }
            }
        }
    }
}
