use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use quill_core::models::Credentials;
use quill_core::AppError;
use serde::Serialize;

use crate::error::{HttpAppError, ValidatedJson};
use crate::services::bounded;
use crate::state::StoreState;

#[derive(Debug, Serialize)]
pub struct AuthenticateResponse {
    pub status: u16,
}

/// Check a username/password pair without writing anything.
#[tracing::instrument(skip_all, fields(identifier = %credentials.identifier, operation = "authenticate"))]
pub async fn authenticate(
    State(stores): State<StoreState>,
    ValidatedJson(credentials): ValidatedJson<Credentials>,
) -> Result<impl IntoResponse, HttpAppError> {
    let verified = bounded(
        stores.call_timeout,
        "credential check",
        stores
            .credentials
            .verify(&credentials.identifier, &credentials.secret),
    )
    .await?;

    if !verified {
        return Err(AppError::Unauthorized("Invalid username or password".to_string()).into());
    }

    Ok(Json(AuthenticateResponse { status: 200 }))
}
