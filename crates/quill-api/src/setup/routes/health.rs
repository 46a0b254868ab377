//! Health check handler and response type.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::state::HealthState;

/// Run an async check with timeout; returns status string "healthy", "timeout", or "{prefix}: {error}".
async fn run_check<F, E>(timeout: Duration, f: F, error_prefix: &str) -> String
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    match tokio::time::timeout(timeout, f).await {
        Ok(Ok(())) => "healthy".to_string(),
        Ok(Err(e)) => format!("{}: {}", error_prefix, e),
        Err(_) => "timeout".to_string(),
    }
}

#[derive(serde::Serialize)]
pub(super) struct HealthCheckResponse {
    pub status: String,
    pub database: String,
    pub document_store: String,
    pub storage: String,
}

/// Ping the relational and document stores and probe the object store.
pub async fn health_check(State(health): State<HealthState>) -> impl IntoResponse {
    let (database, document_store, storage) = tokio::join!(
        run_check(health.timeout, health.relational.ping(), "unhealthy"),
        run_check(health.timeout, health.documents.ping(), "unhealthy"),
        run_check(health.timeout, health.storage.health_check(), "unhealthy"),
    );

    let overall_healthy = [&database, &document_store, &storage]
        .iter()
        .all(|status| status.as_str() == "healthy");

    if !overall_healthy {
        tracing::warn!(
            database = %database,
            document_store = %document_store,
            storage = %storage,
            "Health check failed"
        );
    }

    let response = HealthCheckResponse {
        status: if overall_healthy { "healthy" } else { "unhealthy" }.to_string(),
        database,
        document_store,
        storage,
    };

    let status_code = if overall_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
