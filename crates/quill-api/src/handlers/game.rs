use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use quill_core::models::GameResponse;
use quill_core::AppError;

use crate::error::HttpAppError;
use crate::services::bounded;
use crate::state::StoreState;

#[tracing::instrument(skip(stores), fields(operation = "get_game"))]
pub async fn get_game(
    Path(gid): Path<String>,
    State(stores): State<StoreState>,
) -> Result<impl IntoResponse, HttpAppError> {
    let gid: i64 = gid
        .parse()
        .map_err(|_| AppError::InvalidInput(format!("Game id must be numeric, got '{}'", gid)))?;

    let game = bounded(
        stores.call_timeout,
        "game lookup",
        stores.games.get_by_id(gid),
    )
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Game {} not found", gid)))?;

    Ok(Json(GameResponse::new(gid, game)))
}
