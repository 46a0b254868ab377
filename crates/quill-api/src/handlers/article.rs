use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use quill_core::models::ArticleResponse;
use quill_core::AppError;

use crate::error::HttpAppError;
use crate::services::bounded;
use crate::state::StoreState;

/// Read back a submitted article, with the public URL of its image.
#[tracing::instrument(skip(stores), fields(operation = "get_article"))]
pub async fn get_article(
    Path(id): Path<String>,
    State(stores): State<StoreState>,
) -> Result<impl IntoResponse, HttpAppError> {
    let article = bounded(stores.call_timeout, "article lookup", stores.articles.get(&id))
        .await?
        .ok_or_else(|| AppError::NotFound("Article not found".to_string()))?;

    let image_url = stores.storage.public_url(&article.image);
    Ok(Json(ArticleResponse::new(article, image_url)))
}
