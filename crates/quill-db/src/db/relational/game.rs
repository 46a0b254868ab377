use quill_core::models::Game;
use quill_core::AppError;
use sqlx::{MySql, MySqlPool};

const SQL_GET_GAME_BY_ID: &str = "SELECT name, year, url, image FROM game WHERE gid = ?";

/// Read-only access to the game catalog.
#[derive(Clone)]
pub struct GameRepository {
    pool: MySqlPool,
}

impl GameRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "game", db.operation = "select"))]
    pub async fn get_by_id(&self, gid: i64) -> Result<Option<Game>, AppError> {
        let game = sqlx::query_as::<MySql, Game>(SQL_GET_GAME_BY_ID)
            .bind(gid)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, gid, "Failed to get game by id");
                AppError::Database(e)
            })?;

        Ok(game)
    }
}
