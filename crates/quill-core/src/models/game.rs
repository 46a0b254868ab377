use serde::{Deserialize, Serialize};

/// A catalog record. Pre-existing and read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Game {
    pub name: String,
    pub year: Option<i32>,
    pub url: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GameResponse {
    pub gid: i64,
    pub name: String,
    pub year: Option<i32>,
    pub url: Option<String>,
    pub image: Option<String>,
}

impl GameResponse {
    pub fn new(gid: i64, game: Game) -> Self {
        GameResponse {
            gid,
            name: game.name,
            year: game.year,
            url: game.url,
            image: game.image,
        }
    }
}
