use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fields of an article supplied by the client, plus the key of its already-uploaded image.
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub title: String,
    pub comments: String,
    pub image_key: String,
}

/// An article document as stored in the document store.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    /// Store-generated identifier, hex encoded
    pub id: String,
    pub ts: DateTime<Utc>,
    pub title: String,
    pub comments: String,
    /// Object store key of the article's image
    pub image: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ArticleResponse {
    pub id: String,
    pub ts: DateTime<Utc>,
    pub title: String,
    pub comments: String,
    pub image: String,
    pub image_url: String,
}

impl ArticleResponse {
    pub fn new(article: Article, image_url: String) -> Self {
        ArticleResponse {
            id: article.id,
            ts: article.ts,
            title: article.title,
            comments: article.comments,
            image: article.image,
            image_url,
        }
    }
}
