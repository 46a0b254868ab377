use chrono::{DateTime, Utc};
use mongodb::bson::{self, doc, oid::ObjectId};
use mongodb::{Client, Collection};
use quill_core::models::{Article, NewArticle};
use quill_core::AppError;
use serde::{Deserialize, Serialize};

/// Article as laid out in the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub ts: bson::DateTime,
    pub title: String,
    pub comments: String,
    pub image: String,
}

impl ArticleRecord {
    pub fn new(article: NewArticle, ts: DateTime<Utc>) -> Self {
        ArticleRecord {
            id: None,
            ts: bson::DateTime::from_millis(ts.timestamp_millis()),
            title: article.title,
            comments: article.comments,
            image: article.image_key,
        }
    }

    pub fn into_article(self) -> Result<Article, AppError> {
        let id = self
            .id
            .ok_or_else(|| AppError::DocumentStore("Article record has no _id".to_string()))?;
        let ts = DateTime::<Utc>::from_timestamp_millis(self.ts.timestamp_millis())
            .ok_or_else(|| AppError::DocumentStore("Article timestamp out of range".to_string()))?;
        Ok(Article {
            id: id.to_hex(),
            ts,
            title: self.title,
            comments: self.comments,
            image: self.image,
        })
    }
}

/// Article documents in the single configured collection.
#[derive(Clone)]
pub struct ArticleRepository {
    client: Client,
    collection: Collection<ArticleRecord>,
}

impl ArticleRepository {
    pub fn new(client: Client, database: &str, collection: &str) -> Self {
        let collection = client.database(database).collection(collection);
        Self { client, collection }
    }

    /// Insert a new article stamped with the current time; returns the generated id as hex.
    #[tracing::instrument(skip(self, article), fields(db.collection = %self.collection.name(), db.operation = "insert"))]
    pub async fn insert(&self, article: NewArticle) -> Result<String, AppError> {
        let image_key = article.image_key.clone();
        let record = ArticleRecord::new(article, Utc::now());

        let result = self.collection.insert_one(record).await.map_err(|e| {
            tracing::error!(error = %e, image_key = %image_key, "Failed to insert article");
            AppError::DocumentStore(e.to_string())
        })?;

        let id = match result.inserted_id {
            bson::Bson::ObjectId(oid) => oid.to_hex(),
            other => other.to_string(),
        };

        tracing::info!(article_id = %id, image_key = %image_key, "Article inserted");
        Ok(id)
    }

    #[tracing::instrument(skip(self), fields(db.collection = %self.collection.name(), db.operation = "select"))]
    pub async fn get(&self, id: &str) -> Result<Option<Article>, AppError> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(None);
        };

        let record = self
            .collection
            .find_one(doc! { "_id": oid })
            .await
            .map_err(|e| {
                tracing::error!(error = %e, article_id = %id, "Failed to get article");
                AppError::DocumentStore(e.to_string())
            })?;

        record.map(ArticleRecord::into_article).transpose()
    }

    /// Run the server `ping` command, used at startup and by the health check.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| ())
            .map_err(|e| AppError::DocumentStore(e.to_string()))
    }
}
