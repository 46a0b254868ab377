//! Repository trait abstractions
//!
//! The submission pipeline and handlers depend on these traits rather than on the
//! concrete repositories, so they can run against in-memory fakes in tests.

use async_trait::async_trait;
use quill_core::models::{Article, Game, NewArticle};
use quill_core::AppError;

use crate::db::{AccountRepository, ArticleRepository, GameRepository};

/// Checks an identifier/secret pair against the account store.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// `Ok(false)` for unknown identifiers and wrong secrets alike; `Err` only on store faults.
    async fn verify(&self, identifier: &str, secret: &str) -> Result<bool, AppError>;
}

/// Writes and reads article documents.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Insert a document referencing an already-uploaded object; returns the generated id.
    async fn insert(&self, article: NewArticle) -> Result<String, AppError>;

    async fn get(&self, id: &str) -> Result<Option<Article>, AppError>;
}

/// Catalog lookups by numeric id.
#[async_trait]
pub trait GameCatalog: Send + Sync {
    async fn get_by_id(&self, gid: i64) -> Result<Option<Game>, AppError>;
}

/// Reachability probe for a backing store.
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> Result<(), AppError>;
}

// Implementations for concrete repository types

#[async_trait]
impl CredentialVerifier for AccountRepository {
    async fn verify(&self, identifier: &str, secret: &str) -> Result<bool, AppError> {
        AccountRepository::verify(self, identifier, secret).await
    }
}

#[async_trait]
impl StoreHealth for AccountRepository {
    async fn ping(&self) -> Result<(), AppError> {
        AccountRepository::ping(self).await
    }
}

#[async_trait]
impl GameCatalog for GameRepository {
    async fn get_by_id(&self, gid: i64) -> Result<Option<Game>, AppError> {
        GameRepository::get_by_id(self, gid).await
    }
}

#[async_trait]
impl ArticleStore for ArticleRepository {
    async fn insert(&self, article: NewArticle) -> Result<String, AppError> {
        ArticleRepository::insert(self, article).await
    }

    async fn get(&self, id: &str) -> Result<Option<Article>, AppError> {
        ArticleRepository::get(self, id).await
    }
}

#[async_trait]
impl StoreHealth for ArticleRepository {
    async fn ping(&self) -> Result<(), AppError> {
        ArticleRepository::ping(self).await
    }
}
