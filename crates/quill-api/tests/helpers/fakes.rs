//! In-memory stand-ins for the three backing stores.

use async_trait::async_trait;
use chrono::Utc;
use quill_core::models::{Article, Game, NewArticle};
use quill_core::{AppError, StorageBackend};
use quill_db::{hash_secret, ArticleStore, CredentialVerifier, GameCatalog, StoreHealth};
use quill_storage::{Storage, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub const PUBLIC_BASE_URL: &str = "https://quill.sfo2.digitaloceanspaces.com";

/// Ordered record of store calls shared by every fake.
#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn record(&self, call: impl Into<String>) {
        self.0.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Accounts keyed by identifier, holding secret digests like the account table does.
pub struct FakeAccounts {
    journal: Journal,
    hashes: Mutex<HashMap<String, String>>,
    unavailable: AtomicBool,
}

impl FakeAccounts {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            hashes: Mutex::default(),
            unavailable: AtomicBool::new(false),
        }
    }

    pub fn add(&self, identifier: &str, secret: &str) {
        self.hashes
            .lock()
            .unwrap()
            .insert(identifier.to_string(), hash_secret(secret));
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait]
impl CredentialVerifier for FakeAccounts {
    async fn verify(&self, identifier: &str, secret: &str) -> Result<bool, AppError> {
        self.journal.record("verify");
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        let digest = hash_secret(secret);
        Ok(self.hashes.lock().unwrap().get(identifier) == Some(&digest))
    }
}

#[async_trait]
impl StoreHealth for FakeAccounts {
    async fn ping(&self) -> Result<(), AppError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

pub struct StoredBytes {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// Object store keeping bodies in memory. Uploads can be switched to fail.
pub struct FakeStorage {
    journal: Journal,
    pub objects: Mutex<HashMap<String, StoredBytes>>,
    fail_uploads: AtomicBool,
}

impl FakeStorage {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            objects: Mutex::default(),
            fail_uploads: AtomicBool::new(false),
        }
    }

    pub fn set_fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }
}

#[async_trait]
impl Storage for FakeStorage {
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String> {
        self.journal.record(format!("upload:{}", storage_key));
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed(
                "AccessDenied: signature mismatch for AKIA1234".to_string(),
            ));
        }
        self.objects.lock().unwrap().insert(
            storage_key.to_string(),
            StoredBytes {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(self.public_url(storage_key))
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        Ok(self.objects.lock().unwrap().contains_key(storage_key))
    }

    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!("{}/{}", PUBLIC_BASE_URL, storage_key)
    }

    fn bucket(&self) -> Option<&str> {
        Some("quill")
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

/// Article collection keyed by a 24-hex-digit id. Inserts can be switched to fail.
pub struct FakeArticles {
    journal: Journal,
    pub documents: Mutex<Vec<Article>>,
    fail_inserts: AtomicBool,
}

impl FakeArticles {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            documents: Mutex::default(),
            fail_inserts: AtomicBool::new(false),
        }
    }

    pub fn set_fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    pub fn document_count(&self) -> usize {
        self.documents.lock().unwrap().len()
    }
}

#[async_trait]
impl ArticleStore for FakeArticles {
    async fn insert(&self, article: NewArticle) -> Result<String, AppError> {
        self.journal.record(format!("insert:{}", article.image_key));
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(AppError::DocumentStore(
                "NotWritablePrimary at mongo-0.internal:27017".to_string(),
            ));
        }
        let mut documents = self.documents.lock().unwrap();
        let id = format!("{:024x}", documents.len() + 1);
        documents.push(Article {
            id: id.clone(),
            ts: Utc::now(),
            title: article.title,
            comments: article.comments,
            image: article.image_key,
        });
        Ok(id)
    }

    async fn get(&self, id: &str) -> Result<Option<Article>, AppError> {
        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }
}

#[async_trait]
impl StoreHealth for FakeArticles {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeGames {
    games: Mutex<HashMap<i64, Game>>,
}

impl FakeGames {
    pub fn add(&self, gid: i64, name: &str, year: Option<i32>) {
        self.games.lock().unwrap().insert(
            gid,
            Game {
                name: name.to_string(),
                year,
                url: Some(format!("https://boardgamegeek.com/boardgame/{}", gid)),
                image: None,
            },
        );
    }
}

#[async_trait]
impl GameCatalog for FakeGames {
    async fn get_by_id(&self, gid: i64) -> Result<Option<Game>, AppError> {
        Ok(self.games.lock().unwrap().get(&gid).cloned())
    }
}
