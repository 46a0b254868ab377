//! Test helpers: build AppState and router over in-memory stores.
//!
//! Run from workspace root: `cargo test -p quill-api`. No database, document store or
//! object store is needed; the fakes below journal every store call in order.

#![allow(dead_code)]

pub mod fakes;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use quill_api::setup::routes;
use quill_api::{AppState, Collaborators};
use quill_core::Config;
use quill_storage::BlobStager;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

use fakes::{FakeAccounts, FakeArticles, FakeGames, FakeStorage, Journal};

pub const TEST_IDENTIFIER: &str = "fred";
pub const TEST_SECRET: &str = "fred";
pub const TEST_PNG: &[u8] = b"\x89PNG\r\n\x1a\n not really an image";

/// Test application: server, fakes, and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub journal: Journal,
    pub accounts: Arc<FakeAccounts>,
    pub articles: Arc<FakeArticles>,
    pub games: Arc<FakeGames>,
    pub storage: Arc<FakeStorage>,
    pub tmp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn staging_dir(&self) -> &Path {
        self.tmp_dir.path()
    }

    /// Files left behind in TMP_DIR.
    pub fn staged_files(&self) -> Vec<String> {
        std::fs::read_dir(self.tmp_dir.path())
            .expect("Failed to read staging directory")
            .map(|entry| {
                entry
                    .expect("Failed to read directory entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect()
    }

    /// Wait for blobs dropped mid-request to leave TMP_DIR.
    pub async fn staging_drains(&self) -> bool {
        for _ in 0..200 {
            if self.staged_files().is_empty() {
                return true;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        false
    }

    pub fn calls(&self) -> Vec<String> {
        self.journal.calls()
    }
}

pub fn test_config(tmp_dir: &Path) -> Config {
    test_config_with(tmp_dir, &[])
}

/// `test_config` with some variables replaced.
pub fn test_config_with(tmp_dir: &Path, overrides: &[(&str, &str)]) -> Config {
    let tmp_dir = tmp_dir.display().to_string();
    let overrides: Vec<(String, String)> = overrides
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(move |key| {
        if let Some((_, value)) = overrides.iter().find(|(k, _)| k == key) {
            return Some(value.clone());
        }
        let value = match key {
            "MYSQL_USER" => "fred",
            "MONGO_DATABASE" => "paf2020",
            "MONGO_COLLECTION" => "articles",
            "STORAGE_BACKEND" => "local",
            "LOCAL_STORAGE_PATH" => "/unused",
            "LOCAL_STORAGE_BASE_URL" => "http://localhost:3000/media",
            "STORE_CALL_TIMEOUT_SECS" => "2",
            "MAX_UPLOAD_SIZE_MB" => "1",
            "TMP_DIR" => tmp_dir.as_str(),
            _ => return None,
        };
        Some(value.to_string())
    })
    .expect("Failed to build test config")
}

/// Setup test app with one account (`fred`/`fred`) and a single catalog entry.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(&[]).await
}

/// Same as `setup_test_app`, with config variables replaced.
pub async fn setup_test_app_with(overrides: &[(&str, &str)]) -> TestApp {
    let tmp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let config = test_config_with(tmp_dir.path(), overrides);

    let journal = Journal::default();
    let accounts = Arc::new(FakeAccounts::new(journal.clone()));
    accounts.add(TEST_IDENTIFIER, TEST_SECRET);
    let articles = Arc::new(FakeArticles::new(journal.clone()));
    let games = Arc::new(FakeGames::default());
    games.add(7, "Catan", Some(1995));
    let storage = Arc::new(FakeStorage::new(journal.clone()));

    let stager = BlobStager::new(config.tmp_dir(), config.max_upload_size_bytes())
        .await
        .expect("Failed to create stager");

    let collaborators = Collaborators {
        credentials: accounts.clone(),
        articles: articles.clone(),
        games: games.clone(),
        storage: storage.clone(),
        relational_health: accounts.clone(),
        document_health: articles.clone(),
    };
    let state = Arc::new(AppState::new(config.clone(), collaborators, stager));
    let app = routes::setup_routes(&config, state).expect("Failed to build routes");
    let server = TestServer::new(app).expect("Failed to create test server");

    TestApp {
        server,
        journal,
        accounts,
        articles,
        games,
        storage,
        tmp_dir,
    }
}

pub fn image_part() -> Part {
    Part::bytes(TEST_PNG.to_vec())
        .file_name("catan.png")
        .mime_type("image/png")
}

/// The form the article page posts to `/share`.
pub fn share_form(identifier: &str, secret: &str) -> MultipartForm {
    MultipartForm::new()
        .add_text("username", identifier.to_string())
        .add_text("password", secret.to_string())
        .add_text("title", "Catan")
        .add_text("comments", "Sheep for wood?")
        .add_part("image", image_part())
}
