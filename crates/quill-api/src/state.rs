//! Application state and sub-state extractors.
//!
//! Built once at startup and shared by every request. Handlers extract either the whole
//! `Arc<AppState>` or just the sub-state they need via Axum's `FromRef`.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::FromRef;
use quill_core::Config;
use quill_db::{ArticleStore, CredentialVerifier, GameCatalog, StoreHealth};
use quill_storage::{BlobStager, Storage};

use crate::services::{SubmissionOrchestrator, UploadOrchestrator};

/// The store seams the application runs against.
#[derive(Clone)]
pub struct Collaborators {
    pub credentials: Arc<dyn CredentialVerifier>,
    pub articles: Arc<dyn ArticleStore>,
    pub games: Arc<dyn GameCatalog>,
    pub storage: Arc<dyn Storage>,
    pub relational_health: Arc<dyn StoreHealth>,
    pub document_health: Arc<dyn StoreHealth>,
}

// ----- Sub-state types -----

/// Read paths and the standalone credential check.
#[derive(Clone)]
pub struct StoreState {
    pub credentials: Arc<dyn CredentialVerifier>,
    pub articles: Arc<dyn ArticleStore>,
    pub games: Arc<dyn GameCatalog>,
    pub storage: Arc<dyn Storage>,
    pub call_timeout: Duration,
}

/// Staging plus the two write pipelines.
#[derive(Clone)]
pub struct UploadState {
    pub stager: BlobStager,
    pub submissions: SubmissionOrchestrator,
    pub uploads: UploadOrchestrator,
}

#[derive(Clone)]
pub struct HealthState {
    pub relational: Arc<dyn StoreHealth>,
    pub documents: Arc<dyn StoreHealth>,
    pub storage: Arc<dyn Storage>,
    pub timeout: Duration,
}

pub struct AppState {
    pub stores: StoreState,
    pub uploads: UploadState,
    pub health: HealthState,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, collaborators: Collaborators, stager: BlobStager) -> Self {
        let call_timeout = Duration::from_secs(config.store_call_timeout_secs());
        let Collaborators {
            credentials,
            articles,
            games,
            storage,
            relational_health,
            document_health,
        } = collaborators;

        let submissions = SubmissionOrchestrator::new(
            credentials.clone(),
            storage.clone(),
            articles.clone(),
            call_timeout,
        );
        let uploads = UploadOrchestrator::new(storage.clone(), call_timeout);

        AppState {
            stores: StoreState {
                credentials,
                articles,
                games,
                storage: storage.clone(),
                call_timeout,
            },
            uploads: UploadState {
                stager,
                submissions,
                uploads,
            },
            health: HealthState {
                relational: relational_health,
                documents: document_health,
                storage,
                timeout: call_timeout,
            },
            config,
        }
    }
}

// ----- FromRef for sub-state extraction -----

impl FromRef<Arc<AppState>> for StoreState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.stores.clone()
    }
}

impl FromRef<Arc<AppState>> for UploadState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.uploads.clone()
    }
}

impl FromRef<Arc<AppState>> for HealthState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.health.clone()
    }
}
