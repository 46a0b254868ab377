//! Application setup and initialization
//!
//! Startup order: configuration, telemetry, staging directory, relational pool, document
//! store client, object store. Any step failing aborts startup before the listener binds.

pub mod database;
pub mod document_store;
pub mod routes;
pub mod server;
pub mod storage;
pub mod validation;

use std::sync::Arc;

use anyhow::{Context, Result};
use quill_core::Config;
use quill_db::{AccountRepository, ArticleRepository, GameRepository};

use crate::state::{AppState, Collaborators};

pub const SERVICE_NAME: &str = "quill-api";

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;

    quill_infra::init_telemetry(SERVICE_NAME, config.environment())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");

    let stager = storage::setup_stager(&config).await?;
    let pool = database::setup_database(&config).await?;
    let client = document_store::setup_document_store(&config).await?;
    let object_store = storage::setup_storage(&config).await?;

    let accounts = Arc::new(AccountRepository::new(pool.clone(), config.mysql())?);
    let games = Arc::new(GameRepository::new(pool));
    let articles = Arc::new(ArticleRepository::new(
        client,
        &config.mongo().database,
        &config.mongo().collection,
    ));

    let collaborators = Collaborators {
        credentials: accounts.clone(),
        articles: articles.clone(),
        games,
        storage: object_store,
        relational_health: accounts,
        document_health: articles,
    };
    let state = Arc::new(AppState::new(config.clone(), collaborators, stager));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
