//! Document store setup

use anyhow::{Context, Result};
use mongodb::bson::doc;
use mongodb::Client;
use quill_core::Config;

/// Connect the MongoDB client and run `ping`; failure aborts startup.
pub async fn setup_document_store(config: &Config) -> Result<Client> {
    let mongo = config.mongo();
    tracing::info!(
        database = %mongo.database,
        collection = %mongo.collection,
        "Connecting to document store..."
    );

    let client = Client::with_uri_str(&mongo.url)
        .await
        .context("Failed to create MongoDB client")?;

    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .context("MongoDB ping failed")?;

    tracing::info!("Document store connected successfully");
    Ok(client)
}
