//! Relational store setup

use std::time::Duration;

use anyhow::{Context, Result};
use quill_core::Config;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::MySqlPool;

/// Build the MySQL pool and ping it; an unreachable server aborts startup.
pub async fn setup_database(config: &Config) -> Result<MySqlPool> {
    let mysql = config.mysql();
    tracing::info!(url = %mysql.display_url(), "Connecting to database...");

    let options = MySqlConnectOptions::new()
        .host(&mysql.host)
        .port(mysql.port)
        .username(&mysql.user)
        .password(&mysql.password)
        .database(&mysql.database);

    let timezone = mysql.timezone.clone();
    let pool = MySqlPoolOptions::new()
        .max_connections(mysql.connection_limit)
        .acquire_timeout(Duration::from_secs(mysql.timeout_seconds))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .after_connect(move |conn, _meta| {
            let timezone = timezone.clone();
            Box::pin(async move {
                sqlx::query("SET time_zone = ?")
                    .bind(timezone)
                    .execute(&mut *conn)
                    .await?;
                Ok(())
            })
        })
        .connect_with(options)
        .await
        .context("Failed to connect to MySQL")?;

    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .context("MySQL ping failed")?;

    tracing::info!(
        max_connections = mysql.connection_limit,
        timezone = %mysql.timezone,
        "Database connected successfully"
    );

    Ok(pool)
}
