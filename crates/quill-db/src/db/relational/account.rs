use quill_core::config::{is_sql_identifier, MysqlConfig};
use quill_core::AppError;
use sha2::{Digest, Sha256};
use sqlx::{MySql, MySqlPool};
use subtle::ConstantTimeEq;

/// Hex-encoded SHA-256 of a raw secret, the form account secrets are stored in.
pub fn hash_secret(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}

fn secure_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Read-only access to the account table.
#[derive(Clone)]
pub struct AccountRepository {
    pool: MySqlPool,
    select_secrets_sql: String,
}

impl AccountRepository {
    pub fn new(pool: MySqlPool, config: &MysqlConfig) -> Result<Self, AppError> {
        let select_secrets_sql = select_secrets_sql(
            &config.account_table,
            &config.account_id_column,
            &config.account_secret_column,
        )?;
        Ok(Self {
            pool,
            select_secrets_sql,
        })
    }

    /// True iff some account row carries `identifier` and the digest of `secret`.
    ///
    /// Unknown identifiers and wrong secrets both yield `Ok(false)`. Store faults are
    /// returned as `AppError::Database`.
    #[tracing::instrument(skip(self, secret), fields(db.table = "account", db.operation = "select"))]
    pub async fn verify(&self, identifier: &str, secret: &str) -> Result<bool, AppError> {
        let stored: Vec<String> = sqlx::query_scalar::<MySql, String>(&self.select_secrets_sql)
            .bind(identifier)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to look up account");
                AppError::Database(e)
            })?;

        let digest = hash_secret(secret);
        let verified = stored
            .iter()
            .fold(false, |found, hash| {
                found | secure_compare(&hash.trim().to_ascii_lowercase(), &digest)
            });

        tracing::debug!(verified, "Credential check completed");
        Ok(verified)
    }

    /// Round trip to the server, used at startup and by the health check.
    pub async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::Database)
    }
}

fn select_secrets_sql(table: &str, id_column: &str, secret_column: &str) -> Result<String, AppError> {
    for name in [table, id_column, secret_column] {
        if !is_sql_identifier(name) {
            return Err(AppError::Internal(format!(
                "Invalid account table identifier: {}",
                name
            )));
        }
    }
    Ok(format!(
        "SELECT `{}` FROM `{}` WHERE `{}` = ?",
        secret_column, table, id_column
    ))
}
