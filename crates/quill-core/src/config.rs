//! Configuration module
//!
//! Configuration is read once at startup. `Config::from_env` loads `.env` (when present)
//! and then the process environment; `Config::from_lookup` takes any key lookup so the
//! parsing rules can be exercised without touching process state.

use std::env;
use std::path::PathBuf;

use crate::storage_types::StorageBackend;

// Common constants
const DEFAULT_PORT: u16 = 3000;
const MYSQL_PORT: u16 = 3306;
const MYSQL_CONNECTION_LIMIT: u32 = 4;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const STORE_CALL_TIMEOUT_SECS: u64 = 30;
const MAX_UPLOAD_SIZE_MB: usize = 10;

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub max_upload_size_bytes: usize,
    pub store_call_timeout_secs: u64,
    pub tmp_dir: PathBuf,
}

/// Relational store (accounts and the game catalog)
#[derive(Clone, Debug)]
pub struct MysqlConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub connection_limit: u32,
    pub timezone: String,
    pub timeout_seconds: u64,
    pub account_table: String,
    pub account_id_column: String,
    pub account_secret_column: String,
}

/// Document store (article documents)
#[derive(Clone, Debug)]
pub struct MongoConfig {
    pub url: String,
    pub database: String,
    pub collection: String,
}

/// Object store (uploaded images)
#[derive(Clone, Debug)]
pub struct ObjectStoreConfig {
    pub backend: StorageBackend,
    pub s3_endpoint: String,
    pub s3_bucket: Option<String>,
    pub s3_region: String,
    pub s3_force_path_style: bool,
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub base: BaseConfig,
    pub mysql: MysqlConfig,
    pub mongo: MongoConfig,
    pub object_store: ObjectStoreConfig,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ServiceConfig>);

impl Config {
    fn inner(&self) -> &ServiceConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.inner().base.environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = ServiceConfig::from_lookup(lookup)?;
        Ok(Config(Box::new(config)))
    }

    /// A first command-line argument that parses as a port wins over `PORT`.
    pub fn with_port_override(mut self, arg: Option<String>) -> Self {
        if let Some(port) = arg.and_then(|a| a.parse::<u16>().ok()) {
            self.0.base.server_port = port;
        }
        self
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.inner().base.max_upload_size_bytes
    }

    pub fn store_call_timeout_secs(&self) -> u64 {
        self.inner().base.store_call_timeout_secs
    }

    pub fn tmp_dir(&self) -> &std::path::Path {
        &self.inner().base.tmp_dir
    }

    pub fn mysql(&self) -> &MysqlConfig {
        &self.inner().mysql
    }

    pub fn mongo(&self) -> &MongoConfig {
        &self.inner().mongo
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.inner().object_store.backend
    }

    pub fn s3_endpoint(&self) -> &str {
        &self.inner().object_store.s3_endpoint
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.inner().object_store.s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> &str {
        &self.inner().object_store.s3_region
    }

    pub fn s3_force_path_style(&self) -> bool {
        self.inner().object_store.s3_force_path_style
    }

    pub fn aws_access_key_id(&self) -> Option<&str> {
        self.inner().object_store.aws_access_key_id.as_deref()
    }

    pub fn aws_secret_access_key(&self) -> Option<&str> {
        self.inner().object_store.aws_secret_access_key.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.inner().object_store.local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.inner().object_store.local_storage_base_url.as_deref()
    }
}

impl MysqlConfig {
    /// Connection target without the password, for logs.
    pub fn display_url(&self) -> String {
        format!(
            "mysql://{}@{}:{}/{}",
            self.user, self.host, self.port, self.database
        )
    }
}

fn parse_bool(value: Option<String>, default: bool) -> bool {
    value
        .map(|v| v.trim().to_lowercase())
        .and_then(|v| match v.as_str() {
            "1" | "true" | "yes" => Some(true),
            "0" | "false" | "no" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

/// Plain SQL identifier: letters, digits and underscores, not starting with a digit.
pub fn is_sql_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl ServiceConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins_str = var("CORS_ORIGINS").unwrap_or_else(|| "*".to_string());
        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let max_upload_size_mb = var("MAX_UPLOAD_SIZE_MB")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(MAX_UPLOAD_SIZE_MB);
        let max_upload_size_bytes = max_upload_size_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| anyhow::anyhow!("MAX_UPLOAD_SIZE_MB is too large"))?;

        let base = BaseConfig {
            server_port: var("PORT")
                .unwrap_or_else(|| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            max_upload_size_bytes,
            store_call_timeout_secs: var("STORE_CALL_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(STORE_CALL_TIMEOUT_SECS),
            tmp_dir: PathBuf::from(var("TMP_DIR").unwrap_or_else(|| "./temp".to_string())),
        };

        let mysql = MysqlConfig {
            host: var("MYSQL_HOST").unwrap_or_else(|| "localhost".to_string()),
            port: var("MYSQL_PORT")
                .unwrap_or_else(|| MYSQL_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("MYSQL_PORT must be a valid number"))?,
            user: var("MYSQL_USER").ok_or_else(|| anyhow::anyhow!("MYSQL_USER must be set"))?,
            password: lookup("MYSQL_PASSWORD").unwrap_or_default(),
            database: var("MYSQL_DATABASE").unwrap_or_else(|| "paf2020".to_string()),
            connection_limit: var("MYSQL_CONNECTION_LIMIT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(MYSQL_CONNECTION_LIMIT),
            timezone: var("MYSQL_TIMEZONE").unwrap_or_else(|| "+08:00".to_string()),
            timeout_seconds: var("DB_TIMEOUT_SECONDS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            account_table: var("ACCOUNT_TABLE").unwrap_or_else(|| "user".to_string()),
            account_id_column: var("ACCOUNT_ID_COLUMN").unwrap_or_else(|| "user_id".to_string()),
            account_secret_column: var("ACCOUNT_SECRET_COLUMN")
                .unwrap_or_else(|| "password".to_string()),
        };

        let mongo = MongoConfig {
            url: var("MONGO_URL").unwrap_or_else(|| "mongodb://localhost:27017".to_string()),
            database: var("MONGO_DATABASE")
                .ok_or_else(|| anyhow::anyhow!("MONGO_DATABASE must be set"))?,
            collection: var("MONGO_COLLECTION")
                .ok_or_else(|| anyhow::anyhow!("MONGO_COLLECTION must be set"))?,
        };

        let backend = match var("STORAGE_BACKEND") {
            Some(s) => s.parse::<StorageBackend>()?,
            None => StorageBackend::S3,
        };

        let object_store = ObjectStoreConfig {
            backend,
            s3_endpoint: var("S3_ENDPOINT")
                .unwrap_or_else(|| "sfo2.digitaloceanspaces.com".to_string()),
            s3_bucket: var("S3_BUCKET"),
            s3_region: var("S3_REGION")
                .or_else(|| var("AWS_REGION"))
                .unwrap_or_else(|| "us-east-1".to_string()),
            s3_force_path_style: parse_bool(lookup("S3_FORCE_PATH_STYLE"), false),
            aws_access_key_id: var("AWS_ACCESS_KEY_ID"),
            aws_secret_access_key: var("AWS_SECRET_ACCESS_KEY"),
            local_storage_path: var("LOCAL_STORAGE_PATH"),
            local_storage_base_url: var("LOCAL_STORAGE_BASE_URL"),
        };

        let config = ServiceConfig {
            base,
            mysql,
            mongo,
            object_store,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let environment = self.base.environment.to_lowercase();
        let is_production = environment == "production" || environment == "prod";
        if is_production && self.base.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.mysql.connection_limit == 0 {
            return Err(anyhow::anyhow!(
                "MYSQL_CONNECTION_LIMIT must be greater than zero"
            ));
        }

        for (name, value) in [
            ("ACCOUNT_TABLE", &self.mysql.account_table),
            ("ACCOUNT_ID_COLUMN", &self.mysql.account_id_column),
            ("ACCOUNT_SECRET_COLUMN", &self.mysql.account_secret_column),
        ] {
            if !is_sql_identifier(value) {
                return Err(anyhow::anyhow!(
                    "{} must be a plain SQL identifier, got '{}'",
                    name,
                    value
                ));
            }
        }

        if !self.mongo.url.starts_with("mongodb://") && !self.mongo.url.starts_with("mongodb+srv://")
        {
            return Err(anyhow::anyhow!(
                "MONGO_URL must be a mongodb:// or mongodb+srv:// connection string"
            ));
        }

        match self.object_store.backend {
            StorageBackend::S3 => {
                if self.object_store.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.object_store.aws_access_key_id.is_none()
                    || self.object_store.aws_secret_access_key.is_none()
                {
                    return Err(anyhow::anyhow!(
                        "AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.object_store.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.object_store.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }
}
