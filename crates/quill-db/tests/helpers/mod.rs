//! Test helpers: throwaway MySQL and MongoDB containers.
//!
//! These tests need a Docker daemon and are ignored by default. Run from workspace root:
//! `cargo test -p quill-db -- --ignored`.

#![allow(dead_code)]

use mongodb::Client;
use quill_core::config::MysqlConfig;
use quill_db::hash_secret;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;
use testcontainers_modules::mongo::Mongo;
use testcontainers_modules::mysql::Mysql;
use testcontainers_modules::testcontainers::runners::AsyncRunner;
use testcontainers_modules::testcontainers::ContainerAsync;

const SCHEMA: &[&str] = &[
    "CREATE TABLE `user` (
        user_id VARCHAR(64) NOT NULL PRIMARY KEY,
        password VARCHAR(128) NOT NULL
    )",
    "CREATE TABLE game (
        gid INT NOT NULL PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        year INT NULL,
        url VARCHAR(255) NULL,
        image VARCHAR(255) NULL
    )",
];

/// MySQL with the account and game tables, and the container keeping it alive.
pub struct TestMysql {
    pub pool: MySqlPool,
    pub _container: ContainerAsync<Mysql>,
}

impl TestMysql {
    pub async fn start() -> Self {
        let container = Mysql::default()
            .start()
            .await
            .expect("Failed to start MySQL container");
        let host = container.get_host().await.expect("Failed to get MySQL host");
        let port = container
            .get_host_port_ipv4(3306)
            .await
            .expect("Failed to get MySQL port");

        let pool = MySqlPoolOptions::new()
            .max_connections(2)
            .connect(&format!("mysql://root@{}:{}/test", host, port))
            .await
            .expect("Failed to connect to MySQL");

        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&pool)
                .await
                .expect("Failed to create schema");
        }

        Self {
            pool,
            _container: container,
        }
    }

    /// Store an account the way the account table holds it: the hex digest of the secret.
    pub async fn add_account(&self, identifier: &str, stored_digest: &str) {
        sqlx::query("INSERT INTO `user` (user_id, password) VALUES (?, ?)")
            .bind(identifier)
            .bind(stored_digest)
            .execute(&self.pool)
            .await
            .expect("Failed to insert account");
    }

    pub async fn add_account_with_secret(&self, identifier: &str, secret: &str) {
        self.add_account(identifier, &hash_secret(secret)).await;
    }

    pub async fn add_game(&self, gid: i64, name: &str, year: Option<i32>, url: Option<&str>) {
        sqlx::query("INSERT INTO game (gid, name, year, url, image) VALUES (?, ?, ?, ?, NULL)")
            .bind(gid)
            .bind(name)
            .bind(year)
            .bind(url)
            .execute(&self.pool)
            .await
            .expect("Failed to insert game");
    }
}

/// Account table settings matching `SCHEMA`.
pub fn mysql_config() -> MysqlConfig {
    MysqlConfig {
        host: "localhost".to_string(),
        port: 3306,
        user: "root".to_string(),
        password: String::new(),
        database: "test".to_string(),
        connection_limit: 2,
        timezone: "+00:00".to_string(),
        timeout_seconds: 5,
        account_table: "user".to_string(),
        account_id_column: "user_id".to_string(),
        account_secret_column: "password".to_string(),
    }
}

pub struct TestMongo {
    pub client: Client,
    pub _container: ContainerAsync<Mongo>,
}

impl TestMongo {
    pub async fn start() -> Self {
        let container = Mongo::default()
            .start()
            .await
            .expect("Failed to start MongoDB container");
        let host = container.get_host().await.expect("Failed to get MongoDB host");
        let port = container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get MongoDB port");

        let client = Client::with_uri_str(format!("mongodb://{}:{}", host, port))
            .await
            .expect("Failed to create MongoDB client");

        Self {
            client,
            _container: container,
        }
    }
}
