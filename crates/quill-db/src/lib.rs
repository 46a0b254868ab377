//! Quill data access
//!
//! Relational repositories (accounts, games) over a MySQL pool and the article repository
//! over a MongoDB collection. `traits` holds the seams the submission pipeline depends on.

pub mod db;
pub mod traits;

pub use db::*;
pub use traits::{ArticleStore, CredentialVerifier, GameCatalog, StoreHealth};
