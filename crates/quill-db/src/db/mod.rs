//! Database repositories for data access layer
//!
//! relational/ holds the MySQL repositories (accounts, game catalog); document/ holds the
//! MongoDB article repository.
//
// MySQL repositories
pub mod relational;
//
// MongoDB repositories
pub mod document;

pub use document::{ArticleRecord, ArticleRepository};
pub use relational::{hash_secret, AccountRepository, GameRepository};
