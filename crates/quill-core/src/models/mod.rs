//! Data models for the application
//!
//! Organized by domain: accounts (read-only lookups), articles (documents written by the
//! submission pipeline), games (the catalog read path) and stored objects.

mod account;
mod article;
mod game;
mod storage;

pub use account::*;
pub use article::*;
pub use game::*;
pub use storage::*;
