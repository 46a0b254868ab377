//! Stored object model: where an uploaded blob ended up.

use serde::{Deserialize, Serialize};

use crate::storage_types::StorageBackend;

/// An object accepted by the object store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredObject {
    pub backend: StorageBackend,
    pub bucket: Option<String>,
    pub key: String,
    pub url: String,
    pub content_type: String,
    pub size: u64,
}
