//! Object key generation and validation shared by the stager and every backend.

use crate::traits::{StorageError, StorageResult};

/// S3 caps object keys at 1024 bytes of UTF-8.
pub const MAX_KEY_LEN: usize = 1024;

/// Generate a fresh staging filename, which doubles as the object key.
pub fn generate_object_key() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Reject keys that could escape a directory or break a URL path.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if key.len() > MAX_KEY_LEN {
        return Err(StorageError::InvalidKey(format!(
            "Storage key exceeds {} bytes",
            MAX_KEY_LEN
        )));
    }
    if key.contains("..") || key.starts_with('/') || key.contains('\\') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    if key.chars().any(|c| c.is_control()) {
        return Err(StorageError::InvalidKey(
            "Storage key contains control characters".to_string(),
        ));
    }
    Ok(())
}
