//! Transient local staging of inbound uploads.
//!
//! A `StagedBlob` owns its file for the length of one request. Deletion is attempted
//! exactly once: by `reclaim` on the normal paths, or by `Drop` when the owning future is
//! cancelled or unwinds before `reclaim` ran. Deletion failures are logged and swallowed.

use std::fmt::Display;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use futures::{Stream, StreamExt};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::keys::generate_object_key;
use crate::traits::{StorageError, StorageResult};

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
pub const DEFAULT_ORIGINAL_FILENAME: &str = "blob";

/// Result of the single deletion attempt for a staged blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reclaimed {
    Removed,
    /// The file was already gone (for example, staging failed before creating it)
    Missing,
    Failed,
}

/// Writes uploads to a transient directory under generated unique filenames.
#[derive(Debug, Clone)]
pub struct BlobStager {
    dir: PathBuf,
    max_size: usize,
}

impl BlobStager {
    /// Create the staging directory if needed.
    pub async fn new(dir: impl Into<PathBuf>, max_size: usize) -> StorageResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create staging directory {}: {}",
                dir.display(),
                e
            ))
        })?;
        Ok(BlobStager { dir, max_size })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Stream one upload to disk and fsync it.
    ///
    /// On failure the partial file is reclaimed before the error is returned.
    pub async fn stage<S, E>(
        &self,
        mut stream: S,
        original_filename: Option<&str>,
        content_type: Option<&str>,
    ) -> StorageResult<StagedBlob>
    where
        S: Stream<Item = Result<Bytes, E>> + Unpin,
        E: Display,
    {
        let filename = generate_object_key();
        let mut blob = StagedBlob {
            path: self.dir.join(&filename),
            filename,
            original_filename: original_filename
                .filter(|name| !name.is_empty())
                .unwrap_or(DEFAULT_ORIGINAL_FILENAME)
                .to_string(),
            content_type: content_type
                .filter(|ct| !ct.is_empty())
                .unwrap_or(DEFAULT_CONTENT_TYPE)
                .to_string(),
            size: 0,
            reclaimed: false,
        };

        let start = std::time::Instant::now();
        match self.write_stream(&mut blob, &mut stream).await {
            Ok(()) => {
                tracing::debug!(
                    path = %blob.path.display(),
                    filename = %blob.filename,
                    original_filename = %blob.original_filename,
                    content_type = %blob.content_type,
                    size_bytes = blob.size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Upload staged"
                );
                Ok(blob)
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    filename = %blob.filename,
                    "Staging failed, discarding partial file"
                );
                blob.reclaim().await;
                Err(e)
            }
        }
    }

    async fn write_stream<S, E>(&self, blob: &mut StagedBlob, stream: &mut S) -> StorageResult<()>
    where
        S: Stream<Item = Result<Bytes, E>> + Unpin,
        E: Display,
    {
        let mut file = fs::File::create(&blob.path).await?;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| StorageError::PayloadStream(e.to_string()))?;
            let new_size = blob.size + chunk.len() as u64;
            if new_size > self.max_size as u64 {
                return Err(StorageError::TooLarge {
                    limit: self.max_size,
                });
            }
            file.write_all(&chunk).await?;
            blob.size = new_size;
        }

        file.flush().await?;
        file.sync_all().await?;
        Ok(())
    }
}

/// An upload held on local disk for the duration of one request.
#[derive(Debug)]
pub struct StagedBlob {
    path: PathBuf,
    filename: String,
    original_filename: String,
    content_type: String,
    size: u64,
    reclaimed: bool,
}

impl StagedBlob {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Generated filename; also the object key the blob is uploaded under.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn original_filename(&self) -> &str {
        &self.original_filename
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Read the whole staged file back.
    pub async fn read(&self) -> StorageResult<Vec<u8>> {
        Ok(fs::read(&self.path).await?)
    }

    /// Delete the staged file.
    ///
    /// The removal is handed to the blocking pool before the first await, so it runs
    /// even if this future is dropped midway, and `Drop` will not try again.
    pub async fn reclaim(mut self) -> Reclaimed {
        self.reclaimed = true;
        let path = self.path.clone();
        let task = tokio::task::spawn_blocking(move || std::fs::remove_file(path));

        let result = match task.await {
            Ok(result) => result,
            Err(join_error) => Err(std::io::Error::other(join_error.to_string())),
        };
        log_reclaim(&self.path, result)
    }
}

fn log_reclaim(path: &Path, result: std::io::Result<()>) -> Reclaimed {
    match result {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "Staged blob reclaimed");
            Reclaimed::Removed
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "Staged blob already absent");
            Reclaimed::Missing
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                path = %path.display(),
                "Failed to reclaim staged blob"
            );
            Reclaimed::Failed
        }
    }
}

impl Drop for StagedBlob {
    fn drop(&mut self) {
        if self.reclaimed {
            return;
        }
        self.reclaimed = true;
        tracing::debug!(path = %self.path.display(), "Staged blob dropped before reclaim");
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let path = self.path.clone();
                handle.spawn_blocking(move || {
                    let result = std::fs::remove_file(&path);
                    log_reclaim(&path, result);
                });
            }
            Err(_) => {
                log_reclaim(&self.path, std::fs::remove_file(&self.path));
            }
        }
    }
}
