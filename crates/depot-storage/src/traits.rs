//! Blob storage abstraction trait

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Blob not found: {0}")]
    NotFound(String),

    #[error("Invalid bucket name: {0}")]
    InvalidBucket(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A blob as reported by the backend after a successful write.
#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub id: Uuid,
    /// Size reported by the backend, which is what the file record stores.
    pub size_bytes: u64,
    /// Publicly accessible URL for the blob.
    pub url: String,
}

/// Blob storage abstraction
///
/// All backends (local filesystem, in-memory) implement this trait. The
/// upload pipeline works against `Arc<dyn BlobStore>` and never couples to a
/// specific backend.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write a blob under a caller-supplied unique id.
    ///
    /// The caller generates a fresh id per attempt; retrying a failed commit
    /// writes a new blob rather than resuming a prior one.
    async fn put(
        &self,
        bucket: &str,
        blob_id: Uuid,
        filename: &str,
        data: Vec<u8>,
    ) -> StorageResult<StoredBlob>;

    /// Delete a blob. Deleting an absent blob is a success, so compensating
    /// deletes and record-first file deletion can always run safely.
    async fn delete(&self, bucket: &str, blob_id: Uuid) -> StorageResult<()>;

    /// Check whether a blob exists.
    async fn exists(&self, bucket: &str, blob_id: Uuid) -> StorageResult<bool>;

    /// Number of blobs currently held in a bucket.
    async fn object_count(&self, bucket: &str) -> StorageResult<usize>;
}
