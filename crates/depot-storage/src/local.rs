use crate::traits::{BlobStore, StorageError, StorageResult, StoredBlob};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Local filesystem blob storage
///
/// Blobs live at `{base_path}/{bucket}/{blob_id}` and are served from
/// `{base_url}/{bucket}/{blob_id}`.
#[derive(Clone)]
pub struct LocalBlobStore {
    base_path: PathBuf,
    base_url: String,
}

impl LocalBlobStore {
    /// Create a new LocalBlobStore instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for blob storage (e.g., "/var/lib/depot/blobs")
    /// * `base_url` - Base URL for serving blobs (e.g., "http://localhost:3000/blobs")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalBlobStore {
            base_path,
            base_url,
        })
    }

    /// Bucket names become directory names; reject anything that could
    /// escape the base directory.
    fn validate_bucket(bucket: &str) -> StorageResult<()> {
        if bucket.is_empty()
            || bucket.contains("..")
            || bucket.contains('/')
            || bucket.contains('\\')
        {
            return Err(StorageError::InvalidBucket(bucket.to_string()));
        }
        Ok(())
    }

    fn blob_path(&self, bucket: &str, blob_id: Uuid) -> StorageResult<PathBuf> {
        Self::validate_bucket(bucket)?;
        Ok(self.base_path.join(bucket).join(blob_id.to_string()))
    }

    fn blob_url(&self, bucket: &str, blob_id: Uuid) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            bucket,
            blob_id
        )
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(
        &self,
        bucket: &str,
        blob_id: Uuid,
        filename: &str,
        data: Vec<u8>,
    ) -> StorageResult<StoredBlob> {
        let path = self.blob_path(bucket, blob_id)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        let written = fs::metadata(&path)
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))?
            .len();

        tracing::info!(
            path = %path.display(),
            bucket = %bucket,
            blob_id = %blob_id,
            filename = %filename,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local blob upload successful"
        );

        Ok(StoredBlob {
            id: blob_id,
            size_bytes: written,
            url: self.blob_url(bucket, blob_id),
        })
    }

    async fn delete(&self, bucket: &str, blob_id: Uuid) -> StorageResult<()> {
        let path = self.blob_path(bucket, blob_id)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            bucket = %bucket,
            blob_id = %blob_id,
            "Local blob delete successful"
        );

        Ok(())
    }

    async fn exists(&self, bucket: &str, blob_id: Uuid) -> StorageResult<bool> {
        let path = self.blob_path(bucket, blob_id)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    async fn object_count(&self, bucket: &str) -> StorageResult<usize> {
        Self::validate_bucket(bucket)?;
        let dir = self.base_path.join(bucket);

        if !fs::try_exists(&dir).await.unwrap_or(false) {
            return Ok(0);
        }

        let mut entries = fs::read_dir(&dir)
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))?;
        let mut count = 0;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))?
        {
            if entry.file_type().await.map(|t| t.is_file()).unwrap_or(false) {
                count += 1;
            }
        }
        Ok(count)
    }
}
