use crate::traits::{BlobStore, StorageResult, StoredBlob};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// In-memory blob storage, for tests and ephemeral development.
///
/// Clones share the same underlying map, so a test can hold one handle while
/// the service under test holds another.
#[derive(Clone, Default)]
pub struct MemoryBlobStore {
    blobs: Arc<Mutex<HashMap<(String, Uuid), Vec<u8>>>>,
    base_url: String,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self {
            blobs: Arc::new(Mutex::new(HashMap::new())),
            base_url: "memory://blobs".to_string(),
        }
    }

    /// Raw contents of a blob, if present.
    pub fn contents(&self, bucket: &str, blob_id: Uuid) -> Option<Vec<u8>> {
        self.blobs
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), blob_id))
            .cloned()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(
        &self,
        bucket: &str,
        blob_id: Uuid,
        filename: &str,
        data: Vec<u8>,
    ) -> StorageResult<StoredBlob> {
        let size = data.len() as u64;
        self.blobs
            .lock()
            .unwrap()
            .insert((bucket.to_string(), blob_id), data);

        tracing::debug!(
            bucket = %bucket,
            blob_id = %blob_id,
            filename = %filename,
            size_bytes = size,
            "Memory blob stored"
        );

        Ok(StoredBlob {
            id: blob_id,
            size_bytes: size,
            url: format!("{}/{}/{}", self.base_url, bucket, blob_id),
        })
    }

    async fn delete(&self, bucket: &str, blob_id: Uuid) -> StorageResult<()> {
        // Idempotent: removing an absent entry is a success
        self.blobs
            .lock()
            .unwrap()
            .remove(&(bucket.to_string(), blob_id));
        Ok(())
    }

    async fn exists(&self, bucket: &str, blob_id: Uuid) -> StorageResult<bool> {
        Ok(self
            .blobs
            .lock()
            .unwrap()
            .contains_key(&(bucket.to_string(), blob_id)))
    }

    async fn object_count(&self, bucket: &str) -> StorageResult<usize> {
        Ok(self
            .blobs
            .lock()
            .unwrap()
            .keys()
            .filter(|(b, _)| b == bucket)
            .count())
    }
}
