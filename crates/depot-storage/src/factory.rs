//! Blob store construction from configuration.

use std::sync::Arc;

use depot_core::{Config, StorageBackend};

use crate::local::LocalBlobStore;
use crate::memory::MemoryBlobStore;
use crate::traits::{BlobStore, StorageError, StorageResult};

/// Build the configured blob store backend.
pub async fn create_blob_store(config: &Config) -> StorageResult<Arc<dyn BlobStore>> {
    let backend: StorageBackend = config
        .storage_backend
        .parse()
        .map_err(StorageError::ConfigError)?;

    let store: Arc<dyn BlobStore> = match backend {
        StorageBackend::Local => {
            let store = LocalBlobStore::new(
                config.local_storage_path.clone(),
                config.local_storage_base_url.clone(),
            )
            .await?;
            Arc::new(store)
        }
        StorageBackend::Memory => Arc::new(MemoryBlobStore::new()),
    };

    tracing::info!(backend = %backend, bucket = %config.bucket, "Blob store initialized");
    Ok(store)
}
