//! File lifecycle operations: rename, share, delete, space usage.

use std::sync::Arc;

use depot_core::{AppError, FileRecord, SpaceUsage};
use depot_db::{RecordStore, RecordStoreError};
use depot_storage::BlobStore;
use uuid::Uuid;

fn map_store_error(err: RecordStoreError) -> AppError {
    match err {
        RecordStoreError::NotFound(_) => AppError::NotFound("File not found".to_string()),
        other => AppError::Database(other.to_string()),
    }
}

fn not_found() -> AppError {
    AppError::NotFound("File not found".to_string())
}

/// Lifecycle operations over committed files.
pub struct FileLifecycleService {
    storage: Arc<dyn BlobStore>,
    records: Arc<dyn RecordStore>,
    total_space_bytes: i64,
}

impl FileLifecycleService {
    pub fn new(
        storage: Arc<dyn BlobStore>,
        records: Arc<dyn RecordStore>,
        total_space_bytes: i64,
    ) -> Self {
        Self {
            storage,
            records,
            total_space_bytes,
        }
    }

    /// Load a record and verify it belongs to `owner`. Another owner's file
    /// is reported as missing, not forbidden, so ids reveal nothing.
    async fn owned_record(&self, id: Uuid, owner: Uuid) -> Result<FileRecord, AppError> {
        let record = self
            .records
            .get(id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(not_found)?;
        if record.owner != owner {
            return Err(not_found());
        }
        Ok(record)
    }

    /// Rename a file, keeping its stored extension.
    #[tracing::instrument(skip(self), fields(file_id = %id, operation = "rename_file"))]
    pub async fn rename(
        &self,
        id: Uuid,
        owner: Uuid,
        new_base_name: &str,
    ) -> Result<FileRecord, AppError> {
        let record = self.owned_record(id, owner).await?;

        let new_name = if record.extension.is_empty() {
            new_base_name.to_string()
        } else {
            format!("{}.{}", new_base_name, record.extension)
        };

        self.records
            .rename(id, &new_name)
            .await
            .map_err(map_store_error)
    }

    /// Replace the set of emails granted access to a file.
    #[tracing::instrument(skip(self, emails), fields(file_id = %id, operation = "share_file"))]
    pub async fn share(
        &self,
        id: Uuid,
        owner: Uuid,
        emails: Vec<String>,
    ) -> Result<FileRecord, AppError> {
        self.owned_record(id, owner).await?;
        self.records
            .update_users(id, &emails)
            .await
            .map_err(map_store_error)
    }

    /// Delete a file: record first (point of no return), then the blob.
    ///
    /// A blob-delete failure after the record is gone is logged, not
    /// surfaced; the user-visible file no longer exists and the leaked blob
    /// is the accepted residue of having no cross-resource transaction.
    #[tracing::instrument(skip(self), fields(file_id = %id, operation = "delete_file"))]
    pub async fn delete(&self, id: Uuid, owner: Uuid) -> Result<(), AppError> {
        let record = self.owned_record(id, owner).await?;

        self.records.delete(id).await.map_err(map_store_error)?;

        if let Err(e) = self
            .storage
            .delete(&record.blob_ref.bucket, record.blob_ref.blob_id)
            .await
        {
            tracing::warn!(
                error = %e,
                blob_ref = %record.blob_ref,
                "Blob delete failed after record removal"
            );
        }

        tracing::info!(blob_ref = %record.blob_ref, "File deleted");
        Ok(())
    }

    /// Per-kind and total space usage for the quota dashboard.
    #[tracing::instrument(skip(self), fields(owner = %owner, operation = "space_usage"))]
    pub async fn space_usage(&self, owner: Uuid) -> Result<SpaceUsage, AppError> {
        let records = self
            .records
            .list_by_owner(owner)
            .await
            .map_err(map_store_error)?;
        Ok(SpaceUsage::from_records(&records, self.total_space_bytes))
    }
}
