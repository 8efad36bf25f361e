//! Upload commit pipeline
//!
//! Persists one file as blob + metadata record, or guarantees no partial
//! state survives: admission re-check, a deadline race against the write
//! sequence, and a compensating blob delete when the record write fails.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use depot_core::models::BlobRef;
use depot_core::{AppError, Config, FileKind, FileRecord, NewUpload};
use depot_db::RecordStore;
use depot_storage::BlobStore;
use uuid::Uuid;

use crate::saga::CompensationStack;

/// Limits applied by the commit pipeline.
#[derive(Clone, Debug)]
pub struct UploadLimits {
    pub bucket: String,
    pub max_file_size_bytes: u64,
    pub upload_deadline: Duration,
}

impl UploadLimits {
    pub fn from_config(config: &Config) -> Self {
        Self {
            bucket: config.bucket.clone(),
            max_file_size_bytes: config.max_file_size_bytes,
            upload_deadline: config.upload_deadline(),
        }
    }
}

/// Upload commit pipeline
///
/// `commit` is per-file; concurrently committed files are independent and
/// unordered. Retrying a failed commit is a fresh attempt with a new blob id
/// and record id, never a resume.
pub struct UploadService {
    storage: Arc<dyn BlobStore>,
    records: Arc<dyn RecordStore>,
    limits: UploadLimits,
}

impl UploadService {
    pub fn new(
        storage: Arc<dyn BlobStore>,
        records: Arc<dyn RecordStore>,
        limits: UploadLimits,
    ) -> Self {
        Self {
            storage,
            records,
            limits,
        }
    }

    /// Commit one file: admission re-check, then the write sequence raced
    /// against the deadline.
    ///
    /// On success exactly one blob and one record exist and the record's
    /// `blob_ref` resolves to that blob. On any failure after the blob write,
    /// the blob is deleted before the error is returned; when the deadline
    /// cancels the sequence mid-flight, an already-written blob is cleaned up
    /// by a detached task so the caller's response is not delayed.
    #[tracing::instrument(
        skip(self, upload),
        fields(
            file_name = %upload.name,
            size_bytes = upload.size_bytes,
            operation = "commit_upload"
        )
    )]
    pub async fn commit(
        &self,
        upload: NewUpload,
        owner: Uuid,
        account_id: Uuid,
    ) -> Result<FileRecord, AppError> {
        // Admission re-check. The client already filtered, but the server is
        // the trust boundary; no storage is contacted for oversize files.
        if upload.size_bytes > self.limits.max_file_size_bytes {
            tracing::debug!(
                limit_bytes = self.limits.max_file_size_bytes,
                "Upload rejected by admission check"
            );
            return Err(AppError::TooLarge {
                size_bytes: upload.size_bytes,
                limit_bytes: self.limits.max_file_size_bytes,
            });
        }

        // Slot shared with the raced sequence: holds the blob id once the
        // blob write lands, so the timeout arm knows what to clean up.
        let written_blob: Arc<Mutex<Option<Uuid>>> = Arc::new(Mutex::new(None));

        let deadline = self.limits.upload_deadline;
        let sequence = self.write_sequence(upload, owner, account_id, written_blob.clone());

        match tokio::time::timeout(deadline, sequence).await {
            Ok(result) => result,
            Err(_elapsed) => {
                // The write sequence was cancelled by drop. If the blob write
                // already landed, delete it so the timeout leaves no orphan.
                if let Some(blob_id) = written_blob.lock().unwrap().take() {
                    let storage = self.storage.clone();
                    let bucket = self.limits.bucket.clone();
                    tokio::spawn(async move {
                        if let Err(e) = storage.delete(&bucket, blob_id).await {
                            tracing::warn!(
                                error = %e,
                                blob_id = %blob_id,
                                "Failed to clean up blob after upload timeout"
                            );
                        }
                    });
                }
                tracing::warn!(
                    deadline_secs = deadline.as_secs(),
                    "Upload timed out before the write sequence settled"
                );
                Err(AppError::Timeout {
                    deadline_secs: deadline.as_secs(),
                })
            }
        }
    }

    /// The strictly ordered write sequence: read bytes, write blob, write
    /// record. Each failure is classified where it occurs.
    async fn write_sequence(
        &self,
        upload: NewUpload,
        owner: Uuid,
        account_id: Uuid,
        written_blob: Arc<Mutex<Option<Uuid>>>,
    ) -> Result<FileRecord, AppError> {
        let data = upload
            .source
            .read_all()
            .await
            .map_err(|e| AppError::ReadFailure(e.to_string()))?;

        let blob_id = Uuid::new_v4();
        let stored = self
            .storage
            .put(&self.limits.bucket, blob_id, &upload.name, data)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, blob_id = %blob_id, "Blob write failed");
                AppError::StorageWriteFailure(e.to_string())
            })?;
        *written_blob.lock().unwrap() = Some(blob_id);

        let mut compensations = CompensationStack::new();
        {
            let storage = self.storage.clone();
            let bucket = self.limits.bucket.clone();
            compensations.push("delete_blob", move || async move {
                if let Err(e) = storage.delete(&bucket, blob_id).await {
                    tracing::warn!(
                        error = %e,
                        blob_id = %blob_id,
                        "Compensating blob delete failed"
                    );
                }
            });
        }

        let (kind, extension) = FileKind::from_filename(&upload.name);
        let now = Utc::now();
        let record = FileRecord {
            id: Uuid::new_v4(),
            name: upload.name.clone(),
            kind,
            extension,
            // Size from the stored blob as reported by the backend, not the
            // declared size.
            size_bytes: stored.size_bytes as i64,
            url: stored.url.clone(),
            owner,
            account_id,
            users: Vec::new(),
            blob_ref: BlobRef::new(self.limits.bucket.clone(), blob_id),
            created_at: now,
            updated_at: now,
        };

        match self.records.create(&record).await {
            Ok(created) => {
                compensations.disarm();
                tracing::info!(
                    file_id = %created.id,
                    blob_id = %blob_id,
                    kind = %created.kind,
                    "Upload committed"
                );
                Ok(created)
            }
            Err(e) => {
                tracing::error!(error = %e, blob_id = %blob_id, "Record write failed, unwinding");
                compensations.unwind().await;
                written_blob.lock().unwrap().take();
                Err(AppError::RecordWriteFailure(e.to_string()))
            }
        }
    }
}
