//! File record store abstraction

use async_trait::async_trait;
use depot_core::FileRecord;
use thiserror::Error;
use uuid::Uuid;

/// Record store operation errors
#[derive(Debug, Error)]
pub enum RecordStoreError {
    #[error("Record not found: {0}")]
    NotFound(Uuid),

    #[error("Write rejected: {0}")]
    WriteRejected(String),

    #[error("Database backend error: {0}")]
    Backend(String),
}

pub type RecordStoreResult<T> = Result<T, RecordStoreError>;

impl From<sqlx::Error> for RecordStoreError {
    fn from(err: sqlx::Error) -> Self {
        RecordStoreError::Backend(err.to_string())
    }
}

/// File record store
///
/// One row per committed file. The store offers atomic single-record
/// operations only; there is no transaction spanning the record store and
/// blob storage, which is why the upload pipeline compensates manually.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a new record. The caller supplies the id.
    async fn create(&self, record: &FileRecord) -> RecordStoreResult<FileRecord>;

    /// Fetch a record by id.
    async fn get(&self, id: Uuid) -> RecordStoreResult<Option<FileRecord>>;

    /// Update the display name. Fails with NotFound for an absent id.
    async fn rename(&self, id: Uuid, name: &str) -> RecordStoreResult<FileRecord>;

    /// Replace the set of emails granted access.
    async fn update_users(&self, id: Uuid, users: &[String]) -> RecordStoreResult<FileRecord>;

    /// Delete a record. Fails with NotFound for an absent id.
    async fn delete(&self, id: Uuid) -> RecordStoreResult<()>;

    /// All records owned by one user (for the quota dashboard).
    async fn list_by_owner(&self, owner: Uuid) -> RecordStoreResult<Vec<FileRecord>>;
}
