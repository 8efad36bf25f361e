//! Postgres-backed record store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use depot_core::{FileRecord, FileKind};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::records::{RecordStore, RecordStoreError, RecordStoreResult};

/// Database row for the `files` table. Kind and blob_ref are stored as text
/// and parsed back into their domain types.
#[derive(Debug, sqlx::FromRow)]
struct FileRecordRow {
    id: Uuid,
    name: String,
    kind: String,
    extension: String,
    size_bytes: i64,
    url: String,
    owner: Uuid,
    account_id: Uuid,
    users: Vec<String>,
    blob_ref: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl FileRecordRow {
    fn into_record(self) -> RecordStoreResult<FileRecord> {
        let kind: FileKind = self
            .kind
            .parse()
            .map_err(|e: String| RecordStoreError::Backend(format!("corrupt kind column: {}", e)))?;
        let blob_ref = self.blob_ref.parse().map_err(|e: String| {
            RecordStoreError::Backend(format!("corrupt blob_ref column: {}", e))
        })?;
        Ok(FileRecord {
            id: self.id,
            name: self.name,
            kind,
            extension: self.extension,
            size_bytes: self.size_bytes,
            url: self.url,
            owner: self.owner,
            account_id: self.account_id,
            users: self.users,
            blob_ref,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Repository for file records backed by Postgres
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    #[tracing::instrument(skip(self, record), fields(db.table = "files", db.operation = "insert", file_id = %record.id))]
    async fn create(&self, record: &FileRecord) -> RecordStoreResult<FileRecord> {
        let row = sqlx::query_as::<Postgres, FileRecordRow>(
            r#"
            INSERT INTO files (id, name, kind, extension, size_bytes, url, owner, account_id, users, blob_ref)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, name, kind, extension, size_bytes, url, owner, account_id, users, blob_ref, created_at, updated_at
            "#,
        )
        .bind(record.id)
        .bind(&record.name)
        .bind(record.kind.as_str())
        .bind(&record.extension)
        .bind(record.size_bytes)
        .bind(&record.url)
        .bind(record.owner)
        .bind(record.account_id)
        .bind(&record.users)
        .bind(record.blob_ref.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RecordStoreError::WriteRejected(e.to_string()))?;

        row.into_record()
    }

    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "select"))]
    async fn get(&self, id: Uuid) -> RecordStoreResult<Option<FileRecord>> {
        let row = sqlx::query_as::<Postgres, FileRecordRow>(
            "SELECT id, name, kind, extension, size_bytes, url, owner, account_id, users, blob_ref, created_at, updated_at FROM files WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(FileRecordRow::into_record).transpose()
    }

    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "update"))]
    async fn rename(&self, id: Uuid, name: &str) -> RecordStoreResult<FileRecord> {
        let row = sqlx::query_as::<Postgres, FileRecordRow>(
            r#"
            UPDATE files SET name = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, name, kind, extension, size_bytes, url, owner, account_id, users, blob_ref, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RecordStoreError::NotFound(id))?;

        row.into_record()
    }

    #[tracing::instrument(skip(self, users), fields(db.table = "files", db.operation = "update"))]
    async fn update_users(&self, id: Uuid, users: &[String]) -> RecordStoreResult<FileRecord> {
        let row = sqlx::query_as::<Postgres, FileRecordRow>(
            r#"
            UPDATE files SET users = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, name, kind, extension, size_bytes, url, owner, account_id, users, blob_ref, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(users)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RecordStoreError::NotFound(id))?;

        row.into_record()
    }

    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "delete"))]
    async fn delete(&self, id: Uuid) -> RecordStoreResult<()> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RecordStoreError::NotFound(id));
        }
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "select"))]
    async fn list_by_owner(&self, owner: Uuid) -> RecordStoreResult<Vec<FileRecord>> {
        let rows = sqlx::query_as::<Postgres, FileRecordRow>(
            "SELECT id, name, kind, extension, size_bytes, url, owner, account_id, users, blob_ref, created_at, updated_at FROM files WHERE owner = $1 ORDER BY created_at DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(FileRecordRow::into_record)
            .collect()
    }
}
