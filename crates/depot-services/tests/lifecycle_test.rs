//! Lifecycle service tests: rename, share, record-first delete, and space
//! usage over committed uploads.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use depot_core::models::NewUpload;
use depot_core::{AppError, FileRecord};
use depot_db::InMemoryRecordStore;
use depot_services::{FileLifecycleService, UploadLimits, UploadService};
use depot_storage::{BlobStore, MemoryBlobStore, StorageError, StorageResult, StoredBlob};
use uuid::Uuid;

const BUCKET: &str = "files";
const TOTAL: i64 = 2 * 1024 * 1024 * 1024;

struct Fixture {
    storage: MemoryBlobStore,
    records: InMemoryRecordStore,
    uploads: UploadService,
    lifecycle: FileLifecycleService,
    owner: Uuid,
}

fn fixture() -> Fixture {
    let storage = MemoryBlobStore::new();
    let records = InMemoryRecordStore::new();
    let limits = UploadLimits {
        bucket: BUCKET.to_string(),
        max_file_size_bytes: 15 * 1024 * 1024,
        upload_deadline: Duration::from_secs(55),
    };
    let uploads = UploadService::new(
        Arc::new(storage.clone()),
        Arc::new(records.clone()),
        limits,
    );
    let lifecycle = FileLifecycleService::new(
        Arc::new(storage.clone()),
        Arc::new(records.clone()),
        TOTAL,
    );
    Fixture {
        storage,
        records,
        uploads,
        lifecycle,
        owner: Uuid::new_v4(),
    }
}

impl Fixture {
    async fn commit(&self, name: &str, data: &'static [u8]) -> FileRecord {
        self.uploads
            .commit(NewUpload::from_bytes(name, data), self.owner, self.owner)
            .await
            .unwrap()
    }
}

/// Blob store whose deletes always fail, for the orphan-tolerant delete path.
struct FailingDeleteBlobStore {
    inner: MemoryBlobStore,
}

#[async_trait]
impl BlobStore for FailingDeleteBlobStore {
    async fn put(
        &self,
        bucket: &str,
        blob_id: Uuid,
        filename: &str,
        data: Vec<u8>,
    ) -> StorageResult<StoredBlob> {
        self.inner.put(bucket, blob_id, filename, data).await
    }

    async fn delete(&self, _bucket: &str, _blob_id: Uuid) -> StorageResult<()> {
        Err(StorageError::DeleteFailed("bucket unavailable".to_string()))
    }

    async fn exists(&self, bucket: &str, blob_id: Uuid) -> StorageResult<bool> {
        self.inner.exists(bucket, blob_id).await
    }

    async fn object_count(&self, bucket: &str) -> StorageResult<usize> {
        self.inner.object_count(bucket).await
    }
}

#[tokio::test]
async fn test_rename_replaces_base_name_and_keeps_extension() {
    let fx = fixture();
    let record = fx.commit("a.png", b"pixels").await;

    let renamed = fx.lifecycle.rename(record.id, fx.owner, "vacation photo").await.unwrap();

    assert_eq!(renamed.name, "vacation photo.png");
    assert_eq!(renamed.extension, "png");
    // The blob is untouched by a rename
    assert_eq!(fx.storage.object_count(BUCKET).await.unwrap(), 1);
}

#[tokio::test]
async fn test_rename_missing_file_is_not_found() {
    let fx = fixture();
    assert!(matches!(
        fx.lifecycle.rename(Uuid::new_v4(), fx.owner, "x").await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_share_replaces_the_recipient_list() {
    let fx = fixture();
    let record = fx.commit("a.png", b"pixels").await;

    let shared = fx
        .lifecycle
        .share(record.id, fx.owner, vec!["friend@example.com".to_string()])
        .await
        .unwrap();
    assert_eq!(shared.users, vec!["friend@example.com".to_string()]);

    // The list is replaced wholesale, not merged
    let shared = fx
        .lifecycle
        .share(record.id, fx.owner, vec!["other@example.com".to_string()])
        .await
        .unwrap();
    assert_eq!(shared.users, vec!["other@example.com".to_string()]);
}

#[tokio::test]
async fn test_delete_removes_record_and_blob() {
    let fx = fixture();
    let record = fx.commit("a.png", b"pixels").await;

    fx.lifecycle.delete(record.id, fx.owner).await.unwrap();

    assert_eq!(fx.records.count(), 0);
    assert_eq!(fx.storage.object_count(BUCKET).await.unwrap(), 0);
    assert!(matches!(
        fx.lifecycle.delete(record.id, fx.owner).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_delete_succeeds_when_blob_cleanup_fails() {
    let storage = FailingDeleteBlobStore {
        inner: MemoryBlobStore::new(),
    };
    let records = InMemoryRecordStore::new();
    let owner = Uuid::new_v4();
    let storage: Arc<dyn BlobStore> = Arc::new(storage);
    let uploads = UploadService::new(
        storage.clone(),
        Arc::new(records.clone()),
        UploadLimits {
            bucket: BUCKET.to_string(),
            max_file_size_bytes: 15 * 1024 * 1024,
            upload_deadline: Duration::from_secs(55),
        },
    );
    let lifecycle = FileLifecycleService::new(storage.clone(), Arc::new(records.clone()), TOTAL);

    let record = uploads
        .commit(NewUpload::from_bytes("a.png", &b"pixels"[..]), owner, owner)
        .await
        .unwrap();

    // The record deletion is the point of no return; a failed blob delete is
    // logged, not surfaced.
    lifecycle.delete(record.id, owner).await.unwrap();
    assert_eq!(records.count(), 0);
    assert_eq!(storage.object_count(BUCKET).await.unwrap(), 1);
}

#[tokio::test]
async fn test_another_owner_cannot_touch_the_file() {
    let fx = fixture();
    let record = fx.commit("a.png", b"pixels").await;
    let stranger = Uuid::new_v4();

    // Another owner's id gets the same answer as a missing file
    assert!(matches!(
        fx.lifecycle.rename(record.id, stranger, "mine now").await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        fx.lifecycle
            .share(record.id, stranger, vec!["x@example.com".to_string()])
            .await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        fx.lifecycle.delete(record.id, stranger).await,
        Err(AppError::NotFound(_))
    ));

    // The file is untouched
    assert_eq!(fx.records.count(), 1);
    assert_eq!(fx.storage.object_count(BUCKET).await.unwrap(), 1);
    let renamed = fx
        .lifecycle
        .rename(record.id, fx.owner, "still mine")
        .await
        .unwrap();
    assert_eq!(renamed.name, "still mine.png");
    assert!(renamed.users.is_empty());
}

#[tokio::test]
async fn test_space_usage_sums_per_kind() {
    let fx = fixture();
    fx.commit("a.png", b"pixels").await;
    fx.commit("b.jpg", b"more pixels").await;
    fx.commit("c.pdf", b"text").await;

    let usage = fx.lifecycle.space_usage(fx.owner).await.unwrap();

    assert_eq!(usage.image.size_bytes, 6 + 11);
    assert_eq!(usage.document.size_bytes, 4);
    assert_eq!(usage.video.size_bytes, 0);
    assert_eq!(usage.used_bytes, 6 + 11 + 4);
    assert_eq!(usage.total_bytes, TOTAL);
    assert!(usage.image.latest.is_some());
    assert!(usage.video.latest.is_none());
}

#[tokio::test]
async fn test_space_usage_is_scoped_to_the_owner() {
    let fx = fixture();
    fx.commit("a.png", b"pixels").await;

    let other = fx
        .uploads
        .commit(
            NewUpload::from_bytes("d.mp4", &b"frames"[..]),
            Uuid::new_v4(),
            Uuid::new_v4(),
        )
        .await
        .unwrap();
    assert_eq!(other.kind, depot_core::FileKind::Video);

    let usage = fx.lifecycle.space_usage(fx.owner).await.unwrap();
    assert_eq!(usage.used_bytes, 6);
    assert_eq!(usage.video.size_bytes, 0);
}
