//! In-memory record store
//!
//! Backs tests and ephemeral development without a database. Supports
//! injecting a one-shot create failure so the upload pipeline's compensation
//! path can be exercised deterministically.

use async_trait::async_trait;
use chrono::Utc;
use depot_core::FileRecord;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::records::{RecordStore, RecordStoreError, RecordStoreResult};

/// In-memory record store. Clones share the same underlying map.
#[derive(Clone, Default)]
pub struct InMemoryRecordStore {
    records: Arc<Mutex<HashMap<Uuid, FileRecord>>>,
    fail_next_create: Arc<AtomicBool>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `create` call fail with a write rejection.
    pub fn fail_next_create(&self) {
        self.fail_next_create.store(true, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn create(&self, record: &FileRecord) -> RecordStoreResult<FileRecord> {
        if self.fail_next_create.swap(false, Ordering::SeqCst) {
            return Err(RecordStoreError::WriteRejected(
                "injected create failure".to_string(),
            ));
        }

        let mut records = self.records.lock().unwrap();
        if records.contains_key(&record.id) {
            return Err(RecordStoreError::WriteRejected(format!(
                "duplicate record id {}",
                record.id
            )));
        }
        records.insert(record.id, record.clone());
        Ok(record.clone())
    }

    async fn get(&self, id: Uuid) -> RecordStoreResult<Option<FileRecord>> {
        Ok(self.records.lock().unwrap().get(&id).cloned())
    }

    async fn rename(&self, id: Uuid, name: &str) -> RecordStoreResult<FileRecord> {
        let mut records = self.records.lock().unwrap();
        let record = records.get_mut(&id).ok_or(RecordStoreError::NotFound(id))?;
        record.name = name.to_string();
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn update_users(&self, id: Uuid, users: &[String]) -> RecordStoreResult<FileRecord> {
        let mut records = self.records.lock().unwrap();
        let record = records.get_mut(&id).ok_or(RecordStoreError::NotFound(id))?;
        record.users = users.to_vec();
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete(&self, id: Uuid) -> RecordStoreResult<()> {
        self.records
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(RecordStoreError::NotFound(id))
    }

    async fn list_by_owner(&self, owner: Uuid) -> RecordStoreResult<Vec<FileRecord>> {
        let mut records: Vec<FileRecord> = self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.owner == owner)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depot_core::models::{BlobRef, FileKind};

    fn record(owner: Uuid) -> FileRecord {
        let now = Utc::now();
        FileRecord {
            id: Uuid::new_v4(),
            name: "a.png".to_string(),
            kind: FileKind::Image,
            extension: "png".to_string(),
            size_bytes: 6,
            url: "memory://blobs/files/x".to_string(),
            owner,
            account_id: owner,
            users: vec![],
            blob_ref: BlobRef::new("files", Uuid::new_v4()),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_get_delete() {
        let store = InMemoryRecordStore::new();
        let owner = Uuid::new_v4();
        let created = store.create(&record(owner)).await.unwrap();

        assert_eq!(store.count(), 1);
        assert!(store.get(created.id).await.unwrap().is_some());

        store.delete(created.id).await.unwrap();
        assert_eq!(store.count(), 0);
        assert!(matches!(
            store.delete(created.id).await,
            Err(RecordStoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_injected_create_failure_is_one_shot() {
        let store = InMemoryRecordStore::new();
        let owner = Uuid::new_v4();

        store.fail_next_create();
        assert!(matches!(
            store.create(&record(owner)).await,
            Err(RecordStoreError::WriteRejected(_))
        ));

        // Next create succeeds again
        store.create(&record(owner)).await.unwrap();
        assert_eq!(store.count(), 1);
    }

    #[tokio::test]
    async fn test_rename_and_share() {
        let store = InMemoryRecordStore::new();
        let owner = Uuid::new_v4();
        let created = store.create(&record(owner)).await.unwrap();

        let renamed = store.rename(created.id, "b.png").await.unwrap();
        assert_eq!(renamed.name, "b.png");
        assert!(renamed.updated_at >= created.updated_at);

        let shared = store
            .update_users(created.id, &["friend@example.com".to_string()])
            .await
            .unwrap();
        assert_eq!(shared.users, vec!["friend@example.com".to_string()]);

        assert!(matches!(
            store.rename(Uuid::new_v4(), "x").await,
            Err(RecordStoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_by_owner_filters() {
        let store = InMemoryRecordStore::new();
        let owner = Uuid::new_v4();
        store.create(&record(owner)).await.unwrap();
        store.create(&record(owner)).await.unwrap();
        store.create(&record(Uuid::new_v4())).await.unwrap();

        assert_eq!(store.list_by_owner(owner).await.unwrap().len(), 2);
    }
}
