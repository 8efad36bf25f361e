//! Intake controller.
//!
//! Owns the pending set for one drop surface. A batch of dropped files is
//! screened against the size ceiling, admitted files are dispatched
//! concurrently, and each file settles independently: one failure never
//! aborts the rest of the batch.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use depot_core::ErrorMetadata;
use futures::future::join_all;

use crate::dispatcher::{DroppedFile, UploadDispatcher};
use crate::notify::{Notification, Notifier};
use crate::pending::{PendingUpload, UploadState};

pub struct IntakeController {
    dispatcher: Arc<dyn UploadDispatcher>,
    notifier: Arc<dyn Notifier>,
    max_file_size_bytes: u64,
    pending: Mutex<Vec<PendingUpload>>,
    busy: AtomicBool,
}

/// Clears the busy flag when the batch settles, even if dispatch panics.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl IntakeController {
    pub fn new(
        dispatcher: Arc<dyn UploadDispatcher>,
        notifier: Arc<dyn Notifier>,
        max_file_size_bytes: u64,
    ) -> Self {
        Self {
            dispatcher,
            notifier,
            max_file_size_bytes,
            pending: Mutex::new(Vec::new()),
            busy: AtomicBool::new(false),
        }
    }

    /// Take in a batch of dropped files and drive it to completion.
    ///
    /// Returns false without doing anything if a previous batch is still in
    /// flight. Oversize files are refused up front with a notification and
    /// never reach the dispatcher; the rest are dispatched concurrently and
    /// settle independently.
    pub async fn accept(&self, files: Vec<DroppedFile>) -> bool {
        if self.busy.swap(true, Ordering::SeqCst) {
            tracing::debug!("intake busy, batch refused");
            return false;
        }
        let _guard = BusyGuard(&self.busy);

        let mut admitted = Vec::new();
        for file in files {
            if file.size_bytes > self.max_file_size_bytes {
                self.notifier.notify(Notification::destructive(format!(
                    "{} is too large. Max file size is {} MB.",
                    file.name,
                    self.max_file_size_bytes / 1024 / 1024
                )));
                continue;
            }
            self.pending
                .lock()
                .unwrap()
                .push(PendingUpload::queued(&file.name, file.size_bytes));
            admitted.push(file);
        }

        join_all(admitted.into_iter().map(|file| self.dispatch_one(file))).await;
        true
    }

    async fn dispatch_one(&self, file: DroppedFile) {
        self.set_state(&file.name, UploadState::Uploading);
        let name = file.name.clone();

        match self.dispatcher.upload(file).await {
            Ok(record) => {
                self.remove(&name);
                self.notifier.notify(Notification::success(format!(
                    "{} uploaded successfully.",
                    record.name
                )));
            }
            Err(err) => {
                self.remove(&name);
                tracing::warn!(file = %name, error = %err, "upload failed");
                self.notifier
                    .notify(Notification::destructive(err.client_message()));
            }
        }
    }

    fn set_state(&self, name: &str, state: UploadState) {
        let mut pending = self.pending.lock().unwrap();
        if let Some(entry) = pending.iter_mut().find(|p| p.name == name) {
            entry.state = state;
        }
    }

    /// Drop a file from the pending set. A no-op if the name is absent, so
    /// removing an already-settled upload is safe.
    pub fn remove(&self, name: &str) {
        self.pending.lock().unwrap().retain(|p| p.name != name);
    }

    /// Snapshot of the pending set.
    pub fn pending(&self) -> Vec<PendingUpload> {
        self.pending.lock().unwrap().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotificationVariant;
    use async_trait::async_trait;
    use chrono::Utc;
    use depot_core::models::BlobRef;
    use depot_core::{AppError, FileKind, FileRecord};
    use std::collections::HashSet;
    use tokio::sync::Notify;
    use uuid::Uuid;

    fn record_for(name: &str) -> FileRecord {
        let (kind, extension) = FileKind::from_filename(name);
        let now = Utc::now();
        let owner = Uuid::new_v4();
        FileRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            kind,
            extension,
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

    /// Records every upload call; fails the names it is told to fail.
    #[derive(Default)]
    struct MockDispatcher {
        calls: Mutex<Vec<String>>,
        fail: HashSet<String>,
    }

    impl MockDispatcher {
        fn failing(names: &[&str]) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail: names.iter().map(|n| n.to_string()).collect(),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl UploadDispatcher for MockDispatcher {
        async fn upload(&self, file: DroppedFile) -> Result<FileRecord, AppError> {
            self.calls.lock().unwrap().push(file.name.clone());
            if self.fail.contains(&file.name) {
                Err(AppError::StorageWriteFailure("bucket unavailable".into()))
            } else {
                Ok(record_for(&file.name))
            }
        }
    }

    /// Signals when an upload starts and blocks until released.
    struct GatedDispatcher {
        started: Arc<Notify>,
        release: Arc<Notify>,
    }

    #[async_trait]
    impl UploadDispatcher for GatedDispatcher {
        async fn upload(&self, file: DroppedFile) -> Result<FileRecord, AppError> {
            self.started.notify_one();
            self.release.notified().await;
            Ok(record_for(&file.name))
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        notes: Mutex<Vec<Notification>>,
    }

    impl RecordingNotifier {
        fn notes(&self) -> Vec<Notification> {
            self.notes.lock().unwrap().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notification: Notification) {
            self.notes.lock().unwrap().push(notification);
        }
    }

    const CEILING: u64 = 15 * 1024 * 1024;

    #[tokio::test]
    async fn test_oversize_file_never_reaches_the_dispatcher() {
        let dispatcher = Arc::new(MockDispatcher::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let controller =
            IntakeController::new(dispatcher.clone(), notifier.clone(), CEILING);

        let oversize = DroppedFile {
            name: "b.pdf".to_string(),
            size_bytes: 20 * 1024 * 1024,
            data: bytes::Bytes::new(),
        };
        assert!(controller.accept(vec![oversize]).await);

        assert!(dispatcher.calls().is_empty());
        assert!(controller.pending().is_empty());

        let notes = notifier.notes();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].variant, NotificationVariant::Destructive);
        assert_eq!(notes[0].message, "b.pdf is too large. Max file size is 15 MB.");
    }

    #[tokio::test]
    async fn test_batch_members_settle_independently() {
        let dispatcher = Arc::new(MockDispatcher::failing(&["broken.mov"]));
        let notifier = Arc::new(RecordingNotifier::default());
        let controller =
            IntakeController::new(dispatcher.clone(), notifier.clone(), CEILING);

        let files = vec![
            DroppedFile::from_bytes("a.png", &b"pixels"[..]),
            DroppedFile::from_bytes("broken.mov", &b"frames"[..]),
            DroppedFile::from_bytes("c.pdf", &b"text"[..]),
        ];
        assert!(controller.accept(files).await);

        assert_eq!(dispatcher.calls().len(), 3);
        assert!(controller.pending().is_empty());
        assert!(!controller.is_busy());

        let notes = notifier.notes();
        let successes = notes
            .iter()
            .filter(|n| n.variant == NotificationVariant::Success)
            .count();
        let failures: Vec<_> = notes
            .iter()
            .filter(|n| n.variant == NotificationVariant::Destructive)
            .collect();
        assert_eq!(successes, 2);
        assert_eq!(failures.len(), 1);
        assert!(failures[0].message.starts_with("Failed to upload file:"));
    }

    #[tokio::test]
    async fn test_mixed_batch_screens_oversize_and_uploads_the_rest() {
        let dispatcher = Arc::new(MockDispatcher::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let controller =
            IntakeController::new(dispatcher.clone(), notifier.clone(), CEILING);

        let png = DroppedFile::from_bytes("a.png", vec![0u8; 2 * 1024 * 1024]);
        let pdf = DroppedFile {
            name: "b.pdf".to_string(),
            size_bytes: 20 * 1024 * 1024,
            data: bytes::Bytes::new(),
        };
        assert!(controller.accept(vec![png, pdf]).await);

        assert_eq!(dispatcher.calls(), vec!["a.png".to_string()]);
        let notes = notifier.notes();
        assert_eq!(notes.len(), 2);
        assert!(controller.pending().is_empty());
    }

    #[tokio::test]
    async fn test_remove_is_idempotent_while_upload_is_in_flight() {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let dispatcher = Arc::new(GatedDispatcher {
            started: started.clone(),
            release: release.clone(),
        });
        let notifier = Arc::new(RecordingNotifier::default());
        let controller = Arc::new(IntakeController::new(dispatcher, notifier, CEILING));

        let accepting = {
            let controller = controller.clone();
            tokio::spawn(async move {
                controller
                    .accept(vec![DroppedFile::from_bytes("a.png", &b"pixels"[..])])
                    .await
            })
        };

        started.notified().await;
        let pending = controller.pending();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].state, UploadState::Uploading);

        // User removes the file mid-flight; a repeat removal is a no-op, and
        // the settling upload removing it again later is also a no-op.
        controller.remove("a.png");
        controller.remove("a.png");
        assert!(controller.pending().is_empty());

        release.notify_one();
        assert!(accepting.await.unwrap());
        assert!(controller.pending().is_empty());
    }

    #[tokio::test]
    async fn test_second_batch_is_refused_while_the_first_is_in_flight() {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let dispatcher = Arc::new(GatedDispatcher {
            started: started.clone(),
            release: release.clone(),
        });
        let notifier = Arc::new(RecordingNotifier::default());
        let controller = Arc::new(IntakeController::new(dispatcher, notifier, CEILING));

        let first = {
            let controller = controller.clone();
            tokio::spawn(async move {
                controller
                    .accept(vec![DroppedFile::from_bytes("a.png", &b"pixels"[..])])
                    .await
            })
        };

        started.notified().await;
        assert!(controller.is_busy());
        assert!(
            !controller
                .accept(vec![DroppedFile::from_bytes("c.pdf", &b"text"[..])])
                .await
        );

        release.notify_one();
        assert!(first.await.unwrap());
        assert!(!controller.is_busy());

        // A new batch is accepted once the first has settled
        release.notify_one();
        assert!(
            controller
                .accept(vec![DroppedFile::from_bytes("c.pdf", &b"text"[..])])
                .await
        );
    }
}
