use depot_core::FileKind;

/// Where a pending upload is in its lifetime. Entries leave the pending set
/// when they settle, so there are no terminal states here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    /// Admitted, waiting for dispatch.
    Queued,
    /// Dispatch in flight.
    Uploading,
}

/// One file the intake controller is currently tracking.
#[derive(Debug, Clone)]
pub struct PendingUpload {
    pub name: String,
    pub size_bytes: u64,
    pub kind: FileKind,
    pub extension: String,
    pub state: UploadState,
}

impl PendingUpload {
    pub fn queued(name: &str, size_bytes: u64) -> Self {
        let (kind, extension) = FileKind::from_filename(name);
        Self {
            name: name.to_string(),
            size_bytes,
            kind,
            extension,
            state: UploadState::Queued,
        }
    }
}
