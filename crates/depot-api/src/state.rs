//! Application state shared across handlers.

use depot_core::Config;
use depot_db::RecordStore;
use depot_services::{FileLifecycleService, UploadService};
use depot_storage::BlobStore;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pool kept for health checks; the record store holds its own handle.
    pub pool: PgPool,
    pub storage: Arc<dyn BlobStore>,
    pub records: Arc<dyn RecordStore>,
    pub uploads: Arc<UploadService>,
    pub lifecycle: Arc<FileLifecycleService>,
}
