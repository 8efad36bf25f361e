//! Application setup and initialization
//!
//! Initialization logic lives here rather than in main.rs so the pieces can
//! be wired individually.

pub mod database;
pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::Result;
use depot_core::Config;
use depot_db::PgRecordStore;
use depot_services::{FileLifecycleService, UploadLimits, UploadService};
use depot_storage::create_blob_store;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Database
    let pool = database::setup_database(&config).await?;

    // Storage
    let storage = create_blob_store(&config)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize blob store: {}", e))?;

    // Services
    let records: Arc<dyn depot_db::RecordStore> = Arc::new(PgRecordStore::new(pool.clone()));
    let uploads = Arc::new(UploadService::new(
        storage.clone(),
        records.clone(),
        UploadLimits::from_config(&config),
    ));
    let lifecycle = Arc::new(FileLifecycleService::new(
        storage.clone(),
        records.clone(),
        config.total_space_bytes,
    ));

    let state = Arc::new(AppState {
        config: config.clone(),
        pool,
        storage,
        records,
        uploads,
        lifecycle,
    });

    // Routes
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
