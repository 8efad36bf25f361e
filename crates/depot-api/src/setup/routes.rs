//! Route configuration and setup.

use crate::api_doc::ApiDoc;
use crate::handlers;
use crate::state::AppState;
use anyhow::Result;
use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{delete, get, patch, post},
    Json, Router,
};
use depot_core::Config;
use depot_storage::BlobStore;
use std::sync::Arc;
use uuid::Uuid;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>> {
    let cors = setup_cors(config)?;

    // The body limit sits above the admission ceiling so oversize uploads are
    // refused by admission (413 with the taxonomy message) rather than cut off
    // mid-stream by the transport.
    let body_limit = (config.max_file_size_bytes as usize).saturating_mul(4);

    let router = Router::new()
        .route("/api/v0/files", post(handlers::file_upload::upload_file))
        .route(
            "/api/v0/files/{id}/name",
            patch(handlers::file_rename::rename_file),
        )
        .route(
            "/api/v0/files/{id}/users",
            patch(handlers::file_share::share_file),
        )
        .route(
            "/api/v0/files/{id}",
            delete(handlers::file_delete::delete_file),
        )
        .route("/api/v0/space", get(handlers::space::space_usage))
        .route("/api/v0/health", get(health_check))
        .route("/api/v0/openapi.json", get(openapi_spec))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    Ok(router)
}

fn setup_cors(config: &Config) -> Result<CorsLayer> {
    let cors = if config.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|origin| origin.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
            .allow_headers(Any)
    };
    Ok(cors)
}

#[derive(serde::Serialize)]
struct HealthCheckResponse {
    status: String,
    database: String,
    storage: String,
}

/// Lightweight exists check against a key that can never be stored; only a
/// backend or transport error marks the store unhealthy.
async fn storage_status(storage: &dyn BlobStore, bucket: &str) -> String {
    match storage.exists(bucket, Uuid::nil()).await {
        Ok(_) => "healthy".to_string(),
        Err(e) => format!("storage error: {}", e),
    }
}

/// Health check: verifies the database and blob store are reachable.
async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let database = match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => "healthy".to_string(),
        Err(e) => format!("database error: {}", e),
    };
    let storage = storage_status(state.storage.as_ref(), &state.config.bucket).await;

    let healthy = database == "healthy" && storage == "healthy";
    let status = if healthy { "healthy" } else { "unhealthy" };
    let code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        code,
        Json(HealthCheckResponse {
            status: status.to_string(),
            database,
            storage,
        }),
    )
}

async fn openapi_spec() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use depot_storage::{MemoryBlobStore, StorageError, StorageResult, StoredBlob};

    struct UnreachableBlobStore;

    #[async_trait]
    impl BlobStore for UnreachableBlobStore {
        async fn put(
            &self,
            _bucket: &str,
            _blob_id: Uuid,
            _filename: &str,
            _data: Vec<u8>,
        ) -> StorageResult<StoredBlob> {
            Err(StorageError::BackendError("connection refused".to_string()))
        }

        async fn delete(&self, _bucket: &str, _blob_id: Uuid) -> StorageResult<()> {
            Err(StorageError::BackendError("connection refused".to_string()))
        }

        async fn exists(&self, _bucket: &str, _blob_id: Uuid) -> StorageResult<bool> {
            Err(StorageError::BackendError("connection refused".to_string()))
        }

        async fn object_count(&self, _bucket: &str) -> StorageResult<usize> {
            Err(StorageError::BackendError("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_storage_status_healthy_on_reachable_store() {
        let store = MemoryBlobStore::new();
        assert_eq!(storage_status(&store, "files").await, "healthy");
    }

    #[tokio::test]
    async fn test_storage_status_reports_backend_errors() {
        let status = storage_status(&UnreachableBlobStore, "files").await;
        assert!(status.starts_with("storage error:"));
    }
}
