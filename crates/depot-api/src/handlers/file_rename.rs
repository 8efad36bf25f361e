use crate::auth::OwnerContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use depot_core::{AppError, FileRecordResponse};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RenameRequest {
    /// New base name; the stored extension is kept.
    pub name: String,
}

#[utoipa::path(
    patch,
    path = "/api/v0/files/{id}/name",
    tag = "files",
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    request_body = RenameRequest,
    responses(
        (status = 200, description = "File renamed successfully", body = FileRecordResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "File not found or not owned by the caller", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(owner = %ctx.owner, file_id = %id, operation = "rename_file"))]
pub async fn rename_file(
    State(state): State<Arc<AppState>>,
    ctx: OwnerContext,
    Path(id): Path<Uuid>,
    Json(request): Json<RenameRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::InvalidInput("Name must not be empty".to_string()).into());
    }

    let record = state
        .lifecycle
        .rename(id, ctx.owner, request.name.trim())
        .await?;
    Ok(Json(FileRecordResponse::from(record)))
}
