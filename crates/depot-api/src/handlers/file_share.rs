use crate::auth::OwnerContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use depot_core::FileRecordResponse;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ShareRequest {
    /// Full recipient list; replaces the stored one.
    pub emails: Vec<String>,
}

#[utoipa::path(
    patch,
    path = "/api/v0/files/{id}/users",
    tag = "files",
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    request_body = ShareRequest,
    responses(
        (status = 200, description = "Share list updated", body = FileRecordResponse),
        (status = 404, description = "File not found or not owned by the caller", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(owner = %ctx.owner, file_id = %id, operation = "share_file"))]
pub async fn share_file(
    State(state): State<Arc<AppState>>,
    ctx: OwnerContext,
    Path(id): Path<Uuid>,
    Json(request): Json<ShareRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let record = state.lifecycle.share(id, ctx.owner, request.emails).await?;
    Ok(Json(FileRecordResponse::from(record)))
}
