use crate::auth::OwnerContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    delete,
    path = "/api/v0/files/{id}",
    tag = "files",
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    responses(
        (status = 204, description = "File deleted successfully"),
        (status = 404, description = "File not found or not owned by the caller", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(owner = %ctx.owner, file_id = %id, operation = "delete_file"))]
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    ctx: OwnerContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    state.lifecycle.delete(id, ctx.owner).await?;
    Ok(StatusCode::NO_CONTENT)
}
