use crate::auth::OwnerContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use depot_core::SpaceUsage;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/v0/space",
    tag = "space",
    responses(
        (status = 200, description = "Per-kind and total space usage", body = SpaceUsage),
        (status = 401, description = "Missing or invalid identity headers", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(owner = %ctx.owner, operation = "space_usage"))]
pub async fn space_usage(
    State(state): State<Arc<AppState>>,
    ctx: OwnerContext,
) -> Result<impl IntoResponse, HttpAppError> {
    let usage = state.lifecycle.space_usage(ctx.owner).await?;
    Ok(Json(usage))
}
