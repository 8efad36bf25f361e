use crate::auth::OwnerContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use depot_core::models::{NewUpload, UploadSource};
use depot_core::{AppError, FileRecordResponse};
use std::sync::Arc;

/// Extract file data and filename from a multipart form.
/// Only one field named "file" is accepted; multiple file fields are rejected.
async fn extract_multipart_file(mut multipart: Multipart) -> Result<(Vec<u8>, String), AppError> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        if field_name == "file" {
            if file_data.is_some() {
                return Err(AppError::InvalidInput(
                    "Multiple file fields are not allowed; send exactly one field named 'file'"
                        .to_string(),
                ));
            }
            filename = field.file_name().map(|s| s.to_string());
            file_data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| AppError::ReadFailure(format!("Failed to read file data: {}", e)))?
                    .to_vec(),
            );
        }
    }

    let data = file_data
        .ok_or_else(|| AppError::InvalidInput("No field named 'file' in request".to_string()))?;
    let filename =
        filename.ok_or_else(|| AppError::InvalidInput("File field has no filename".to_string()))?;

    Ok((data, filename))
}

#[utoipa::path(
    post,
    path = "/api/v0/files",
    tag = "files",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "File uploaded successfully", body = FileRecordResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid identity headers", body = ErrorResponse),
        (status = 408, description = "Upload timed out", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(owner = %ctx.owner, operation = "upload_file"))]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    ctx: OwnerContext,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let (data, filename) = extract_multipart_file(multipart).await?;

    let upload = NewUpload {
        name: filename,
        size_bytes: data.len() as u64,
        source: UploadSource::Memory(data.into()),
    };

    let record = state.uploads.commit(upload, ctx.owner, ctx.account_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(FileRecordResponse::from(record)),
    ))
}
