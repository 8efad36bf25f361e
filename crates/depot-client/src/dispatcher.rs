//! Upload dispatch.
//!
//! `UploadDispatcher` is the seam between the intake controller and the
//! transport. The HTTP implementation posts a multipart form to the Depot
//! API; tests plug in recording or gated fakes.

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use depot_core::config::{MAX_FILE_SIZE_BYTES, UPLOAD_DEADLINE_SECS};
use depot_core::{AppError, FileRecord};
use std::time::Duration;
use uuid::Uuid;

/// A file handed to the controller, bytes already in memory.
#[derive(Debug, Clone)]
pub struct DroppedFile {
    pub name: String,
    pub size_bytes: u64,
    pub data: Bytes,
}

impl DroppedFile {
    pub fn from_bytes(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let data = data.into();
        Self {
            name: name.into(),
            size_bytes: data.len() as u64,
            data,
        }
    }
}

#[async_trait]
pub trait UploadDispatcher: Send + Sync {
    async fn upload(&self, file: DroppedFile) -> Result<FileRecord, AppError>;
}

/// Error body returned by the API on failure. Matches the server's
/// `ErrorResponse` shape; only the fields the client uses are listed.
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    code: Option<String>,
}

/// Rebuild the `AppError` variant from the server's machine-readable error
/// code, falling back to the HTTP status for bodies without one.
///
/// The body carries no numeric limits, so `TooLarge` and `Timeout` are
/// reconstructed from the declared file size and the stock limits.
fn classify_failure(status: u16, body: Option<ErrorBody>, size_bytes: u64) -> AppError {
    let (message, code) = match body {
        Some(body) => (body.error, body.code),
        None => (format!("upload failed with status {}", status), None),
    };
    // The server renders client_message(); undo the upload-failure prefix so
    // rendering the rebuilt variant does not stack it.
    let message = message
        .strip_prefix("Failed to upload file: ")
        .map(str::to_string)
        .unwrap_or(message);

    match code.as_deref() {
        Some("PAYLOAD_TOO_LARGE") => AppError::TooLarge {
            size_bytes,
            limit_bytes: MAX_FILE_SIZE_BYTES,
        },
        Some("UPLOAD_TIMEOUT") => AppError::Timeout {
            deadline_secs: UPLOAD_DEADLINE_SECS,
        },
        Some("READ_FAILURE") => AppError::ReadFailure(message),
        Some("STORAGE_WRITE_FAILURE") => AppError::StorageWriteFailure(message),
        Some("RECORD_WRITE_FAILURE") => AppError::RecordWriteFailure(message),
        Some("NOT_FOUND") => AppError::NotFound(message),
        Some("DATABASE_ERROR") => AppError::Database(message),
        Some("UNAUTHORIZED") => AppError::Unauthorized(message),
        Some("INVALID_INPUT") => AppError::InvalidInput(message),
        _ => match status {
            401 => AppError::Unauthorized(message),
            404 => AppError::NotFound(message),
            _ => AppError::Unknown(message),
        },
    }
}

/// Dispatcher that posts uploads to the Depot API.
#[derive(Debug, Clone)]
pub struct HttpDispatcher {
    client: reqwest::Client,
    base_url: String,
    owner: Uuid,
    account_id: Uuid,
}

impl HttpDispatcher {
    pub fn new(base_url: &str, owner: Uuid, account_id: Uuid) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(90))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            owner,
            account_id,
        })
    }

    fn files_url(&self) -> String {
        format!("{}/api/v0/files", self.base_url)
    }
}

#[async_trait]
impl UploadDispatcher for HttpDispatcher {
    async fn upload(&self, file: DroppedFile) -> Result<FileRecord, AppError> {
        let size_bytes = file.size_bytes;
        let form = reqwest::multipart::Form::new().part(
            "file",
            reqwest::multipart::Part::bytes(file.data.to_vec()).file_name(file.name.clone()),
        );

        let response = self
            .client
            .post(self.files_url())
            .header("x-owner-id", self.owner.to_string())
            .header("x-account-id", self.account_id.to_string())
            .multipart(form)
            .send()
            .await
            .map_err(|err| AppError::Unknown(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.json::<ErrorBody>().await.ok();
            return Err(classify_failure(status.as_u16(), body, size_bytes));
        }

        response
            .json::<FileRecord>()
            .await
            .map_err(|err| AppError::Unknown(format!("invalid upload response: {}", err)))
    }
}
