//! Error types module
//!
//! This module provides the error taxonomy used throughout the Depot
//! application. The upload pipeline classifies every low-level failure into
//! one of these variants at the boundary where it occurs; callers match on
//! the variant, never on message text.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like admission rejections
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "RECORD_WRITE_FAILURE")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("file size {size_bytes} exceeds limit of {limit_bytes} bytes")]
    TooLarge { size_bytes: u64, limit_bytes: u64 },

    #[error("failed to read file: {0}")]
    ReadFailure(String),

    #[error("failed to write blob to storage: {0}")]
    StorageWriteFailure(String),

    #[error("failed to create file record: {0}")]
    RecordWriteFailure(String),

    #[error("upload timed out after {deadline_secs} seconds")]
    Timeout { deadline_secs: u64 },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Unknown(err.to_string())
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::ReadFailure(err.to_string())
    }
}

/// Static metadata per variant: (http_status, error_code, recoverable, log_level).
/// client_message stays per-variant for dynamic content.
fn static_metadata(err: &AppError) -> (u16, &'static str, bool, LogLevel) {
    match err {
        AppError::TooLarge { .. } => (413, "PAYLOAD_TOO_LARGE", false, LogLevel::Debug),
        AppError::ReadFailure(_) => (400, "READ_FAILURE", false, LogLevel::Warn),
        AppError::StorageWriteFailure(_) => (500, "STORAGE_WRITE_FAILURE", true, LogLevel::Error),
        AppError::RecordWriteFailure(_) => (500, "RECORD_WRITE_FAILURE", true, LogLevel::Error),
        AppError::Timeout { .. } => (408, "UPLOAD_TIMEOUT", true, LogLevel::Warn),
        AppError::NotFound(_) => (404, "NOT_FOUND", false, LogLevel::Debug),
        AppError::Database(_) => (500, "DATABASE_ERROR", true, LogLevel::Error),
        AppError::Unauthorized(_) => (401, "UNAUTHORIZED", false, LogLevel::Debug),
        AppError::InvalidInput(_) => (400, "INVALID_INPUT", false, LogLevel::Debug),
        AppError::Unknown(_) => (500, "INTERNAL_ERROR", true, LogLevel::Error),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::TooLarge { .. } => "TooLarge",
            AppError::ReadFailure(_) => "ReadFailure",
            AppError::StorageWriteFailure(_) => "StorageWriteFailure",
            AppError::RecordWriteFailure(_) => "RecordWriteFailure",
            AppError::Timeout { .. } => "Timeout",
            AppError::NotFound(_) => "NotFound",
            AppError::Database(_) => "Database",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::Unknown(_) => "Unknown",
        }
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            AppError::TooLarge {
                size_bytes,
                limit_bytes,
            } => format!(
                "File size ({:.2} MB) is too large for reliable upload. Please use files smaller than {} MB.",
                *size_bytes as f64 / (1024.0 * 1024.0),
                limit_bytes / 1024 / 1024
            ),
            AppError::Timeout { .. } => {
                "Upload timed out. Please try a smaller file.".to_string()
            }
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::Unauthorized(ref msg) => msg.clone(),
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::Database(_) => "Failed to access database".to_string(),
            AppError::ReadFailure(ref msg)
            | AppError::StorageWriteFailure(ref msg)
            | AppError::RecordWriteFailure(ref msg)
            | AppError::Unknown(ref msg) => {
                format!("Failed to upload file: {}", msg)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_too_large() {
        let err = AppError::TooLarge {
            size_bytes: 20 * 1024 * 1024,
            limit_bytes: 15 * 1024 * 1024,
        };
        assert_eq!(err.http_status_code(), 413);
        assert_eq!(err.error_code(), "PAYLOAD_TOO_LARGE");
        assert!(!err.is_recoverable());
        assert!(err.client_message().contains("20.00 MB"));
        assert!(err.client_message().contains("smaller than 15 MB"));
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_error_metadata_timeout() {
        let err = AppError::Timeout { deadline_secs: 55 };
        assert_eq!(err.http_status_code(), 408);
        assert_eq!(err.error_code(), "UPLOAD_TIMEOUT");
        assert!(err.is_recoverable());
        assert_eq!(
            err.client_message(),
            "Upload timed out. Please try a smaller file."
        );
        assert_eq!(err.log_level(), LogLevel::Warn);
    }

    #[test]
    fn test_error_metadata_record_write_failure() {
        let err = AppError::RecordWriteFailure("connection reset".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "RECORD_WRITE_FAILURE");
        assert!(err.is_recoverable());
        assert_eq!(
            err.client_message(),
            "Failed to upload file: connection reset"
        );
        assert_eq!(err.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_error_metadata_not_found() {
        let err = AppError::NotFound("File not found".to_string());
        assert_eq!(err.http_status_code(), 404);
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert!(!err.is_recoverable());
        assert_eq!(err.client_message(), "File not found");
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_io_error_classified_as_read_failure() {
        let io_err = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "truncated");
        let err = AppError::from(io_err);
        assert!(matches!(err, AppError::ReadFailure(_)));
        assert_eq!(err.error_code(), "READ_FAILURE");
    }
}
