//! Configuration module
//!
//! Env-driven configuration for the API and services: server, database,
//! storage backend, and upload limits.

use std::env;
use std::time::Duration;

// Upload limits.
//
// The deadline leaves headroom under the platform's 60-second request
// timeout; the size ceiling is chosen so a full upload reliably fits
// inside that deadline.
pub const MAX_FILE_SIZE_BYTES: u64 = 15 * 1024 * 1024;
pub const UPLOAD_DEADLINE_SECS: u64 = 55;

/// Available bucket capacity surfaced on the quota dashboard.
pub const TOTAL_SPACE_BYTES: i64 = 2 * 1024 * 1024 * 1024;

const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_BUCKET: &str = "files";
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    // Database
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    // Storage
    pub storage_backend: String,
    pub bucket: String,
    pub local_storage_path: String,
    pub local_storage_base_url: String,
    // Upload limits
    pub max_file_size_bytes: u64,
    pub upload_deadline_secs: u64,
    pub total_space_bytes: i64,
}

impl Config {
    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Deadline the upload write sequence is raced against.
    pub fn upload_deadline(&self) -> Duration {
        Duration::from_secs(self.upload_deadline_secs)
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

        Ok(Config {
            server_port: parse_env("SERVER_PORT", DEFAULT_SERVER_PORT)?,
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_default()
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            database_url,
            db_max_connections: parse_env("DB_MAX_CONNECTIONS", MAX_CONNECTIONS)?,
            db_timeout_seconds: parse_env("DB_TIMEOUT_SECONDS", CONNECTION_TIMEOUT_SECS)?,
            storage_backend: env::var("STORAGE_BACKEND").unwrap_or_else(|_| "local".to_string()),
            bucket: env::var("STORAGE_BUCKET").unwrap_or_else(|_| DEFAULT_BUCKET.to_string()),
            local_storage_path: env::var("LOCAL_STORAGE_PATH")
                .unwrap_or_else(|_| "./data/blobs".to_string()),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000/blobs".to_string()),
            max_file_size_bytes: parse_env("MAX_FILE_SIZE_BYTES", MAX_FILE_SIZE_BYTES)?,
            upload_deadline_secs: parse_env("UPLOAD_DEADLINE_SECS", UPLOAD_DEADLINE_SECS)?,
            total_space_bytes: parse_env("TOTAL_SPACE_BYTES", TOTAL_SPACE_BYTES)?,
        })
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T, anyhow::Error>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_limits_fit_the_platform_timeout() {
        // Ceiling stays under what the 55s deadline can reliably move.
        assert_eq!(MAX_FILE_SIZE_BYTES, 15 * 1024 * 1024);
        assert!(UPLOAD_DEADLINE_SECS < 60);
    }

    #[test]
    fn test_is_production() {
        let mut config = Config {
            server_port: 3000,
            cors_origins: vec![],
            environment: "development".to_string(),
            database_url: "postgres://localhost/depot".to_string(),
            db_max_connections: MAX_CONNECTIONS,
            db_timeout_seconds: CONNECTION_TIMEOUT_SECS,
            storage_backend: "local".to_string(),
            bucket: DEFAULT_BUCKET.to_string(),
            local_storage_path: "./data/blobs".to_string(),
            local_storage_base_url: "http://localhost:3000/blobs".to_string(),
            max_file_size_bytes: MAX_FILE_SIZE_BYTES,
            upload_deadline_secs: UPLOAD_DEADLINE_SECS,
            total_space_bytes: TOTAL_SPACE_BYTES,
        };
        assert!(!config.is_production());
        config.environment = "Production".to_string();
        assert!(config.is_production());
    }
}
