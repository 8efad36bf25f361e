use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// File category derived from the filename extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Image,
    Document,
    Video,
    Audio,
    Other,
}

const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "svg", "webp", "heic",
];
const DOCUMENT_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "txt", "xls", "xlsx", "csv", "rtf", "ods", "ppt", "odp", "md", "html",
    "htm", "epub", "pages",
];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv", "webm", "wmv", "flv"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "aac", "flac", "ogg", "wma", "m4a", "aiff"];

impl FileKind {
    /// Classify a lowercase extension (without dot).
    pub fn from_extension(extension: &str) -> Self {
        let ext = extension.to_lowercase();
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            FileKind::Image
        } else if DOCUMENT_EXTENSIONS.contains(&ext.as_str()) {
            FileKind::Document
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            FileKind::Video
        } else if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
            FileKind::Audio
        } else {
            FileKind::Other
        }
    }

    /// Derive (kind, extension) from a filename. A file without an extension
    /// classifies as Other with an empty extension.
    pub fn from_filename(filename: &str) -> (Self, String) {
        match filename.rsplit_once('.') {
            Some((base, ext)) if !base.is_empty() && !ext.is_empty() => {
                let ext = ext.to_lowercase();
                (Self::from_extension(&ext), ext)
            }
            _ => (FileKind::Other, String::new()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Image => "image",
            FileKind::Document => "document",
            FileKind::Video => "video",
            FileKind::Audio => "audio",
            FileKind::Other => "other",
        }
    }
}

impl std::str::FromStr for FileKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(FileKind::Image),
            "document" => Ok(FileKind::Document),
            "video" => Ok(FileKind::Video),
            "audio" => Ok(FileKind::Audio),
            "other" => Ok(FileKind::Other),
            _ => Err(format!("unknown file kind: {}", s)),
        }
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite foreign key into object storage: "{bucket}/{blob_id}".
///
/// Stored as a single text column so the delete path can recover both halves
/// from the record alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct BlobRef {
    pub bucket: String,
    pub blob_id: Uuid,
}

impl utoipa::PartialSchema for BlobRef {
    fn schema() -> utoipa::openapi::RefOr<utoipa::openapi::schema::Schema> {
        utoipa::openapi::ObjectBuilder::new()
            .schema_type(utoipa::openapi::schema::Type::String)
            .examples(["files/7f8c9f1e-46a5-4c5f-9c26-1f3b9f6f2a10"])
            .into()
    }
}

impl ToSchema for BlobRef {}

impl BlobRef {
    pub fn new(bucket: impl Into<String>, blob_id: Uuid) -> Self {
        Self {
            bucket: bucket.into(),
            blob_id,
        }
    }
}

impl std::fmt::Display for BlobRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.bucket, self.blob_id)
    }
}

impl From<BlobRef> for String {
    fn from(blob_ref: BlobRef) -> Self {
        blob_ref.to_string()
    }
}

impl std::str::FromStr for BlobRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (bucket, id) = s
            .rsplit_once('/')
            .ok_or_else(|| format!("invalid blob ref: {}", s))?;
        if bucket.is_empty() {
            return Err(format!("invalid blob ref: {}", s));
        }
        let blob_id = Uuid::parse_str(id).map_err(|e| format!("invalid blob id in {}: {}", s, e))?;
        Ok(BlobRef {
            bucket: bucket.to_string(),
            blob_id,
        })
    }
}

impl TryFrom<String> for BlobRef {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Durable file metadata record, one per successfully committed file.
///
/// Invariant: a FileRecord never exists without a live blob at `blob_ref`;
/// the upload pipeline's compensation step enforces this on every terminal
/// outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: Uuid,
    /// Display name, includes the extension.
    pub name: String,
    pub kind: FileKind,
    pub extension: String,
    pub size_bytes: i64,
    pub url: String,
    pub owner: Uuid,
    pub account_id: Uuid,
    /// Emails granted shared access.
    pub users: Vec<String>,
    pub blob_ref: BlobRef,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// API response shape for a file record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FileRecordResponse {
    pub id: Uuid,
    pub name: String,
    pub kind: FileKind,
    pub extension: String,
    pub size_bytes: i64,
    pub url: String,
    pub owner: Uuid,
    pub account_id: Uuid,
    pub users: Vec<String>,
    pub blob_ref: BlobRef,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FileRecord> for FileRecordResponse {
    fn from(record: FileRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            kind: record.kind,
            extension: record.extension,
            size_bytes: record.size_bytes,
            url: record.url,
            owner: record.owner,
            account_id: record.account_id,
            users: record.users,
            blob_ref: record.blob_ref,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
