use bytes::Bytes;
use std::path::PathBuf;

/// Where the bytes of a pending upload come from.
///
/// The commit pipeline reads the source fully into memory as its first step;
/// admission runs against the declared size before any read happens.
#[derive(Debug, Clone)]
pub enum UploadSource {
    /// Bytes already in memory (e.g. extracted from a multipart request).
    Memory(Bytes),
    /// A file on the local filesystem, read at commit time.
    File(PathBuf),
}

impl UploadSource {
    /// Read the full contents into memory.
    pub async fn read_all(&self) -> std::io::Result<Vec<u8>> {
        match self {
            UploadSource::Memory(bytes) => Ok(bytes.to_vec()),
            UploadSource::File(path) => tokio::fs::read(path).await,
        }
    }
}

/// One file handed to the commit pipeline.
#[derive(Debug, Clone)]
pub struct NewUpload {
    /// Original filename, including extension.
    pub name: String,
    /// Size declared before reading; checked against the admission ceiling.
    pub size_bytes: u64,
    pub source: UploadSource,
}

impl NewUpload {
    /// Build an upload from in-memory bytes.
    pub fn from_bytes(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let data = data.into();
        Self {
            name: name.into(),
            size_bytes: data.len() as u64,
            source: UploadSource::Memory(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_source_reads_back() {
        let upload = NewUpload::from_bytes("a.png", &b"pixels"[..]);
        assert_eq!(upload.size_bytes, 6);
        assert_eq!(upload.source.read_all().await.unwrap(), b"pixels");
    }

    #[tokio::test]
    async fn test_file_source_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = UploadSource::File(dir.path().join("missing.bin"));
        assert!(source.read_all().await.is_err());
    }
}
