pub mod file;
pub mod space;
pub mod upload;

pub use file::{BlobRef, FileKind, FileRecord, FileRecordResponse};
pub use space::{KindUsage, SpaceUsage};
pub use upload::{NewUpload, UploadSource};
