//! Depot Services Library
//!
//! Server-resident services: the upload commit pipeline (blob write + record
//! write as one logical unit with compensating cleanup) and file lifecycle
//! operations (rename, share, delete, space usage).

pub mod lifecycle;
pub mod saga;
pub mod upload;

pub use lifecycle::FileLifecycleService;
pub use saga::CompensationStack;
pub use upload::{UploadLimits, UploadService};
