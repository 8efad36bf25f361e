//! Depot Storage Library
//!
//! This crate provides the blob storage abstraction and its implementations.
//! Blobs are addressed by (bucket, blob id); the record database references
//! them through a `BlobRef` composite key.
//!
//! Deletes are idempotent on every backend: deleting an absent blob succeeds,
//! so a compensating delete can never fail just because the blob is already
//! gone.

pub mod factory;
pub mod local;
pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use depot_core::StorageBackend;
pub use factory::create_blob_store;
pub use local::LocalBlobStore;
pub use memory::MemoryBlobStore;
pub use traits::{BlobStore, StorageError, StorageResult, StoredBlob};
