//! Depot DB Library
//!
//! Repository layer over the file-record database. The `RecordStore` trait is
//! the seam the upload pipeline and lifecycle services work against; the
//! Postgres implementation backs production and the in-memory implementation
//! backs tests (with failure injection for the compensation paths).

pub mod memory;
pub mod postgres;
pub mod records;

pub use memory::InMemoryRecordStore;
pub use postgres::PgRecordStore;
pub use records::{RecordStore, RecordStoreError, RecordStoreResult};
