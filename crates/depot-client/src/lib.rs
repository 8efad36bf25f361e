//! Depot Client Library
//!
//! Client-side intake for file uploads: screens dropped files against the
//! size ceiling before any network traffic, tracks them in a pending set
//! while dispatch is in flight, and reports per-file outcomes through a
//! `Notifier`. The HTTP dispatcher talks to the Depot API over multipart.

pub mod controller;
pub mod dispatcher;
pub mod notify;
pub mod pending;

pub use controller::IntakeController;
pub use dispatcher::{DroppedFile, HttpDispatcher, UploadDispatcher};
pub use notify::{Notification, NotificationVariant, Notifier, TracingNotifier};
pub use pending::{PendingUpload, UploadState};
