pub mod file_delete;
pub mod file_rename;
pub mod file_share;
pub mod file_upload;
pub mod space;
