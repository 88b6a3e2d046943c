pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod ui;

// Always available for integration tests but marked as test-only
#[cfg(any(test, debug_assertions, feature = "test-utils"))]
pub mod test_utils;

pub use config::AppConfig;
pub use errors::{ApiOperation, MediaError};
pub use models::{FileId, FileRecord, UploadPayload, UploadReceipt};
pub use services::{DeleteController, FileListStore, HttpMediaApi, MediaApi, ThumbnailResolver, UploadController};
