// s3-crud-demo - bucket and object CRUD walkthrough for S3-compatible storage

pub mod config;
pub mod operations;
pub mod storage;
pub mod types;
pub mod utils;

// Re-exports for convenience
pub use crate::config::Config;
pub use crate::storage::{ObjectStore, S3Client};
pub use crate::types::{StorageError, StorageResult};
