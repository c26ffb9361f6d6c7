// Storage layer (S3-compatible)

use async_trait::async_trait;
use bytes::Bytes;

use crate::types::{BucketSummary, ObjectListing, StorageResult, StoredObject};

pub mod credentials;
pub mod s3_client;

#[cfg(test)]
pub mod memory;

pub use credentials::resolve_credentials;
pub use s3_client::S3Client;

/// The vendor calls the demo operations are built from.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn bucket_exists(&self, bucket: &str) -> StorageResult<bool>;

    /// Creates the bucket in the client's configured region.
    async fn create_bucket(&self, bucket: &str) -> StorageResult<()>;

    async fn bucket_location(&self, bucket: &str) -> StorageResult<String>;

    async fn list_buckets(&self) -> StorageResult<Vec<BucketSummary>>;

    async fn delete_bucket(&self, bucket: &str) -> StorageResult<()>;

    /// Lists every object under `prefix`, following continuation pages.
    async fn list_objects(&self, bucket: &str, prefix: Option<&str>) -> StorageResult<ObjectListing>;

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> StorageResult<()>;

    async fn get_object(&self, bucket: &str, key: &str) -> StorageResult<StoredObject>;

    async fn delete_object(&self, bucket: &str, key: &str) -> StorageResult<()>;
}
