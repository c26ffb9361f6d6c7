// In-memory object store for tests

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::sync::Mutex;

use super::ObjectStore;
use crate::types::{
    BucketSummary, ObjectListing, ObjectSummary, ServiceError, StorageResult, StoredObject,
};

const OWNER: &str = "memory-owner";
const CREATED: &str = "2016-03-23T00:00:00Z";

#[derive(Default)]
struct MemoryBucket {
    objects: BTreeMap<String, (String, Bytes)>,
}

/// Mirrors the S3 error codes the demo operations can run into.
pub struct MemoryStore {
    region: String,
    buckets: Mutex<BTreeMap<String, MemoryBucket>>,
}

impl MemoryStore {
    pub fn new(region: &str) -> Self {
        Self {
            region: region.to_string(),
            buckets: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn with_bucket(self, name: &str) -> Self {
        self.buckets
            .lock()
            .unwrap()
            .insert(name.to_string(), MemoryBucket::default());
        self
    }

    pub fn with_object(self, bucket: &str, key: &str, content_type: &str, body: &[u8]) -> Self {
        self.buckets
            .lock()
            .unwrap()
            .entry(bucket.to_string())
            .or_default()
            .objects
            .insert(key.to_string(), (content_type.to_string(), Bytes::copy_from_slice(body)));
        self
    }

    pub fn bucket_names(&self) -> Vec<String> {
        self.buckets.lock().unwrap().keys().cloned().collect()
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<(String, Bytes)> {
        self.buckets
            .lock()
            .unwrap()
            .get(bucket)
            .and_then(|b| b.objects.get(key).cloned())
    }
}

fn no_such_bucket(bucket: &str) -> ServiceError {
    ServiceError::new(404, "NoSuchBucket", format!("The specified bucket {} does not exist", bucket))
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn bucket_exists(&self, bucket: &str) -> StorageResult<bool> {
        Ok(self.buckets.lock().unwrap().contains_key(bucket))
    }

    async fn create_bucket(&self, bucket: &str) -> StorageResult<()> {
        let mut buckets = self.buckets.lock().unwrap();
        if buckets.contains_key(bucket) {
            return Err(ServiceError::new(409, "BucketAlreadyOwnedByYou", "Bucket already exists").into());
        }
        buckets.insert(bucket.to_string(), MemoryBucket::default());
        Ok(())
    }

    async fn bucket_location(&self, bucket: &str) -> StorageResult<String> {
        if !self.buckets.lock().unwrap().contains_key(bucket) {
            return Err(no_such_bucket(bucket).into());
        }
        Ok(self.region.clone())
    }

    async fn list_buckets(&self) -> StorageResult<Vec<BucketSummary>> {
        Ok(self
            .bucket_names()
            .into_iter()
            .map(|name| BucketSummary {
                name,
                owner: OWNER.to_string(),
                creation_date: CREATED.to_string(),
            })
            .collect())
    }

    async fn delete_bucket(&self, bucket: &str) -> StorageResult<()> {
        let mut buckets = self.buckets.lock().unwrap();
        let empty = match buckets.get(bucket) {
            None => return Err(no_such_bucket(bucket).into()),
            Some(b) => b.objects.is_empty(),
        };
        if !empty {
            return Err(ServiceError::new(
                409,
                "BucketNotEmpty",
                "The bucket you tried to delete is not empty",
            )
            .into());
        }
        buckets.remove(bucket);
        Ok(())
    }

    async fn list_objects(&self, bucket: &str, prefix: Option<&str>) -> StorageResult<ObjectListing> {
        let buckets = self.buckets.lock().unwrap();
        let b = buckets.get(bucket).ok_or_else(|| no_such_bucket(bucket))?;
        let objects = b
            .objects
            .iter()
            .filter(|(key, _)| prefix.map_or(true, |p| key.starts_with(p)))
            .map(|(key, (_, body))| ObjectSummary {
                key: key.clone(),
                size: body.len() as u64,
                last_modified: CREATED.to_string(),
            })
            .collect();

        Ok(ObjectListing {
            bucket: bucket.to_string(),
            prefix: prefix.map(str::to_string),
            objects,
        })
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> StorageResult<()> {
        let mut buckets = self.buckets.lock().unwrap();
        let b = buckets.get_mut(bucket).ok_or_else(|| no_such_bucket(bucket))?;
        b.objects.insert(key.to_string(), (content_type.to_string(), body));
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> StorageResult<StoredObject> {
        let buckets = self.buckets.lock().unwrap();
        let b = buckets.get(bucket).ok_or_else(|| no_such_bucket(bucket))?;
        let (content_type, body) = b.objects.get(key).ok_or_else(|| {
            ServiceError::new(404, "NoSuchKey", "The specified key does not exist.")
        })?;
        Ok(StoredObject {
            key: key.to_string(),
            content_type: Some(content_type.clone()),
            body: body.clone(),
        })
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> StorageResult<()> {
        let mut buckets = self.buckets.lock().unwrap();
        let b = buckets.get_mut(bucket).ok_or_else(|| no_such_bucket(bucket))?;
        // S3 answers 204 for missing keys too
        b.objects.remove(key);
        Ok(())
    }
}
