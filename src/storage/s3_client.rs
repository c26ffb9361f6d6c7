// S3 client backed by rust-s3

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use s3::bucket::Bucket;
use s3::bucket_ops::BucketConfiguration;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::region::Region;
use tracing::{debug, info};

use super::{resolve_credentials, ObjectStore};
use crate::config::StorageConfig;
use crate::types::{
    BucketSummary, ObjectListing, ObjectSummary, ServiceError, StorageError, StorageResult,
    StoredObject,
};

impl From<S3Error> for StorageError {
    fn from(e: S3Error) -> Self {
        match e {
            S3Error::HttpFailWithBody(status, body) => {
                StorageError::Service(ServiceError::from_response(status, &body))
            }
            other => StorageError::Client(other.to_string()),
        }
    }
}

pub struct S3Client {
    region: Region,
    credentials: Credentials,
    path_style: bool,
}

impl S3Client {
    pub fn new(region: Region, credentials: Credentials, path_style: bool) -> Self {
        Self {
            region,
            credentials,
            path_style,
        }
    }

    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        let region = parse_region(&config.region, config.endpoint.as_deref())?;
        let credentials = resolve_credentials(config)?;
        info!(
            "S3 client configured for region {} (endpoint: {})",
            region,
            region.endpoint()
        );
        Ok(Self::new(region, credentials, config.path_style))
    }

    /// Like `from_config`, but setup failures land in the client error category.
    pub fn connect(config: &StorageConfig) -> StorageResult<Self> {
        Self::from_config(config).map_err(StorageError::setup)
    }

    fn bucket(&self, name: &str) -> StorageResult<Bucket> {
        let bucket = Bucket::new(name, self.region.clone(), self.credentials.clone())?;
        Ok(if self.path_style {
            bucket.with_path_style()
        } else {
            bucket
        })
    }
}

/// A custom endpoint always wins; otherwise the region name must be a known AWS region.
pub fn parse_region(name: &str, endpoint: Option<&str>) -> Result<Region> {
    match endpoint {
        Some(endpoint) => Ok(Region::Custom {
            region: name.to_string(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }),
        None => {
            let region: Region = name
                .parse()
                .with_context(|| format!("Invalid region name {}", name))?;
            if let Region::Custom { .. } = region {
                anyhow::bail!("Unknown region {} (set S3_ENDPOINT for custom services)", name);
            }
            Ok(region)
        }
    }
}

/// S3 reports us-east-1 as an empty `<LocationConstraint/>` (legacy: `US`) and
/// eu-west-1 as `EU`; rust-s3 surfaces the empty form as a `Custom` placeholder.
fn location_name(region: Region) -> String {
    match region {
        Region::Custom { region, .. } => match region.as_str() {
            "" | "Custom" | "US" => "us-east-1".to_string(),
            "EU" => "eu-west-1".to_string(),
            _ => region,
        },
        known => known.to_string(),
    }
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn bucket_exists(&self, bucket: &str) -> StorageResult<bool> {
        debug!("Checking whether bucket {} exists", bucket);
        let exists = self.bucket(bucket)?.exists().await?;
        Ok(exists)
    }

    async fn create_bucket(&self, bucket: &str) -> StorageResult<()> {
        debug!("Creating bucket {} in {}", bucket, self.region);
        let config = BucketConfiguration::default();
        let response = if self.path_style {
            Bucket::create_with_path_style(bucket, self.region.clone(), self.credentials.clone(), config)
                .await?
        } else {
            Bucket::create(bucket, self.region.clone(), self.credentials.clone(), config).await?
        };

        if !response.success() {
            return Err(ServiceError::from_response(response.response_code, &response.response_text).into());
        }
        info!("Created bucket {}", bucket);
        Ok(())
    }

    async fn bucket_location(&self, bucket: &str) -> StorageResult<String> {
        let (region, _status) = self.bucket(bucket)?.location().await?;
        let location = location_name(region);
        debug!("Bucket {} is located in {}", bucket, location);
        Ok(location)
    }

    async fn list_buckets(&self) -> StorageResult<Vec<BucketSummary>> {
        debug!("Listing buckets");
        let response = Bucket::list_buckets(self.region.clone(), self.credentials.clone()).await?;
        let owner = response.owner.id.clone();

        let buckets: Vec<BucketSummary> = response
            .buckets
            .bucket
            .iter()
            .map(|b| BucketSummary {
                name: b.name.clone(),
                owner: owner.clone(),
                creation_date: b.creation_date.to_string(),
            })
            .collect();

        info!("Listed {} buckets", buckets.len());
        Ok(buckets)
    }

    async fn delete_bucket(&self, bucket: &str) -> StorageResult<()> {
        debug!("Deleting bucket {}", bucket);
        let status = self.bucket(bucket)?.delete().await?;
        info!("Deleted bucket {} (status {})", bucket, status);
        Ok(())
    }

    async fn list_objects(&self, bucket: &str, prefix: Option<&str>) -> StorageResult<ObjectListing> {
        debug!("Listing objects in {} with prefix {:?}", bucket, prefix);
        let pages = self
            .bucket(bucket)?
            .list(prefix.unwrap_or_default().to_string(), None)
            .await?;

        let objects: Vec<ObjectSummary> = pages
            .into_iter()
            .flat_map(|page| page.contents)
            .map(|o| ObjectSummary {
                key: o.key,
                size: o.size,
                last_modified: o.last_modified,
            })
            .collect();

        info!("Listed {} objects in {}", objects.len(), bucket);
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
        debug!("Uploading {} bytes to {}/{}", body.len(), bucket, key);
        let response = self
            .bucket(bucket)?
            .put_object_with_content_type(key, &body, content_type)
            .await?;
        info!("Uploaded {}/{} (status {})", bucket, key, response.status_code());
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> StorageResult<StoredObject> {
        debug!("Downloading {}/{}", bucket, key);
        let response = self.bucket(bucket)?.get_object(key).await?;
        let content_type = response
            .headers()
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
            .map(|(_, value)| value.clone());
        let body = response.bytes().clone();

        info!("Downloaded {}/{} ({} bytes)", bucket, key, body.len());
        Ok(StoredObject {
            key: key.to_string(),
            content_type,
            body,
        })
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> StorageResult<()> {
        debug!("Deleting {}/{}", bucket, key);
        let response = self.bucket(bucket)?.delete_object(key).await?;
        info!("Deleted {}/{} (status {})", bucket, key, response.status_code());
        Ok(())
    }
}
