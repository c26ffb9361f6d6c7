// Bucket operations

use std::io::Write;
use tracing::{info, warn};

use crate::storage::ObjectStore;
use crate::types::{StorageError, StorageResult};

pub const BUCKET_NAME_PREFIX: &str = "my-first-s3-bucket-";

pub fn generate_bucket_name() -> String {
    format!("{}{}", BUCKET_NAME_PREFIX, uuid::Uuid::new_v4())
}

/// Checks a name against the S3 bucket naming rules.
pub fn validate_bucket_name(name: &str) -> StorageResult<()> {
    let invalid = |reason: &str| {
        Err(StorageError::client(format!("Invalid bucket name {:?}: {}", name, reason)))
    };

    if name.len() < 3 || name.len() > 63 {
        return invalid("must be between 3 and 63 characters long");
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
    {
        return invalid("only lowercase letters, digits, '-' and '.' are allowed");
    }

    let bytes = name.as_bytes();
    let alnum = |b: u8| b.is_ascii_lowercase() || b.is_ascii_digit();
    if !alnum(bytes[0]) || !alnum(bytes[bytes.len() - 1]) {
        return invalid("must begin and end with a letter or digit");
    }
    if name.contains("..") {
        return invalid("must not contain two adjacent periods");
    }
    if name.parse::<std::net::Ipv4Addr>().is_ok() {
        return invalid("must not be formatted as an IP address");
    }
    Ok(())
}

/// Creates the bucket unless it already exists, then prints its location.
///
/// Returns the bucket name, which is generated when `name` is `None`.
pub async fn create_bucket<W: Write>(
    store: &dyn ObjectStore,
    name: Option<&str>,
    out: &mut W,
) -> StorageResult<String> {
    let bucket = name.map(str::to_string).unwrap_or_else(generate_bucket_name);
    validate_bucket_name(&bucket)?;

    if store.bucket_exists(&bucket).await? {
        info!("Bucket {} already exists, skipping creation", bucket);
    } else {
        store.create_bucket(&bucket).await?;
    }

    let location = store.bucket_location(&bucket).await?;
    writeln!(out, "bucket location = {}", location)?;
    Ok(bucket)
}

pub async fn list_buckets<W: Write>(store: &dyn ObjectStore, out: &mut W) -> StorageResult<usize> {
    let buckets = store.list_buckets().await?;
    for bucket in &buckets {
        writeln!(out, "{} {} {}", bucket.name, bucket.owner, bucket.creation_date)?;
    }
    Ok(buckets.len())
}

pub async fn delete_bucket<W: Write>(
    store: &dyn ObjectStore,
    bucket: &str,
    out: &mut W,
) -> StorageResult<()> {
    store.delete_bucket(bucket).await?;
    writeln!(out, "deleted bucket {}", bucket)?;
    Ok(())
}

/// Deletes every bucket that holds no objects and prints each deleted name.
pub async fn delete_empty_buckets<W: Write>(
    store: &dyn ObjectStore,
    out: &mut W,
) -> StorageResult<Vec<String>> {
    let mut deleted = Vec::new();

    for bucket in store.list_buckets().await? {
        let listing = store.list_objects(&bucket.name, None).await?;
        if !listing.is_empty() {
            info!("Keeping bucket {} ({} objects)", bucket.name, listing.objects.len());
            continue;
        }

        writeln!(out, "{}", bucket.name)?;
        store.delete_bucket(&bucket.name).await?;
        deleted.push(bucket.name);
    }

    if deleted.is_empty() {
        warn!("No empty buckets found");
    }
    Ok(deleted)
}
