// Object operations

use bytes::Bytes;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use crate::storage::ObjectStore;
use crate::types::{StorageError, StorageResult};

/// Uploaded when no local file is given.
pub const SAMPLE_TEXT: &str = "abcdefghijklmnopqrstuvwxyz\n\
01234567890112345678901234\n\
!@#$%^&*()-=[]{};':',.<>/?\n\
01234567890112345678901234\n\
abcdefghijklmnopqrstuvwxyz\n\
hello\n";

/// What `download_object` did with the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Printed { lines: usize },
    Saved { path: PathBuf, bytes: usize },
}

pub async fn list_objects<W: Write>(
    store: &dyn ObjectStore,
    bucket: &str,
    prefix: Option<&str>,
    out: &mut W,
) -> StorageResult<usize> {
    let listing = store.list_objects(bucket, prefix).await?;
    for object in &listing.objects {
        writeln!(out, " - {}  (size = {} bytes)", object.key, object.size)?;
    }
    debug!(
        "{} objects, {} bytes total in {} (prefix {:?})",
        listing.objects.len(),
        listing.total_size(),
        listing.bucket,
        listing.prefix
    );
    Ok(listing.objects.len())
}

/// Uploads `file` under `key`, or the sample text when no file is given.
///
/// Uploading to an existing key replaces its data.
pub async fn upload_file<W: Write>(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
    file: Option<&Path>,
    out: &mut W,
) -> StorageResult<usize> {
    let (body, content_type, source) = match file {
        Some(path) => {
            let data = fs::read(path).await.map_err(|e| {
                StorageError::client(format!("Failed to read {}: {}", path.display(), e))
            })?;
            let content_type = mime_guess::from_path(path).first_or_octet_stream();
            (data, content_type.essence_str().to_string(), path.display().to_string())
        }
        None => {
            let sample = write_sample_file()?;
            let data = fs::read(sample.path()).await?;
            let source = sample.path().display().to_string();
            // the temp file is removed when `sample` drops
            (data, mime::TEXT_PLAIN.essence_str().to_string(), source)
        }
    };

    let size = body.len();
    store
        .put_object(bucket, key, Bytes::from(body), &content_type)
        .await?;

    writeln!(
        out,
        "uploaded {} to s3://{}/{} ({} bytes, {})",
        source, bucket, key, size, content_type
    )?;
    Ok(size)
}

fn write_sample_file() -> StorageResult<tempfile::NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("s3-crud-demo-")
        .suffix(".txt")
        .tempfile()?;
    file.write_all(SAMPLE_TEXT.as_bytes())?;
    file.flush()?;
    Ok(file)
}

/// Prints plain-text objects line by line and saves everything else to disk.
///
/// Without `output`, the file name is the last `/` segment of the key.
pub async fn download_object<W: Write>(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
    output: Option<&Path>,
    out: &mut W,
) -> StorageResult<DownloadOutcome> {
    let object = store.get_object(bucket, key).await?;
    writeln!(
        out,
        "Content-Type: {}",
        object.content_type.as_deref().unwrap_or("")
    )?;

    if object.is_plain_text() {
        let text = String::from_utf8_lossy(&object.body);
        let mut lines = 0;
        for line in text.lines() {
            writeln!(out, "{}", line)?;
            lines += 1;
        }
        return Ok(DownloadOutcome::Printed { lines });
    }

    let path = match output {
        Some(path) => path.to_path_buf(),
        None => default_output_path(key)?,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    fs::write(&path, &object.body).await?;

    info!("Saved {}/{} to {:?}", bucket, key, path);
    writeln!(out, "saved {} bytes to {}", object.body.len(), path.display())?;
    Ok(DownloadOutcome::Saved {
        path,
        bytes: object.body.len(),
    })
}

fn default_output_path(key: &str) -> StorageResult<PathBuf> {
    key.rsplit('/')
        .next()
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .map(PathBuf::from)
        .ok_or_else(|| {
            StorageError::client(format!("Cannot derive a file name from key {:?}, pass --output", key))
        })
}

pub async fn delete_object<W: Write>(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
    out: &mut W,
) -> StorageResult<()> {
    store.delete_object(bucket, key).await?;
    writeln!(out, "deleted s3://{}/{}", bucket, key)?;
    Ok(())
}
