// View types and error definitions

use bytes::Bytes;
use serde::Deserialize;

/// A bucket as reported by the service's bucket listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketSummary {
    pub name: String,
    pub owner: String,
    pub creation_date: String,
}

/// One entry of an object listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    pub key: String,
    pub size: u64,
    pub last_modified: String,
}

/// All pages of a bucket listing, flattened.
#[derive(Debug, Clone, Default)]
pub struct ObjectListing {
    pub bucket: String,
    pub prefix: Option<String>,
    pub objects: Vec<ObjectSummary>,
}

impl ObjectListing {
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn total_size(&self) -> u64 {
        self.objects.iter().map(|o| o.size).sum()
    }
}

/// A downloaded object.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub key: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl StoredObject {
    /// True when the media type is `text/plain`, ignoring parameters like `charset`.
    pub fn is_plain_text(&self) -> bool {
        self.content_type
            .as_deref()
            .and_then(|ct| ct.parse::<mime::Mime>().ok())
            .map(|m| m.essence_str() == mime::TEXT_PLAIN.essence_str())
            .unwrap_or(false)
    }
}

/// Which side the service blamed for a rejected request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorType {
    Client,
    Service,
    Unknown,
}

impl ErrorType {
    pub fn from_status(status_code: u16) -> Self {
        match status_code {
            400..=499 => ErrorType::Client,
            500..=599 => ErrorType::Service,
            _ => ErrorType::Unknown,
        }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorType::Client => write!(f, "Client"),
            ErrorType::Service => write!(f, "Service"),
            ErrorType::Unknown => write!(f, "Unknown"),
        }
    }
}

/// A request that reached the service and came back with an error response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceError {
    pub message: String,
    pub status_code: u16,
    pub error_code: Option<String>,
    pub error_type: ErrorType,
    pub request_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ErrorDocument {
    code: Option<String>,
    message: Option<String>,
    request_id: Option<String>,
}

impl ServiceError {
    pub fn new(status_code: u16, error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code,
            error_code: Some(error_code.into()),
            error_type: ErrorType::from_status(status_code),
            request_id: None,
        }
    }

    /// Builds a service error from an S3 `<Error>` document.
    ///
    /// HEAD responses and some proxies return no body or a non-XML one; the
    /// status code is kept and the raw text becomes the message.
    pub fn from_response(status_code: u16, body: &str) -> Self {
        let trimmed = body.trim();
        let doc = if trimmed.starts_with('<') {
            quick_xml::de::from_str::<ErrorDocument>(trimmed).unwrap_or_default()
        } else {
            ErrorDocument::default()
        };

        let message = doc.message.unwrap_or_else(|| {
            if trimmed.is_empty() || trimmed.starts_with('<') {
                format!("request failed with HTTP status {}", status_code)
            } else {
                trimmed.to_string()
            }
        });

        Self {
            message,
            status_code,
            error_code: doc.code,
            error_type: ErrorType::from_status(status_code),
            request_id: doc.request_id,
        }
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (HTTP {}", self.message, self.status_code)?;
        if let Some(code) = &self.error_code {
            write!(f, ", {}", code)?;
        }
        write!(f, ")")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Service rejected request: {0}")]
    Service(ServiceError),

    #[error("Client error: {0}")]
    Client(String),
}

impl StorageError {
    pub fn client(message: impl Into<String>) -> Self {
        StorageError::Client(message.into())
    }

    /// Configuration and credential failures, with their full context chain.
    pub fn setup(err: anyhow::Error) -> Self {
        StorageError::Client(format!("{:#}", err))
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            StorageError::Service(e) => Some(e.status_code),
            StorageError::Client(_) => None,
        }
    }

    pub fn error_code(&self) -> Option<&str> {
        match self {
            StorageError::Service(e) => e.error_code.as_deref(),
            StorageError::Client(_) => None,
        }
    }
}

impl From<ServiceError> for StorageError {
    fn from(e: ServiceError) -> Self {
        StorageError::Service(e)
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Client(format!("I/O error: {}", e))
    }
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;
