//! Credential loading
//!
//! Reads a profile from a shared-credentials style INI file, or defers to
//! rust-s3's own provider chain when no file is configured.

use anyhow::{anyhow, Context, Result};
use s3::creds::Credentials;
use std::path::Path;
use tracing::{debug, info};

use crate::config::StorageConfig;

const ACCESS_KEY_ID: &str = "aws_access_key_id";
const SECRET_ACCESS_KEY: &str = "aws_secret_access_key";
const SESSION_TOKEN: &str = "aws_session_token";

pub fn resolve_credentials(config: &StorageConfig) -> Result<Credentials> {
    match &config.credentials_file {
        Some(path) => load_profile(path, &config.profile),
        None => {
            debug!("No credentials file configured, using provider chain for profile {}", config.profile);
            Credentials::from_profile(Some(config.profile.as_str()))
                .or_else(|_| Credentials::from_env())
                .map_err(|e| anyhow!("No credentials found for profile {}: {}", config.profile, e))
        }
    }
}

/// Load one `[profile]` section from a credentials file.
pub fn load_profile(path: &Path, profile: &str) -> Result<Credentials> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read credentials file {}", path.display()))?;

    let settings = ::config::Config::builder()
        .add_source(::config::File::from_str(&content, ::config::FileFormat::Ini))
        .build()
        .with_context(|| format!("Failed to parse credentials file {}", path.display()))?;

    let lookup = |field: &str| settings.get_string(&format!("{}.{}", profile, field)).ok();

    let access_key = lookup(ACCESS_KEY_ID).ok_or_else(|| {
        anyhow!("Profile {} in {} has no {}", profile, path.display(), ACCESS_KEY_ID)
    })?;
    let secret_key = lookup(SECRET_ACCESS_KEY).ok_or_else(|| {
        anyhow!("Profile {} in {} has no {}", profile, path.display(), SECRET_ACCESS_KEY)
    })?;
    let session_token = lookup(SESSION_TOKEN);

    let credentials = Credentials::new(
        Some(access_key.as_str()),
        Some(secret_key.as_str()),
        None,
        session_token.as_deref(),
        None,
    )
    .map_err(|e| anyhow!("Invalid credentials in profile {}: {}", profile, e))?;

    info!("Loaded credentials for profile {} from {:?}", profile, path);
    Ok(credentials)
}
