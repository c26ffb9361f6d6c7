use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_REGION: &str = "cn-north-1";
pub const DEFAULT_PROFILE: &str = "default";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub region: String,
    pub endpoint: Option<String>,
    pub credentials_file: Option<PathBuf>,
    pub profile: String,
    pub path_style: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            endpoint: None,
            credentials_file: None,
            profile: DEFAULT_PROFILE.to_string(),
            path_style: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            storage: StorageConfig {
                region: env::var("S3_REGION").unwrap_or_else(|_| DEFAULT_REGION.to_string()),
                endpoint: env::var("S3_ENDPOINT").ok().filter(|s| !s.is_empty()),
                credentials_file: env::var("S3_CREDENTIALS_FILE").ok().map(PathBuf::from),
                profile: env::var("S3_PROFILE").unwrap_or_else(|_| DEFAULT_PROFILE.to_string()),
                path_style: env::var("S3_PATH_STYLE")
                    .unwrap_or_else(|_| "false".to_string())
                    .parse()
                    .context("S3_PATH_STYLE must be true or false")?,
            },
        })
    }
}

/// Command-line values that take precedence over the environment.
#[derive(Debug, Clone, Default)]
pub struct StorageOverrides {
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub credentials_file: Option<PathBuf>,
    pub profile: Option<String>,
    pub path_style: bool,
}

impl StorageConfig {
    pub fn apply(&mut self, overrides: StorageOverrides) {
        if let Some(region) = overrides.region {
            self.region = region;
        }
        if let Some(endpoint) = overrides.endpoint {
            self.endpoint = Some(endpoint);
        }
        if let Some(path) = overrides.credentials_file {
            self.credentials_file = Some(path);
        }
        if let Some(profile) = overrides.profile {
            self.profile = profile;
        }
        self.path_style |= overrides.path_style;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_take_precedence() {
        let mut config = StorageConfig::default();
        config.apply(StorageOverrides {
            region: Some("us-west-2".to_string()),
            endpoint: Some("http://localhost:9000".to_string()),
            credentials_file: None,
            profile: Some("minio".to_string()),
            path_style: true,
        });

        assert_eq!(config.region, "us-west-2");
        assert_eq!(config.endpoint.as_deref(), Some("http://localhost:9000"));
        assert_eq!(config.credentials_file, None);
        assert_eq!(config.profile, "minio");
        assert!(config.path_style);
    }

    #[test]
    fn test_empty_overrides_keep_values() {
        let mut config = StorageConfig {
            path_style: true,
            ..StorageConfig::default()
        };
        config.apply(StorageOverrides::default());

        assert_eq!(config.region, DEFAULT_REGION);
        assert_eq!(config.profile, DEFAULT_PROFILE);
        assert!(config.path_style);
    }

    const ENV_VARS: [&str; 5] = [
        "S3_REGION",
        "S3_ENDPOINT",
        "S3_CREDENTIALS_FILE",
        "S3_PROFILE",
        "S3_PATH_STYLE",
    ];

    fn clear_env() {
        for name in ENV_VARS {
            env::remove_var(name);
        }
    }

    // Every case touches process-wide variables, so they run in one test.
    #[test]
    fn test_from_env() {
        clear_env();
        let config = Config::from_env().unwrap();
        assert_eq!(config.storage.region, DEFAULT_REGION);
        assert_eq!(config.storage.endpoint, None);
        assert_eq!(config.storage.credentials_file, None);
        assert_eq!(config.storage.profile, DEFAULT_PROFILE);
        assert!(!config.storage.path_style);

        env::set_var("S3_REGION", "us-west-2");
        env::set_var("S3_ENDPOINT", "");
        env::set_var("S3_CREDENTIALS_FILE", "/etc/s3/credentials");
        env::set_var("S3_PROFILE", "minio");
        env::set_var("S3_PATH_STYLE", "true");
        let config = Config::from_env().unwrap();
        assert_eq!(config.storage.region, "us-west-2");
        assert_eq!(config.storage.endpoint, None);
        assert_eq!(
            config.storage.credentials_file,
            Some(PathBuf::from("/etc/s3/credentials"))
        );
        assert_eq!(config.storage.profile, "minio");
        assert!(config.storage.path_style);

        env::set_var("S3_PATH_STYLE", "yes");
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("S3_PATH_STYLE"));

        clear_env();
    }
}
