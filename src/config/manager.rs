use anyhow::{anyhow, Result};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::settings::{SettingsConfig, ValidityCheck};
use crate::utils::constants::*;

/// Resolved, immutable manager configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ManagerConfig {
    pub expiration_threshold_ms: u64,
    pub refresh_interval_ms: u64,
    pub max_refresh_interval_ms: u64,
    pub backoff_factor: f64,
    pub realm: String,
    pub token_url: String,
    pub token_info_url: Option<String>,
    pub credentials_dir: PathBuf,
    pub validity_check: ValidityCheck,
    pub http_timeout: Duration,
}

impl ManagerConfig {
    /// Builds the manager config from settings that already went through
    /// `proc_initiator`. Fails when a value without a default is still missing.
    pub fn from_settings(settings: &SettingsConfig) -> Result<Self> {
        let token_url = settings
            .oauth_token_url
            .to_owned()
            .ok_or_else(|| anyhow!("settings.oauth_token_url is required (or {})", ENV_OAUTH_TOKEN_URL))?;
        let credentials_dir = settings
            .credentials_dir
            .to_owned()
            .map(PathBuf::from)
            .ok_or_else(|| anyhow!("settings.credentials_dir is required (or {})", ENV_CREDENTIALS_DIR))?;

        Ok(Self {
            expiration_threshold_ms: settings
                .expiration_threshold_ms
                .unwrap_or(DEFAULT_EXPIRATION_THRESHOLD_MS),
            refresh_interval_ms: settings.refresh_interval_ms.unwrap_or(DEFAULT_REFRESH_INTERVAL_MS),
            max_refresh_interval_ms: settings
                .max_refresh_interval_ms
                .unwrap_or(DEFAULT_MAX_REFRESH_INTERVAL_MS),
            backoff_factor: settings.backoff_factor.unwrap_or(DEFAULT_BACKOFF_FACTOR),
            realm: settings.realm.to_owned().unwrap_or_else(|| DEFAULT_REALM.to_owned()),
            token_url,
            token_info_url: settings.oauth_tokeninfo_url.to_owned(),
            credentials_dir,
            validity_check: settings.validity_check,
            http_timeout: Duration::from_millis(settings.http_timeout_ms.unwrap_or(DEFAULT_HTTP_TIMEOUT_MS)),
        })
    }

    /// Config with defaults for every tunable, pointing at the given endpoints.
    pub fn with_endpoints(token_url: impl Into<String>, token_info_url: Option<String>) -> Self {
        Self {
            expiration_threshold_ms: DEFAULT_EXPIRATION_THRESHOLD_MS,
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            max_refresh_interval_ms: DEFAULT_MAX_REFRESH_INTERVAL_MS,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            realm: DEFAULT_REALM.to_owned(),
            token_url: token_url.into(),
            token_info_url,
            credentials_dir: PathBuf::new(),
            validity_check: ValidityCheck::Local,
            http_timeout: Duration::from_millis(DEFAULT_HTTP_TIMEOUT_MS),
        }
    }
}
