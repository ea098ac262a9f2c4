use serde::Deserialize;

/// ================================
/// Global service-wide settings
/// ================================
///
/// Every manager option is optional here; missing values are filled from the
/// environment and then from built-in defaults by `proc_initiator`.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SettingsConfig {
    /// safety margin subtracted from the issuer expiry
    pub expiration_threshold_ms: Option<u64>,
    /// base (and minimum) delay between refresh batches
    pub refresh_interval_ms: Option<u64>,
    /// backoff cap
    /// invariant: >= refresh_interval_ms
    pub max_refresh_interval_ms: Option<u64>,
    /// invariant: > 1
    pub backoff_factor: Option<f64>,
    pub realm: Option<String>,
    pub credentials_dir: Option<String>,
    pub oauth_token_url: Option<String>,
    pub oauth_tokeninfo_url: Option<String>,
    #[serde(default)]
    pub validity_check: ValidityCheck,
    pub http_timeout_ms: Option<u64>,
    #[serde(default)]
    pub metrics: MetricsConfig,
    pub server: Option<ServerConfig>,
    pub logging: Option<LoggingConfig>,
}

/// How a cached token is judged before deciding to obtain a new one.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValidityCheck {
    /// compare the local expiry with the clock, no network
    #[default]
    Local,
    /// ask the token-info endpoint on every refresh
    Remote,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_path")]
    pub path: String,
    #[serde(default)]
    pub is_enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            path: default_metrics_path(),
            is_enabled: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: String
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new("info".to_owned(), LogFormat::Compact)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}
