//! Shared constants and defaults

pub const DEFAULT_EXPIRATION_THRESHOLD_MS: u64 = 60_000;
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 10_000;
pub const DEFAULT_MAX_REFRESH_INTERVAL_MS: u64 = 300_000;
pub const DEFAULT_BACKOFF_FACTOR: f64 = 2.0;
pub const DEFAULT_REALM: &str = "/services";
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 5000;

// Environment fallbacks for settings missing from the YAML
pub const ENV_EXPIRATION_THRESHOLD: &str = "TOKENS_EXPIRATION_THRESHOLD";
pub const ENV_REFRESH_INTERVAL: &str = "TOKENS_REFRESH_INTERVAL";
pub const ENV_MAX_REFRESH_INTERVAL: &str = "TOKENS_MAX_REFRESH_INTERVAL";
pub const ENV_BACKOFF_FACTOR: &str = "TOKENS_BACKOFF_FACTOR";
pub const ENV_REALM: &str = "TOKENS_REALM";
pub const ENV_CREDENTIALS_DIR: &str = "CREDENTIALS_DIR";
pub const ENV_OAUTH_TOKENINFO_URL: &str = "OAUTH_TOKENINFO_URL";
pub const ENV_OAUTH_TOKEN_URL: &str = "OAUTH_TOKEN_URL";

/// Static tokens, `name:token,name:token`. When set, nothing is refreshed.
pub const ENV_OAUTH_ACCESS_TOKENS: &str = "OAUTH_ACCESS_TOKENS";

// Credential files inside the credentials dir
pub const CLIENT_CREDENTIALS_FILE: &str = "client.json";
pub const USER_CREDENTIALS_FILE: &str = "user.json";
pub const MISSING_CLIENT_SECRET: &str = "NOT_A_SECRET";

pub const USER_AGENT: &str = concat!("token-manager (", env!("CARGO_PKG_VERSION"), ")");
