use std::env;
use std::str::FromStr;

use tracing::warn;

use crate::config::settings::LoggingConfig;
use crate::config::tokens::ServiceConfig;
use crate::utils::constants::*;

/// Fills every unset manager option from the environment, then from defaults.
/// Values present in the YAML always win.
pub fn initiate_default_values(mut config: ServiceConfig) -> ServiceConfig {
    let settings = &mut config.settings;

    settings.expiration_threshold_ms = settings
        .expiration_threshold_ms
        .or_else(|| env_parsed(ENV_EXPIRATION_THRESHOLD))
        .or(Some(DEFAULT_EXPIRATION_THRESHOLD_MS));
    settings.refresh_interval_ms = settings
        .refresh_interval_ms
        .or_else(|| env_parsed(ENV_REFRESH_INTERVAL))
        .or(Some(DEFAULT_REFRESH_INTERVAL_MS));
    settings.max_refresh_interval_ms = settings
        .max_refresh_interval_ms
        .or_else(|| env_parsed(ENV_MAX_REFRESH_INTERVAL))
        .or(Some(DEFAULT_MAX_REFRESH_INTERVAL_MS));
    settings.backoff_factor = settings
        .backoff_factor
        .or_else(|| env_parsed(ENV_BACKOFF_FACTOR))
        .or(Some(DEFAULT_BACKOFF_FACTOR));
    settings.realm = settings
        .realm
        .take()
        .or_else(|| env_string(ENV_REALM))
        .or_else(|| Some(DEFAULT_REALM.to_owned()));
    settings.credentials_dir = settings
        .credentials_dir
        .take()
        .or_else(|| env_string(ENV_CREDENTIALS_DIR));
    settings.oauth_tokeninfo_url = settings
        .oauth_tokeninfo_url
        .take()
        .or_else(|| env_string(ENV_OAUTH_TOKENINFO_URL));
    settings.oauth_token_url = settings
        .oauth_token_url
        .take()
        .or_else(|| env_string(ENV_OAUTH_TOKEN_URL));
    settings.http_timeout_ms = settings.http_timeout_ms.or(Some(DEFAULT_HTTP_TIMEOUT_MS));

    if settings.logging.is_none() {
        settings.logging = Some(LoggingConfig::default());
    }

    config
}

fn env_string(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_parsed<T: FromStr>(key: &str) -> Option<T> {
    let raw = env_string(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("ignoring {}='{}': not a valid value", key, raw);
            None
        }
    }
}
