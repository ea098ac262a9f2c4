//! Configuration validation with aggregated errors.
//! - Aggregates all issues into Vec<String>
//! - Validates:
//!   * refresh / backoff invariants
//!   * endpoint and credential settings required by the managed mode
//!   * token names and scopes
//!   * logging level

use tracing::{error, info};

use crate::config::settings::{SettingsConfig, ValidityCheck};
use crate::config::tokens::{ServiceConfig, TokenConfig};
use crate::observability::metrics::get_metrics;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
///
/// With `local_mode` the settings needed to talk to the issuer are not required,
/// tokens come from the environment instead.
pub async fn validate_service_config(cfg: &ServiceConfig, local_mode: bool) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_settings(&cfg.settings, local_mode, &mut errors);

    if cfg.tokens.is_empty() && !local_mode {
        errors.push("config: 'tokens' is empty; at least one token required".to_string());
    }

    let mut names: Vec<&String> = cfg.tokens.keys().collect();
    names.sort();
    for name in names {
        validate_token(name, &cfg.tokens[name], &mut errors);
    }

    if errors.is_empty() {
        info!("config is valid");
        Ok(())
    } else {
        let metrics = get_metrics().await;
        for e in &errors {
            error!("config validation: {}", e);
        }
        metrics.config_validation_errors.inc_by(errors.len() as u64);
        Err(errors)
    }
}

fn validate_settings(settings: &SettingsConfig, local_mode: bool, errors: &mut Vec<String>) {
    if let Some(factor) = settings.backoff_factor {
        if !factor.is_finite() || factor <= 1.0 {
            errors.push(format!("settings.backoff_factor must be > 1, got {}", factor));
        }
    }

    if settings.refresh_interval_ms == Some(0) {
        errors.push("settings.refresh_interval_ms must be > 0".to_string());
    }

    if let (Some(base), Some(max)) = (settings.refresh_interval_ms, settings.max_refresh_interval_ms) {
        if max < base {
            errors.push(format!(
                "settings.max_refresh_interval_ms ({}) must be >= settings.refresh_interval_ms ({})",
                max, base
            ));
        }
    }

    if settings.http_timeout_ms == Some(0) {
        errors.push("settings.http_timeout_ms must be > 0".to_string());
    }

    if let Some(logging) = &settings.logging {
        if !LOG_LEVELS.contains(&logging.level.to_lowercase().as_str()) {
            errors.push(format!(
                "settings.logging.level '{}' is not one of {:?}",
                logging.level, LOG_LEVELS
            ));
        }
    }

    if settings.metrics.is_enabled && !settings.metrics.path.starts_with('/') {
        errors.push(format!("settings.metrics.path '{}' must start with '/'", settings.metrics.path));
    }

    if local_mode {
        return;
    }

    match settings.oauth_token_url.as_deref() {
        None => errors.push("settings.oauth_token_url is required".to_string()),
        Some(url) => validate_url("settings.oauth_token_url", url, errors),
    }

    match settings.oauth_tokeninfo_url.as_deref() {
        None if settings.validity_check == ValidityCheck::Remote => errors.push(
            "settings.oauth_tokeninfo_url is required when validity_check is 'remote'".to_string(),
        ),
        None => {}
        Some(url) => validate_url("settings.oauth_tokeninfo_url", url, errors),
    }

    if settings.credentials_dir.as_deref().map_or(true, |dir| dir.trim().is_empty()) {
        errors.push("settings.credentials_dir is required".to_string());
    }
}

fn validate_url(field: &str, url: &str, errors: &mut Vec<String>) {
    if reqwest::Url::parse(url).is_err() {
        errors.push(format!("{} '{}' is not a valid URL", field, url));
    }
}

fn validate_token(name: &str, token: &TokenConfig, errors: &mut Vec<String>) {
    if name.trim().is_empty() {
        errors.push("tokens: token name must not be empty".to_string());
    }
    for scope in &token.scope {
        if scope.is_empty() || scope.chars().any(char::is_whitespace) {
            errors.push(format!(
                "tokens['{}'].scope entry '{}' must be non-empty and contain no whitespace",
                name, scope
            ));
        }
    }
}
