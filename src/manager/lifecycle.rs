use std::collections::HashMap;
use std::sync::Arc;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::cache::token::CachedToken;
use crate::cache::token_cache::TokenCache;
use crate::config::manager::ManagerConfig;
use crate::config::settings::ValidityCheck;
use crate::config::tokens::TokenConfig;
use crate::credentials::CredentialSource;
use crate::error::TokenError;
use crate::helpers::time::{default_clock, millis_to_rfc3339, Clock};
use crate::observability::metrics::get_metrics;
use crate::sources::{ObtainRequest, TokenEndpoint, TokenResponse};

static VALID_MSG: &str = "valid";
static OBTAINED_MSG: &str = "obtained";
static FAILED_MSG: &str = "failed";

/// What `update_token` did for a token that ended up usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// the cached token passed the validity check
    StillValid,
    /// a new token was obtained and stored
    Obtained,
}

/// Keeps one named token usable: check validity, obtain if needed, store.
///
/// The lifecycle is the only writer of the cache.
pub struct TokenLifecycle {
    config: Arc<ManagerConfig>,
    tokens: Arc<HashMap<String, TokenConfig>>,
    cache: TokenCache,
    endpoint: Arc<dyn TokenEndpoint>,
    credentials: Arc<dyn CredentialSource>,
    clock: Arc<dyn Clock>,
}

impl TokenLifecycle {
    pub fn new(
        config: ManagerConfig,
        tokens: HashMap<String, TokenConfig>,
        cache: TokenCache,
        endpoint: Arc<dyn TokenEndpoint>,
        credentials: Arc<dyn CredentialSource>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            tokens: Arc::new(tokens),
            cache,
            endpoint,
            credentials,
            clock: default_clock(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn cache(&self) -> &TokenCache {
        &self.cache
    }

    /// Configured token names, sorted.
    pub fn token_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tokens.keys().cloned().collect();
        names.sort();
        names
    }

    /// Ok with the current entry if it can keep being served, Err otherwise.
    ///
    /// A missing entry fails with `NotFound` before anything goes over the
    /// network.
    pub async fn check_validity(&self, name: &str) -> Result<CachedToken, TokenError> {
        let cached = self
            .cache
            .get(name)
            .ok_or_else(|| TokenError::NotFound(name.to_owned()))?;

        match self.config.validity_check {
            ValidityCheck::Local => {
                if cached.is_valid_at(self.clock.now_millis()) {
                    Ok(cached)
                } else {
                    Err(TokenError::LocallyExpired(name.to_owned()))
                }
            }
            ValidityCheck::Remote => {
                let info = self
                    .endpoint
                    .token_info(&cached.access_token)
                    .await
                    .map_err(|source| TokenError::RemotelyInvalid {
                        name: name.to_owned(),
                        source,
                    })?;
                debug!("token '{}' is still valid for {} seconds", name, info.expires_in);
                let refreshed = CachedToken::new(
                    cached.access_token,
                    info.expires_in,
                    self.clock.now_millis(),
                    self.config.expiration_threshold_ms,
                );
                self.store(name, refreshed.clone()).await;
                Ok(refreshed)
            }
        }
    }

    /// Requests a new token for `name`. Does not touch the cache.
    pub async fn obtain(&self, name: &str) -> Result<TokenResponse, TokenError> {
        let token_config = self
            .tokens
            .get(name)
            .ok_or_else(|| TokenError::NotConfigured(name.to_owned()))?;

        let request = ObtainRequest {
            client: self.credentials.client_credentials()?,
            user: self.credentials.user_credentials()?,
            scope: token_config.scope_param(),
        };

        let metrics = get_metrics().await;
        let start = Instant::now();
        let result = self.endpoint.obtain(&request).await;
        metrics
            .token_obtain_duration
            .with_label_values(&[name])
            .observe(start.elapsed().as_secs_f64());

        result.map_err(|source| {
            metrics
                .token_obtain_failures
                .with_label_values(&[name, source.reason()])
                .inc();
            TokenError::Obtain {
                name: name.to_owned(),
                source,
            }
        })
    }

    /// Validity check, then obtain and store if the check failed.
    ///
    /// Fails only when an obtain was attempted and did not succeed; the cached
    /// entry is left as it was in that case.
    pub async fn update_token(&self, name: &str) -> Result<UpdateOutcome, TokenError> {
        let metrics = get_metrics().await;

        let reason = match self.check_validity(name).await {
            Ok(_) => {
                metrics.token_refresh.with_label_values(&[name, VALID_MSG]).inc();
                return Ok(UpdateOutcome::StillValid);
            }
            Err(reason) => reason,
        };
        debug!("{}, obtaining a new one", reason);

        match self.obtain(name).await {
            Ok(response) => {
                let cached = CachedToken::new(
                    response.access_token,
                    response.expires_in,
                    self.clock.now_millis(),
                    self.config.expiration_threshold_ms,
                );
                info!(
                    "obtained new token '{}', expires locally at {}",
                    name,
                    millis_to_rfc3339(cached.local_expiry_ms)
                );
                self.store(name, cached).await;
                metrics.token_refresh.with_label_values(&[name, OBTAINED_MSG]).inc();
                Ok(UpdateOutcome::Obtained)
            }
            Err(e) => {
                warn!("{}", e);
                metrics.token_refresh.with_label_values(&[name, FAILED_MSG]).inc();
                Err(e)
            }
        }
    }

    async fn store(&self, name: &str, token: CachedToken) {
        let metrics = get_metrics().await;
        metrics
            .token_local_expiry_ms
            .with_label_values(&[name])
            .set(token.local_expiry_ms);
        self.cache.put(name, token);
        metrics.cached_tokens.set(self.cache.len() as i64);
    }
}
