use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::cache::token_cache::TokenCache;
use crate::config::manager::ManagerConfig;
use crate::config::tokens::ServiceConfig;
use crate::credentials::DirCredentialSource;
use crate::manager::{BatchScheduler, TokenLifecycle};
use crate::sources::HttpTokenEndpoint;
use crate::tokens::{TokenAccessor, TokenMode};

/// Tokens kept fresh by a background [`BatchScheduler`].
pub struct ManagedTokens {
    cache: TokenCache,
    scheduler: Arc<BatchScheduler>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl ManagedTokens {
    pub fn new(lifecycle: Arc<TokenLifecycle>) -> Self {
        let cache = lifecycle.cache().clone();
        let scheduler = Arc::new(BatchScheduler::new(lifecycle.clone(), lifecycle.config()));
        Self {
            cache,
            scheduler,
            handle: Mutex::new(None),
        }
    }

    /// Wires the HTTP endpoint and the credentials dir from the service config.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let manager_config = ManagerConfig::from_settings(&config.settings)?;
        let client = HttpTokenEndpoint::build_client(&manager_config).context("building HTTP client")?;
        let endpoint = HttpTokenEndpoint::new(client, &manager_config);
        let credentials = DirCredentialSource::new(manager_config.credentials_dir.to_owned());

        let lifecycle = TokenLifecycle::new(
            manager_config,
            config.tokens.clone(),
            TokenCache::new(),
            Arc::new(endpoint),
            Arc::new(credentials),
        );
        Ok(Self::new(Arc::new(lifecycle)))
    }

    /// Spawns the refresh loop; the first batch runs right away.
    pub fn start(&self) {
        let mut handle = self.handle.lock().unwrap_or_else(PoisonError::into_inner);
        if handle.is_some() {
            warn!("token refresh already started");
            return;
        }
        *handle = Some(self.scheduler.spawn());
    }

    pub fn scheduler(&self) -> &Arc<BatchScheduler> {
        &self.scheduler
    }

    pub fn cache(&self) -> &TokenCache {
        &self.cache
    }
}

#[async_trait]
impl TokenAccessor for ManagedTokens {
    fn get(&self, name: &str) -> Option<String> {
        self.cache.access_token(name)
    }

    fn stop(&self) {
        self.scheduler.stop();
    }

    fn mode(&self) -> TokenMode {
        TokenMode::Default
    }

    async fn shutdown(&self) {
        self.stop();
        let handle = self.handle.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!("refresh loop ended abnormally: {}", e);
            }
        }
    }
}
