//! Read side handed to the rest of the process.
//!
//! [`create`] picks the mode: static tokens from `OAUTH_ACCESS_TOKENS` when
//! that variable is set, otherwise tokens refreshed in the background.

pub mod local;
pub mod managed;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use crate::config::tokens::ServiceConfig;

pub use local::LocalTokens;
pub use managed::ManagedTokens;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenMode {
    /// refreshed from the issuer
    Default,
    /// fixed values from the environment
    Local,
}

#[async_trait]
pub trait TokenAccessor: Send + Sync {
    /// Current access token for `name`, `None` if there is none. Never blocks
    /// on the network and never changes state.
    fn get(&self, name: &str) -> Option<String>;

    /// Stops refreshing. Idempotent.
    fn stop(&self);

    fn mode(&self) -> TokenMode;

    /// Stops and waits until background work has settled.
    async fn shutdown(&self) {
        self.stop();
    }
}

/// Builds the accessor for this process and starts refreshing if needed.
/// Must be called inside a tokio runtime.
pub fn create(config: &ServiceConfig) -> Result<Arc<dyn TokenAccessor>> {
    if local::local_tokens_requested() {
        info!("Running in local mode.");
        return Ok(Arc::new(LocalTokens::from_env()));
    }

    info!("Running in default mode.");
    let managed = ManagedTokens::from_config(config)?;
    managed.start();
    Ok(Arc::new(managed))
}
