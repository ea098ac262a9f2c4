use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tracing::info;

use crate::config::settings::{MetricsConfig, ServerConfig};
use crate::observability::metrics::{get_metrics, Metrics};
use crate::observability::routes::MetricsState;
use crate::sinks::sink_http::SinkHttpState;
use crate::tokens::TokenAccessor;

#[derive(Clone)]
pub struct AppState {
    pub metrics_state: MetricsState,
    pub sink_http_state: SinkHttpState,
}

impl AppState {
    pub fn new(metrics: &Metrics, tokens: Arc<dyn TokenAccessor>) -> Self {
        Self {
            metrics_state: MetricsState::new(metrics.registry.clone()),
            sink_http_state: SinkHttpState::new(tokens),
        }
    }
}

/// Token, health and (when enabled) metrics routes.
pub async fn router(metrics_config: &MetricsConfig, tokens: Arc<dyn TokenAccessor>) -> Router {
    let metrics = get_metrics().await;
    let state = AppState::new(metrics, tokens);

    Router::new()
        .merge(state.metrics_state.router(metrics_config))
        .merge(state.sink_http_state.router())
        .with_state(state)
}

/// Serves the routes until the process exits.
pub async fn start(
    server_config: &ServerConfig,
    metrics_config: &MetricsConfig,
    tokens: Arc<dyn TokenAccessor>,
) -> Result<()> {
    let app = router(metrics_config, tokens).await;

    let address = format!("{}:{}", server_config.host, server_config.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("binding {}", address))?;
    info!("serving tokens on {}", address);

    get_metrics().await.up.set(1);
    axum::serve(listener, app).await.context("http server failed")?;
    Ok(())
}
