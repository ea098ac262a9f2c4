use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::debug;

use crate::server::server::AppState;
use crate::tokens::TokenAccessor;

/// Serves cached tokens over HTTP.
#[derive(Clone)]
pub struct SinkHttpState {
    tokens: Arc<dyn TokenAccessor>,
}

#[derive(Debug, Serialize)]
struct TokenBody<'a> {
    name: &'a str,
    access_token: String,
}

impl SinkHttpState {
    pub fn new(tokens: Arc<dyn TokenAccessor>) -> Self {
        Self { tokens }
    }

    pub fn router(&self) -> Router<AppState> {
        Router::new()
            .route("/tokens/{name}", get(get_token))
            .route("/health", get(health))
    }
}

async fn get_token(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    debug!("token '{}' requested over http", name);
    match state.sink_http_state.tokens.get(&name) {
        Some(access_token) => Json(TokenBody {
            name: &name,
            access_token,
        })
        .into_response(),
        None => (StatusCode::NOT_FOUND, format!("token '{}' not found", name)).into_response(),
    }
}

async fn health() -> &'static str {
    "ok"
}
