// tests/common/mod.rs
pub use axum::Router;
pub use serde_json::json;
pub use tokio::task::JoinHandle;

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use http::StatusCode;

use crate::cache::token_cache::TokenCache;
use crate::config::manager::ManagerConfig;
use crate::config::tokens::TokenConfig;
use crate::credentials::{ClientCredentials, CredentialSource, StaticCredentialSource, UserCredentials};
use crate::error::{EndpointError, TokenError};
use crate::helpers::time::MockClock;
use crate::manager::TokenLifecycle;
use crate::sources::{ObtainRequest, TokenEndpoint, TokenInfo, TokenResponse};

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn test_client() -> ClientCredentials {
    ClientCredentials {
        client_id: "clientid".to_owned(),
        client_secret: Some("clientsecret".to_owned()),
    }
}

pub fn test_user() -> UserCredentials {
    UserCredentials {
        username: "user".to_owned(),
        password: "password".to_owned(),
    }
}

pub fn static_credentials() -> Arc<dyn CredentialSource> {
    Arc::new(StaticCredentialSource::new(test_client(), test_user()))
}

/// Credential source that always fails.
pub struct BrokenCredentials;

impl CredentialSource for BrokenCredentials {
    fn client_credentials(&self) -> Result<ClientCredentials, TokenError> {
        Err(TokenError::CredentialResolution("client.json missing".to_owned()))
    }

    fn user_credentials(&self) -> Result<UserCredentials, TokenError> {
        Err(TokenError::CredentialResolution("user.json missing".to_owned()))
    }
}

/// In-memory token endpoint that records calls.
///
/// Obtains answer `token-<scope>-<n>`; scopes listed in `fail_scopes` get a 503
/// and scopes in `panic_scopes` panic the calling task.
/// Token-info answers with `info_expires_in`, or 401 when it is `None`.
pub struct StubEndpoint {
    pub obtain_calls: AtomicUsize,
    pub info_calls: AtomicUsize,
    pub expires_in: u64,
    fail_scopes: Mutex<HashSet<String>>,
    panic_scopes: Mutex<HashSet<String>>,
    info_expires_in: Mutex<Option<u64>>,
    requests: Mutex<Vec<String>>,
}

impl StubEndpoint {
    pub fn new(expires_in: u64) -> Arc<Self> {
        Arc::new(Self {
            obtain_calls: AtomicUsize::new(0),
            info_calls: AtomicUsize::new(0),
            expires_in,
            fail_scopes: Mutex::new(HashSet::new()),
            panic_scopes: Mutex::new(HashSet::new()),
            info_expires_in: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn fail_scope(&self, scope: &str) {
        self.fail_scopes.lock().unwrap().insert(scope.to_owned());
    }

    pub fn panic_scope(&self, scope: &str) {
        self.panic_scopes.lock().unwrap().insert(scope.to_owned());
    }

    pub fn recover_scope(&self, scope: &str) {
        self.fail_scopes.lock().unwrap().remove(scope);
    }

    pub fn set_token_info(&self, expires_in: Option<u64>) {
        *self.info_expires_in.lock().unwrap() = expires_in;
    }

    pub fn obtain_count(&self) -> usize {
        self.obtain_calls.load(Ordering::SeqCst)
    }

    pub fn info_count(&self) -> usize {
        self.info_calls.load(Ordering::SeqCst)
    }

    /// Scopes of every obtain so far, in call order.
    pub fn requested_scopes(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenEndpoint for StubEndpoint {
    async fn token_info(&self, _access_token: &str) -> Result<TokenInfo, EndpointError> {
        self.info_calls.fetch_add(1, Ordering::SeqCst);
        match *self.info_expires_in.lock().unwrap() {
            Some(expires_in) => Ok(TokenInfo { expires_in, scope: None }),
            None => Err(EndpointError::Status {
                status: StatusCode::UNAUTHORIZED,
                body: "invalid_token".to_owned(),
            }),
        }
    }

    async fn obtain(&self, request: &ObtainRequest) -> Result<TokenResponse, EndpointError> {
        let n = self.obtain_calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.scope.clone());
        let panics = self.panic_scopes.lock().unwrap().contains(&request.scope);
        if panics {
            panic!("endpoint blew up for scope '{}'", request.scope);
        }
        if self.fail_scopes.lock().unwrap().contains(&request.scope) {
            return Err(EndpointError::Status {
                status: StatusCode::SERVICE_UNAVAILABLE,
                body: "unavailable".to_owned(),
            });
        }
        Ok(TokenResponse {
            access_token: format!("token-{}-{}", request.scope, n),
            expires_in: self.expires_in,
            token_type: Some("Bearer".to_owned()),
            scope: Some(request.scope.clone()),
        })
    }
}

pub fn token_configs(entries: &[(&str, &[&str])]) -> HashMap<String, TokenConfig> {
    entries
        .iter()
        .map(|(name, scope)| (name.to_string(), TokenConfig::new(scope.iter().copied())))
        .collect()
}

pub fn manager_config(threshold_ms: u64) -> ManagerConfig {
    let mut config = ManagerConfig::with_endpoints("http://127.0.0.1:1/token", None);
    config.expiration_threshold_ms = threshold_ms;
    config
}

pub fn lifecycle(
    config: ManagerConfig,
    tokens: HashMap<String, TokenConfig>,
    endpoint: Arc<dyn TokenEndpoint>,
    clock: Arc<MockClock>,
) -> TokenLifecycle {
    TokenLifecycle::new(config, tokens, TokenCache::new(), endpoint, static_credentials())
        .with_clock(clock)
}

/// Writes client.json and user.json into `dir`.
pub fn write_credentials(dir: &std::path::Path, client_secret: Option<&str>) {
    let client = match client_secret {
        Some(secret) => json!({"client_id": "clientid", "client_secret": secret}),
        None => json!({"client_id": "clientid"}),
    };
    std::fs::write(dir.join("client.json"), client.to_string()).unwrap();
    std::fs::write(
        dir.join("user.json"),
        json!({"application_username": "user", "application_password": "password"}).to_string(),
    )
    .unwrap();
}
