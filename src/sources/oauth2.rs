use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::manager::ManagerConfig;
use crate::error::EndpointError;
use crate::sources::dto::{ObtainRequest, TokenInfo, TokenResponse};
use crate::sources::TokenEndpoint;
use crate::utils::constants::{MISSING_CLIENT_SECRET, USER_AGENT};

/// Token endpoint client backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpTokenEndpoint {
    client: Client,
    token_url: String,
    token_info_url: Option<String>,
    realm: String,
}

impl HttpTokenEndpoint {
    pub fn new(client: Client, config: &ManagerConfig) -> Self {
        Self {
            client,
            token_url: config.token_url.to_owned(),
            token_info_url: config.token_info_url.to_owned(),
            realm: config.realm.to_owned(),
        }
    }

    /// Builds a client with the configured transport timeout and user agent.
    pub fn build_client(config: &ManagerConfig) -> Result<Client, EndpointError> {
        Ok(Client::builder()
            .timeout(config.http_timeout)
            .user_agent(USER_AGENT)
            .build()?)
    }
}

#[async_trait]
impl TokenEndpoint for HttpTokenEndpoint {
    async fn token_info(&self, access_token: &str) -> Result<TokenInfo, EndpointError> {
        let url = self
            .token_info_url
            .as_deref()
            .ok_or(EndpointError::NotConfigured("oauth_tokeninfo_url"))?;

        let response = self
            .client
            .get(url)
            .query(&[("access_token", access_token)])
            .send()
            .await?;
        read_json(response).await
    }

    async fn obtain(&self, request: &ObtainRequest) -> Result<TokenResponse, EndpointError> {
        let secret = request
            .client
            .client_secret
            .as_deref()
            .unwrap_or(MISSING_CLIENT_SECRET);
        let form = [
            ("grant_type", "password"),
            ("username", request.user.username.as_str()),
            ("password", request.user.password.as_str()),
            ("scope", request.scope.as_str()),
        ];

        debug!("POST {} realm={} scope='{}'", self.token_url, self.realm, request.scope);
        let response = self
            .client
            .post(&self.token_url)
            .query(&[("realm", self.realm.as_str())])
            .basic_auth(&request.client.client_id, Some(secret))
            .form(&form)
            .send()
            .await?;
        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, EndpointError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(EndpointError::Status { status, body });
    }
    Ok(serde_json::from_str(&body)?)
}
