//! Client and resource-owner credentials used by the password grant.

pub mod dir;

use serde::Deserialize;

use crate::error::TokenError;

pub use dir::DirCredentialSource;

/// OAuth2 client, sent as HTTP Basic auth.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: Option<String>,
}

/// Resource owner, sent as `username` / `password` form fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserCredentials {
    #[serde(rename = "application_username")]
    pub username: String,
    #[serde(rename = "application_password")]
    pub password: String,
}

/// Resolves credentials for an obtain. Called on every obtain so rotated
/// secrets are picked up without a restart.
pub trait CredentialSource: Send + Sync {
    fn client_credentials(&self) -> Result<ClientCredentials, TokenError>;
    fn user_credentials(&self) -> Result<UserCredentials, TokenError>;
}

/// Fixed credentials held in memory.
#[derive(Debug, Clone)]
pub struct StaticCredentialSource {
    client: ClientCredentials,
    user: UserCredentials,
}

impl StaticCredentialSource {
    pub fn new(client: ClientCredentials, user: UserCredentials) -> Self {
        Self { client, user }
    }
}

impl CredentialSource for StaticCredentialSource {
    fn client_credentials(&self) -> Result<ClientCredentials, TokenError> {
        Ok(self.client.clone())
    }

    fn user_credentials(&self) -> Result<UserCredentials, TokenError> {
        Ok(self.user.clone())
    }
}
