use serde::Deserialize;

use crate::credentials::{ClientCredentials, UserCredentials};

/// Body of a successful token endpoint response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// seconds
    pub expires_in: u64,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Body of a successful token-info response. Only the remaining lifetime is used.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenInfo {
    pub expires_in: u64,
    #[serde(default)]
    pub scope: Option<Vec<String>>,
}

/// Everything needed for one password-grant request.
#[derive(Debug, Clone)]
pub struct ObtainRequest {
    pub client: ClientCredentials,
    pub user: UserCredentials,
    /// space separated, empty when no scopes are configured
    pub scope: String,
}
