//! Outbound calls to the OAuth2 issuer.
//!
//! The lifecycle only depends on [`TokenEndpoint`]; [`oauth2::HttpTokenEndpoint`]
//! is the production implementation.

use async_trait::async_trait;

use crate::error::EndpointError;

pub mod dto;
pub mod oauth2;

pub use dto::{ObtainRequest, TokenInfo, TokenResponse};
pub use oauth2::HttpTokenEndpoint;

#[async_trait]
pub trait TokenEndpoint: Send + Sync {
    /// Asks the token-info endpoint whether `access_token` is still valid.
    async fn token_info(&self, access_token: &str) -> Result<TokenInfo, EndpointError>;

    /// Requests a new token with the password grant.
    async fn obtain(&self, request: &ObtainRequest) -> Result<TokenResponse, EndpointError>;
}
