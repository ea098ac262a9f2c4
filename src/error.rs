use http::StatusCode;
use thiserror::Error;

/// Failure of a single outbound call to the token or token-info endpoint.
#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("endpoint responded with {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("endpoint is not configured: {0}")]
    NotConfigured(&'static str),
}

impl EndpointError {
    /// Short label used for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            EndpointError::Transport(_) => "transport",
            EndpointError::Status { status, .. } if status.is_client_error() => "rejected",
            EndpointError::Status { .. } => "unavailable",
            EndpointError::Decode(_) => "decode",
            EndpointError::NotConfigured(_) => "not_configured",
        }
    }
}

/// Everything that can go wrong while keeping one named token fresh.
///
/// `NotFound`, `LocallyExpired` and `RemotelyInvalid` are recoverable: they only
/// tell the lifecycle that a new token has to be obtained.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token '{0}' does not exist")]
    NotFound(String),
    #[error("token '{0}' expired locally")]
    LocallyExpired(String),
    #[error("token '{name}' is invalid: {source}")]
    RemotelyInvalid {
        name: String,
        #[source]
        source: EndpointError,
    },
    #[error("token '{0}' is not configured")]
    NotConfigured(String),
    #[error("could not resolve credentials: {0}")]
    CredentialResolution(String),
    #[error("could not obtain token '{name}': {source}")]
    Obtain {
        name: String,
        #[source]
        source: EndpointError,
    },
}
