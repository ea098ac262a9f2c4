//! # Token Manager Library
//!
//! Keeps a fixed set of named OAuth2 access tokens fresh in the background
//! and hands out the current value without blocking.
//!
//! Modules:
//! - `config` : YAML configuration, env fallbacks and validation
//! - `cache` : cached tokens with local expiry
//! - `credentials` : client / resource-owner credentials
//! - `sources` : calls to the token and token-info endpoints
//! - `manager` : per-token lifecycle and the batch refresh loop
//! - `tokens` : public accessor, managed and static modes

pub mod cache;
pub mod config;
pub mod credentials;
pub mod error;
pub mod helpers;
pub mod manager;
pub mod observability;
pub mod resilience;
pub mod server;
pub mod sinks;
pub mod sources;
pub mod tokens;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::cache::token::CachedToken;
pub use crate::config::tokens::{ServiceConfig, TokenConfig};
pub use crate::error::{EndpointError, TokenError};
pub use crate::tokens::{create, TokenAccessor, TokenMode};
