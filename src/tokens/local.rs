use std::collections::HashMap;
use std::env;

use async_trait::async_trait;
use tracing::warn;

use crate::tokens::{TokenAccessor, TokenMode};
use crate::utils::constants::ENV_OAUTH_ACCESS_TOKENS;

/// True when static tokens are provided through the environment.
pub fn local_tokens_requested() -> bool {
    env::var(ENV_OAUTH_ACCESS_TOKENS)
        .map(|value| !value.trim().is_empty())
        .unwrap_or(false)
}

/// Tokens fixed at startup, nothing is ever refreshed.
#[derive(Debug, Clone, Default)]
pub struct LocalTokens {
    tokens: HashMap<String, String>,
}

impl LocalTokens {
    pub fn from_env() -> Self {
        Self::parse(&env::var(ENV_OAUTH_ACCESS_TOKENS).unwrap_or_default())
    }

    /// Parses `name:token,name:token`. Malformed entries are skipped.
    pub fn parse(raw: &str) -> Self {
        let tokens = raw
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .filter_map(|entry| match entry.split_once(':') {
                Some((name, token)) if !name.trim().is_empty() && !token.trim().is_empty() => {
                    Some((name.trim().to_owned(), token.trim().to_owned()))
                }
                _ => {
                    warn!("skipping malformed entry in {}", ENV_OAUTH_ACCESS_TOKENS);
                    None
                }
            })
            .collect();
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl TokenAccessor for LocalTokens {
    fn get(&self, name: &str) -> Option<String> {
        self.tokens.get(name).cloned()
    }

    fn stop(&self) {}

    fn mode(&self) -> TokenMode {
        TokenMode::Local
    }
}
