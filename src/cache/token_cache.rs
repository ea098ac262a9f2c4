use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::cache::token::CachedToken;

/// Token cache: token name -> last successfully obtained token.
///
/// Cloning shares the underlying map. Locks are never held across an await,
/// so readers only wait for a map insert at most.
#[derive(Debug, Clone, Default)]
pub struct TokenCache {
    inner: Arc<RwLock<HashMap<String, CachedToken>>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<CachedToken> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Overwrite unconditionally.
    pub fn put(&self, name: &str, token: CachedToken) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_owned(), token);
    }

    pub fn access_token(&self, name: &str) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .map(|token| token.access_token.to_owned())
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
