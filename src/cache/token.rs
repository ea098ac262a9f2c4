use serde::{Deserialize, Serialize};

/// A token as held by the cache after a successful obtain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedToken {
    pub access_token: String,
    /// issuer lifetime, seconds
    pub expires_in: u64,
    /// epoch millis after which this process treats the token as stale
    pub local_expiry_ms: i64,
}

impl CachedToken {
    /// Builds an entry obtained at `obtained_at_ms`, expiring `threshold_ms`
    /// earlier than the issuer says. The result may already be in the past.
    pub fn new(access_token: String, expires_in: u64, obtained_at_ms: i64, threshold_ms: u64) -> Self {
        let expires_in_ms = i64::try_from(expires_in).unwrap_or(i64::MAX).saturating_mul(1000);
        let local_expiry_ms = obtained_at_ms
            .saturating_add(expires_in_ms)
            .saturating_sub(threshold_ms as i64);
        Self {
            access_token,
            expires_in,
            local_expiry_ms,
        }
    }

    /// Stale only once the local expiry is in the past.
    pub fn is_valid_at(&self, now_ms: i64) -> bool {
        self.local_expiry_ms >= now_ms
    }
}
