use std::time::Duration;

use crate::config::manager::ManagerConfig;

/// Delay between refresh batches.
///
/// Starts at the base interval, grows by `factor` after every failed batch up to
/// `max_ms`, and falls back to the base after a fully successful batch. Growth
/// only depends on the current value, not on how many failures came before.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshBackoff {
    base_ms: u64,
    /// invariant: >= base_ms
    max_ms: u64,
    /// invariant: > 1
    factor: f64,
    current_ms: u64,
}

impl RefreshBackoff {
    pub fn new(base_ms: u64, max_ms: u64, factor: f64) -> Self {
        let max_ms = max_ms.max(base_ms);
        Self {
            base_ms,
            max_ms,
            factor,
            current_ms: base_ms,
        }
    }

    pub fn from_config(config: &ManagerConfig) -> Self {
        Self::new(
            config.refresh_interval_ms,
            config.max_refresh_interval_ms,
            config.backoff_factor,
        )
    }

    pub fn current_ms(&self) -> u64 {
        self.current_ms
    }

    pub fn current(&self) -> Duration {
        Duration::from_millis(self.current_ms)
    }

    pub fn is_backing_off(&self) -> bool {
        self.current_ms > self.base_ms
    }

    /// Records a fully successful batch and returns the next delay.
    pub fn success(&mut self) -> u64 {
        self.current_ms = self.base_ms;
        self.current_ms
    }

    /// Records a failed batch and returns the next delay.
    pub fn failure(&mut self) -> u64 {
        let grown = self.current_ms as f64 * self.factor;
        let next = if grown.is_finite() && grown < self.max_ms as f64 {
            grown as u64
        } else {
            self.max_ms
        };
        self.current_ms = next.clamp(self.base_ms, self.max_ms);
        self.current_ms
    }
}
