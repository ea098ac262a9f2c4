use chrono::{DateTime, TimeDelta, Utc};
use std::sync::{Arc, Mutex, PoisonError};

/// Source of wall-clock time, injectable so expiry math can be tested.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Milliseconds since the UNIX epoch.
    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

pub fn default_clock() -> Arc<dyn Clock> {
    Arc::new(SystemClock)
}

struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for tests.
pub struct MockClock {
    current_time: Mutex<DateTime<Utc>>,
}

impl MockClock {
    pub fn new(initial: DateTime<Utc>) -> Self {
        Self {
            current_time: Mutex::new(initial),
        }
    }

    /// Clock frozen at the given epoch millis.
    pub fn at_millis(millis: i64) -> Self {
        Self::new(DateTime::from_timestamp_millis(millis).unwrap_or_default())
    }

    pub fn advance(&self, duration: TimeDelta) {
        let mut time = self.current_time.lock().unwrap_or_else(PoisonError::into_inner);
        *time += duration;
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current_time.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Epoch millis rendered as RFC 3339, for log lines.
pub fn millis_to_rfc3339(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| millis.to_string())
}
