use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::{self, JoinHandle, JoinSet};
use tracing::{debug, error, info};

use crate::config::manager::ManagerConfig;
use crate::manager::lifecycle::TokenLifecycle;
use crate::observability::metrics::get_metrics;
use crate::resilience::backoff::RefreshBackoff;

static SUCCESS_MSG: &str = "success";
static FAILURE_MSG: &str = "failure";
static UNKNOWN_TASK: &str = "<unknown>";

/// Result of one refresh batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
    /// delay before the next batch, already adjusted for this outcome
    pub next_interval: Duration,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Refreshes every configured token in batches until stopped.
///
/// Batches never overlap: the next one starts only after every token of the
/// current one has settled and the interval has elapsed.
pub struct BatchScheduler {
    lifecycle: Arc<TokenLifecycle>,
    backoff: Mutex<RefreshBackoff>,
    stopped: AtomicBool,
    stop_signal: Notify,
}

impl BatchScheduler {
    pub fn new(lifecycle: Arc<TokenLifecycle>, config: &ManagerConfig) -> Self {
        Self {
            lifecycle,
            backoff: Mutex::new(RefreshBackoff::from_config(config)),
            stopped: AtomicBool::new(false),
            stop_signal: Notify::new(),
        }
    }

    pub fn lifecycle(&self) -> &Arc<TokenLifecycle> {
        &self.lifecycle
    }

    /// Prevents any further batch. A batch already running is not interrupted.
    pub fn stop(&self) {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            info!("token refresh stopped");
            self.stop_signal.notify_one();
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    pub fn current_interval(&self) -> Duration {
        self.backoff.lock().unwrap_or_else(PoisonError::into_inner).current()
    }

    /// Runs one batch: every token is updated concurrently and all of them are
    /// awaited, then the interval is reset or backed off.
    pub async fn tick(&self) -> BatchOutcome {
        let metrics = get_metrics().await;
        let names = self.lifecycle.token_names();
        debug!("refresh batch start, tokens: {:?}", names);

        let mut join_set = JoinSet::new();
        let mut task_names: HashMap<task::Id, String> = HashMap::with_capacity(names.len());
        for name in names {
            let lifecycle = self.lifecycle.clone();
            let task_name = name.clone();
            let handle = join_set.spawn(async move {
                let result = lifecycle.update_token(&name).await;
                (name, result)
            });
            task_names.insert(handle.id(), task_name);
        }

        let mut succeeded = Vec::new();
        let mut failed = Vec::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((name, Ok(outcome))) => {
                    debug!("token '{}' updated: {:?}", name, outcome);
                    succeeded.push(name);
                }
                Ok((name, Err(_))) => failed.push(name),
                Err(e) => {
                    let name = task_names
                        .remove(&e.id())
                        .unwrap_or_else(|| UNKNOWN_TASK.to_owned());
                    error!("update task for token '{}' failed: {}", name, e);
                    failed.push(name);
                }
            }
        }
        succeeded.sort();
        failed.sort();

        let next_interval_ms = {
            let mut backoff = self.backoff.lock().unwrap_or_else(PoisonError::into_inner);
            if failed.is_empty() {
                if backoff.is_backing_off() {
                    debug!("all updates were good, resetting refresh interval");
                }
                backoff.success()
            } else {
                let next = backoff.failure();
                error!(
                    "could not update all tokens {:?}, backing off. Retry in {} ms",
                    failed, next
                );
                next
            }
        };

        let outcome_label = if failed.is_empty() { SUCCESS_MSG } else { FAILURE_MSG };
        metrics.batches.with_label_values(&[outcome_label]).inc();
        metrics.refresh_interval_ms.set(next_interval_ms as i64);

        BatchOutcome {
            succeeded,
            failed,
            next_interval: Duration::from_millis(next_interval_ms),
        }
    }

    /// Batch loop. Returns once `stop` has been called.
    pub async fn run(&self) {
        loop {
            if self.is_stopped() {
                info!("refresh loop finished");
                return;
            }

            let outcome = self.tick().await;

            tokio::select! {
                _ = tokio::time::sleep(outcome.next_interval) => {}
                _ = self.stop_signal.notified() => {}
            }
        }
    }

    pub fn spawn(self: &Arc<Self>) -> JoinHandle<()> {
        let scheduler = self.clone();
        tokio::spawn(async move { scheduler.run().await })
    }
}
