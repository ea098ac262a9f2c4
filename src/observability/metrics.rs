use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Lazily initializes and returns the process-wide metrics.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE
        .get_or_init(|| async {
            info!("Initializing Metrics ...");
            Metrics::new()
        })
        .await
}

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Refresh metrics
    pub token_refresh: IntCounterVec,
    pub token_obtain_failures: IntCounterVec,
    pub token_obtain_duration: HistogramVec,

    // Cache metrics
    pub cached_tokens: IntGauge,
    pub token_local_expiry_ms: IntGaugeVec,

    // Scheduler metrics
    pub batches: IntCounterVec,
    pub refresh_interval_ms: IntGauge,

    // Config/runtime
    pub config_validation_errors: IntCounter,
    pub up: IntGauge,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("tokenmanager".into()), None)
            .expect("metrics namespace is valid");

        let metrics = Arc::new(Self {
            token_refresh: IntCounterVec::new(Opts::new("token_refresh_total", "Refresh attempts by token and outcome"), &["token", "outcome"]).expect("metric"),
            token_obtain_failures: IntCounterVec::new(Opts::new("token_obtain_failures_total", "Failed obtains by reason"), &["token", "reason"]).expect("metric"),
            token_obtain_duration: HistogramVec::new(HistogramOpts::new("token_obtain_duration_seconds", "Obtain request duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]), &["token"]).expect("metric"),

            cached_tokens: IntGauge::new("cached_tokens", "Tokens currently held in the cache").expect("metric"),
            token_local_expiry_ms: IntGaugeVec::new(Opts::new("token_local_expiry_ms", "Local expiry of the cached token, epoch millis"), &["token"]).expect("metric"),

            batches: IntCounterVec::new(Opts::new("batch_total", "Refresh batches by outcome"), &["outcome"]).expect("metric"),
            refresh_interval_ms: IntGauge::new("refresh_interval_ms", "Delay before the next refresh batch").expect("metric"),

            config_validation_errors: IntCounter::new("config_validation_errors_total", "Validation errors during startup").expect("metric"),
            up: IntGauge::new("up", "1 if service is healthy").expect("metric"),

            registry,
        });

        let reg = &metrics.registry;
        let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
            Box::new(metrics.token_refresh.clone()),
            Box::new(metrics.token_obtain_failures.clone()),
            Box::new(metrics.token_obtain_duration.clone()),
            Box::new(metrics.cached_tokens.clone()),
            Box::new(metrics.token_local_expiry_ms.clone()),
            Box::new(metrics.batches.clone()),
            Box::new(metrics.refresh_interval_ms.clone()),
            Box::new(metrics.config_validation_errors.clone()),
            Box::new(metrics.up.clone()),
        ];
        for collector in collectors {
            reg.register(collector).expect("metric names are unique");
        }

        metrics
    }
}
