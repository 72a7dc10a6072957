//! Prometheus metrics for the anchor processor.
//!
//! All metrics follow the naming convention: `aa_<component>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts,
    Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Transactions delivered to the handler
    pub static ref TRANSACTIONS_RECEIVED: IntCounter = IntCounter::new(
        "aa_processor_transactions_received_total",
        "Total transactions delivered to the anchor handler"
    ).expect("metric creation failed");

    /// Transactions that wrote state
    pub static ref TRANSACTIONS_ADMITTED: IntCounter = IntCounter::new(
        "aa_processor_transactions_admitted_total",
        "Total transactions admitted into ledger state"
    ).expect("metric creation failed");

    /// Rejections by kind
    pub static ref TRANSACTIONS_REJECTED: IntCounterVec = IntCounterVec::new(
        Opts::new("aa_processor_transactions_rejected_total", "Rejected transactions by kind"),
        &["kind"]  // malformed_payload, invalid_certificate, invalid_data, internal_state_error
    ).expect("metric creation failed");

    /// Ledger events handed to the host
    pub static ref EVENTS_EMITTED: IntCounter = IntCounter::new(
        "aa_processor_events_emitted_total",
        "Total ledger events emitted"
    ).expect("metric creation failed");

    /// Index updates by outcome
    pub static ref RECORDS_INDEXED: IntCounterVec = IntCounterVec::new(
        Opts::new("aa_indexing_records_total", "Index updates by outcome"),
        &["outcome"]  // created, confirmed, unknown
    ).expect("metric creation failed");

    /// Time spent in apply
    pub static ref APPLY_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "aa_processor_apply_duration_seconds",
            "Time spent applying a transaction"
        ).buckets(exponential_buckets(0.0001, 2.0, 14).expect("valid buckets"))
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry. Safe to call repeatedly.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(TRANSACTIONS_RECEIVED.clone()),
        Box::new(TRANSACTIONS_ADMITTED.clone()),
        Box::new(TRANSACTIONS_REJECTED.clone()),
        Box::new(EVENTS_EMITTED.clone()),
        Box::new(RECORDS_INDEXED.clone()),
        Box::new(APPLY_DURATION.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Render all metrics in the Prometheus text format.
pub fn gather_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}
