//! Metrics collection and Prometheus export.
//!
//! Initializes the metrics exporter and provides the /metrics endpoint handler.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Duration;

/// Global handle to the Prometheus recorder.
pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize the metrics recorder.
///
/// This must be called once at startup before any metrics are recorded.
/// Panics if called more than once.
pub fn init_metrics() {
    let builder = PrometheusBuilder::new();
    let handle = builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    if METRICS_HANDLE.set(handle).is_err() {
        panic!("failed to set metrics handle: already initialized");
    }
}

/// Get the current metrics in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized".to_string())
}

pub fn record_fetch(collection: &str, outcome: &'static str, elapsed: Duration) {
    let collection = collection.to_string();
    counter!(
        "document_store_fetches_total",
        "collection" => collection.clone(),
        "outcome" => outcome
    )
    .increment(1);
    histogram!("document_store_fetch_duration_seconds", "collection" => collection)
        .record(elapsed.as_secs_f64());
}

pub fn record_enrichment(outcome: &'static str) {
    counter!("author_enrichment_total", "outcome" => outcome).increment(1);
}
