//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by outcome, status
//! - `gateway_request_duration_seconds` (histogram): latency by outcome
//! - `gateway_cache_lookups_total` (counter): cache lookups by result
//! - `gateway_cache_entries` (gauge): cached responses
//! - `gateway_cache_evictions_total` (counter): LRU evictions
//! - `gateway_upstream_fetches_total` (counter): fetches by result
//! - `gateway_upstream_fetch_duration_seconds` (histogram)
//! - `gateway_single_flight_joins_total` (counter): requests that joined a running fetch
//!
//! Recording is a no-op until a recorder is installed, so the core can be
//! used and tested without an exporter.

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Duration;

/// Install the Prometheus recorder and serve it on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_request(outcome: &'static str, status: u16, elapsed: Duration) {
    counter!(
        "gateway_requests_total",
        "outcome" => outcome,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("gateway_request_duration_seconds", "outcome" => outcome)
        .record(elapsed.as_secs_f64());
}

pub fn record_cache_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    counter!("gateway_cache_lookups_total", "result" => result).increment(1);
}

pub fn record_cache_size(entries: usize) {
    gauge!("gateway_cache_entries").set(entries as f64);
}

pub fn record_cache_eviction() {
    counter!("gateway_cache_evictions_total").increment(1);
}

pub fn record_upstream_fetch(result: &'static str, elapsed: Duration) {
    counter!("gateway_upstream_fetches_total", "result" => result).increment(1);
    histogram!("gateway_upstream_fetch_duration_seconds").record(elapsed.as_secs_f64());
}

pub fn record_joined_flight() {
    counter!("gateway_single_flight_joins_total").increment(1);
}
