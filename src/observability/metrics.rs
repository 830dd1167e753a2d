//! Metrics collection and exposition.
//!
//! # Metrics
//! - `storage_calls_total` (counter): service calls by operation, outcome
//! - `storage_call_duration_seconds` (histogram): service call latency
//! - `storage_http_requests_total` (counter): HTTP requests by method, status
//! - `storage_http_request_duration_seconds` (histogram): HTTP latency

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and serve it on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_call(operation: &'static str, outcome: &'static str, elapsed: Duration) {
    metrics::counter!("storage_calls_total", "operation" => operation, "outcome" => outcome)
        .increment(1);
    metrics::histogram!("storage_call_duration_seconds", "operation" => operation)
        .record(elapsed.as_secs_f64());
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "storage_http_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("storage_http_request_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}
