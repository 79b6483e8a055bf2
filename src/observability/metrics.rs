//! Metrics collection and exposition.
//!
//! # Metrics
//! - `iris_requests_total` (counter): invocations by surface and outcome
//! - `iris_request_duration_seconds` (histogram): end-to-end handling time
//! - `iris_upstream_status_total` (counter): upstream statuses relayed
//! - `iris_upstream_duration_seconds` (histogram): upstream GET latency
//!
//! Recording is a no-op until a recorder is installed.

use std::net::SocketAddr;
use std::time::Instant;

use axum::http::StatusCode;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::gate::Surface;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(surface: Surface, outcome: &'static str, start: Instant) {
    ::metrics::counter!("iris_requests_total", "surface" => surface.as_str(), "outcome" => outcome)
        .increment(1);
    ::metrics::histogram!("iris_request_duration_seconds", "surface" => surface.as_str())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_upstream(status: StatusCode, start: Instant) {
    ::metrics::counter!("iris_upstream_status_total", "status" => status.as_u16().to_string())
        .increment(1);
    ::metrics::histogram!("iris_upstream_duration_seconds").record(start.elapsed().as_secs_f64());
}
