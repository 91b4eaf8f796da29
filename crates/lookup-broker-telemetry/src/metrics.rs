//! Prometheus metrics.
//!
//! | Metric | Type | Labels |
//! |--------|------|--------|
//! | `lookup_broker_requests_total` | Counter | `route`, `status` |
//! | `lookup_broker_request_duration_seconds` | Histogram | `route` |
//! | `lookup_broker_in_flight_requests` | Gauge | - |
//!
//! Recording is always safe: without an installed recorder the `metrics`
//! macros are no-ops. [`init_metrics`] installs the Prometheus exporter,
//! which serves `/metrics` on its own listener.

use crate::error::TelemetryError;
use crate::TelemetryResult;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;

/// Request counter name.
pub const REQUESTS_TOTAL: &str = "lookup_broker_requests_total";

/// Request latency histogram name.
pub const REQUEST_DURATION_SECONDS: &str = "lookup_broker_request_duration_seconds";

/// In-flight gauge name.
pub const IN_FLIGHT_REQUESTS: &str = "lookup_broker_in_flight_requests";

/// Metrics configuration.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Whether the exporter is installed.
    pub enabled: bool,

    /// Exporter listen address (e.g., "0.0.0.0:9090").
    pub addr: String,

    /// Service name for metric descriptions.
    pub service_name: String,

    /// Histogram buckets for request duration, in seconds.
    pub duration_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            addr: "0.0.0.0:9090".to_string(),
            service_name: "lookup-broker".to_string(),
            duration_buckets: vec![
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ],
        }
    }
}

/// Installs the Prometheus recorder and its HTTP listener.
///
/// Must be called from within a Tokio runtime. Does nothing when metrics
/// are disabled.
pub fn init_metrics(config: &MetricsConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let addr: SocketAddr = config
        .addr
        .parse()
        .map_err(|e| TelemetryError::InvalidAddress(format!("{}: {e}", config.addr)))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .set_buckets(&config.duration_buckets)
        .map_err(|e| TelemetryError::InvalidConfig(e.to_string()))?
        .install()
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;

    register_metric_descriptions(&config.service_name);
    tracing::info!(addr = %addr, "metrics exporter listening");

    Ok(())
}

fn register_metric_descriptions(service_name: &str) {
    describe_counter!(
        REQUESTS_TOTAL,
        format!("Total number of requests handled by {service_name}")
    );
    describe_histogram!(
        REQUEST_DURATION_SECONDS,
        metrics::Unit::Seconds,
        format!("Request duration of {service_name}")
    );
    describe_gauge!(
        IN_FLIGHT_REQUESTS,
        format!("Requests currently being processed by {service_name}")
    );
}

/// Records a completed request.
pub fn record_request(route: &str, status_code: u16, duration: Duration) {
    counter!(
        REQUESTS_TOTAL,
        "route" => route.to_string(),
        "status" => status_code.to_string()
    )
    .increment(1);

    histogram!(REQUEST_DURATION_SECONDS, "route" => route.to_string())
        .record(duration.as_secs_f64());
}

/// Keeps the in-flight gauge raised while alive.
#[derive(Debug)]
pub struct InFlightGuard {
    _private: (),
}

impl InFlightGuard {
    /// Increments the in-flight gauge.
    #[must_use]
    pub fn new() -> Self {
        gauge!(IN_FLIGHT_REQUESTS).increment(1.0);
        Self { _private: () }
    }
}

impl Default for InFlightGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        gauge!(IN_FLIGHT_REQUESTS).decrement(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_disabled() {
        let config = MetricsConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.addr, "0.0.0.0:9090");
        assert_eq!(config.duration_buckets.len(), 12);
    }

    #[test]
    fn test_disabled_init_is_noop() {
        assert!(init_metrics(&MetricsConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_address_rejected() {
        let config = MetricsConfig {
            enabled: true,
            addr: "not-an-address".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            init_metrics(&config),
            Err(TelemetryError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_recording_without_recorder() {
        record_request("/v2/catalog", 200, Duration::from_millis(3));
        let guard = InFlightGuard::new();
        drop(guard);
    }
}
