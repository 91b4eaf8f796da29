//! # Lookup Broker Telemetry
//!
//! Observability for the lookup broker:
//!
//! - **Logging**: structured `tracing` output, JSON or pretty
//! - **Metrics**: Prometheus request counters, latency histogram and
//!   in-flight gauge, exported on a separate listener when enabled
//!
//! # Example
//!
//! ```rust,ignore
//! use lookup_broker_telemetry::{init_telemetry, MetricsConfig, TelemetryConfig};
//!
//! let config = TelemetryConfig::new("lookup-broker", "0.1.0").with_metrics(MetricsConfig {
//!     enabled: true,
//!     ..MetricsConfig::default()
//! });
//! init_telemetry(&config)?;
//! ```

#![doc(html_root_url = "https://docs.rs/lookup-broker-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig};
pub use metrics::{init_metrics, record_request, InFlightGuard, MetricsConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Initializes logging, then metrics.
pub fn init_telemetry(config: &TelemetryConfig) -> TelemetryResult<()> {
    init_logging(&config.logging)?;
    init_metrics(&config.metrics)?;
    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        metrics = config.metrics.enabled,
        "telemetry initialised"
    );
    Ok(())
}
