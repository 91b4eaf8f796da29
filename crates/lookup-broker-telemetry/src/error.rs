//! Telemetry error types.

use thiserror::Error;

/// Telemetry setup failures.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Failed to install the metrics recorder or exporter.
    #[error("metrics exporter: {0}")]
    MetricsInit(String),

    /// Failed to install the log subscriber.
    #[error("log subscriber: {0}")]
    LoggingInit(String),

    /// Invalid configuration.
    #[error("invalid telemetry setting: {0}")]
    InvalidConfig(String),

    /// Failed to parse an address.
    #[error("invalid exporter address: {0}")]
    InvalidAddress(String),
}
