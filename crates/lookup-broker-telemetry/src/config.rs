//! Telemetry configuration.

use crate::logging::LogConfig;
use crate::metrics::MetricsConfig;

/// Logging and metrics settings for one service.
///
/// The service name is shared: [`with_metrics`](Self::with_metrics) copies
/// it into the metric descriptions.
///
/// ```
/// use lookup_broker_telemetry::{LogConfig, MetricsConfig, TelemetryConfig};
///
/// let config = TelemetryConfig::new("lookup-eu10", "1.2.3")
///     .with_logging(LogConfig::development())
///     .with_metrics(MetricsConfig::default());
///
/// assert_eq!(config.metrics.service_name, "lookup-eu10");
/// assert!(!config.logging.json_format);
/// ```
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name.
    pub service_name: String,

    /// Service version, logged once telemetry is up.
    pub service_version: String,

    /// Metrics settings.
    pub metrics: MetricsConfig,

    /// Logging settings.
    pub logging: LogConfig,
}

impl TelemetryConfig {
    /// Production logging, metrics disabled.
    #[must_use]
    pub fn new(service_name: impl Into<String>, service_version: impl Into<String>) -> Self {
        let service_name = service_name.into();
        Self {
            metrics: MetricsConfig {
                service_name: service_name.clone(),
                ..MetricsConfig::default()
            },
            logging: LogConfig::production(),
            service_name,
            service_version: service_version.into(),
        }
    }

    /// Replaces the logging settings.
    #[must_use]
    pub fn with_logging(mut self, logging: LogConfig) -> Self {
        self.logging = logging;
        self
    }

    /// Replaces the metrics settings, keeping this config's service name.
    #[must_use]
    pub fn with_metrics(mut self, metrics: MetricsConfig) -> Self {
        self.metrics = MetricsConfig {
            service_name: self.service_name.clone(),
            ..metrics
        };
        self
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self::new("lookup-broker", env!("CARGO_PKG_VERSION"))
    }
}
