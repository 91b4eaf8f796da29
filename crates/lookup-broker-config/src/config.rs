//! The root configuration type.

use std::net::SocketAddr;
use std::time::Duration;

use lookup_broker_core::protocol::major_version;
use lookup_broker_telemetry::{LogConfig, MetricsConfig, TelemetryConfig};
use serde::{Deserialize, Serialize};

use crate::schema::{BrokerSection, LogFormat, ServerSection, TelemetrySection};
use crate::ConfigError;

/// Complete broker configuration.
///
/// # Example
///
/// ```
/// use lookup_broker_config::BrokerConfig;
///
/// let config = BrokerConfig::default();
/// assert_eq!(config.server.http_addr, "0.0.0.0:5000");
/// assert_eq!(config.broker.supported_api_version, "2.14");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BrokerConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerSection,

    /// Protocol and landscape settings.
    #[serde(default)]
    pub broker: BrokerSection,

    /// Logging and metrics settings.
    #[serde(default)]
    pub telemetry: TelemetrySection,
}

impl BrokerConfig {
    /// Local development preset: pretty debug logs on localhost.
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.server.http_addr = "127.0.0.1:5000".to_string();
        config.telemetry.logging.level = "debug".to_string();
        config.telemetry.logging.format = LogFormat::Pretty;
        config.telemetry.logging.include_location = true;
        config
    }

    /// Checks values serde cannot check.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.http_addr.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::invalid_value(
                "server.http_addr",
                format!("invalid socket address: {}", self.server.http_addr),
            ));
        }

        if self.server.request_timeout_ms == 0 {
            return Err(ConfigError::invalid_value(
                "server.request_timeout_ms",
                "must be greater than zero",
            ));
        }

        if self.server.max_body_bytes == 0 {
            return Err(ConfigError::invalid_value(
                "server.max_body_bytes",
                "must be greater than zero",
            ));
        }

        let major = major_version(&self.broker.supported_api_version);
        if major.is_empty() || !major.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ConfigError::invalid_value(
                "broker.supported_api_version",
                format!(
                    "major version must be numeric: {}",
                    self.broker.supported_api_version
                ),
            ));
        }

        if self.telemetry.metrics.enabled
            && self.telemetry.metrics.addr.parse::<SocketAddr>().is_err()
        {
            return Err(ConfigError::invalid_value(
                "telemetry.metrics.addr",
                format!("invalid socket address: {}", self.telemetry.metrics.addr),
            ));
        }

        Ok(())
    }

    /// Graceful shutdown timeout.
    #[must_use]
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.server.shutdown_timeout_secs)
    }

    /// Request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.server.request_timeout_ms)
    }

    /// Telemetry settings for `lookup-broker-telemetry`.
    #[must_use]
    pub fn telemetry_config(&self, service_version: &str) -> TelemetryConfig {
        let logging = &self.telemetry.logging;
        let metrics = &self.telemetry.metrics;

        TelemetryConfig::new(&self.telemetry.service_name, service_version)
            .with_logging(LogConfig {
                enabled: logging.enabled,
                level: logging.level.clone(),
                json_format: logging.format == LogFormat::Json,
                file_line_info: logging.include_location,
                ..LogConfig::production()
            })
            .with_metrics(MetricsConfig {
                enabled: metrics.enabled,
                addr: metrics.addr.clone(),
                ..MetricsConfig::default()
            })
    }
}
