//! Configuration schema types.
//!
//! Every section and field has a default, so an empty document is a valid
//! configuration. Unknown fields are rejected.

use std::sync::Arc;

use lookup_broker_core::landscape::DEFAULT_LANDSCAPES_ENV;
use lookup_broker_core::protocol::SUPPORTED_API_VERSION;
use lookup_broker_core::{EnvLandscapeSource, JsonLandscapeSource, LandscapeSource};
use serde::{Deserialize, Serialize};

/// HTTP server section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    /// Bind address, e.g. `0.0.0.0:5000`.
    #[serde(default = "default_http_addr")]
    pub http_addr: String,

    /// Graceful shutdown timeout in seconds.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,

    /// Request timeout in milliseconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    /// Largest accepted request body in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            http_addr: default_http_addr(),
            shutdown_timeout_secs: default_shutdown_timeout(),
            request_timeout_ms: default_request_timeout(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_http_addr() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_shutdown_timeout() -> u64 {
    30
}

fn default_request_timeout() -> u64 {
    30_000
}

fn default_max_body_bytes() -> usize {
    1024 * 1024
}

/// Broker protocol section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BrokerSection {
    /// OSB API version the broker speaks. Only the major part is enforced.
    #[serde(default = "default_api_version")]
    pub supported_api_version: String,

    /// Process variable holding the landscape directory, read per request.
    #[serde(default = "default_landscapes_env")]
    pub landscapes_env: String,

    /// Inline landscape directory. Takes precedence over `landscapes_env`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landscapes: Option<String>,
}

impl BrokerSection {
    /// Builds the landscape source this section describes.
    ///
    /// ```
    /// use lookup_broker_config::BrokerSection;
    ///
    /// let section = BrokerSection {
    ///     landscapes: Some("{}".to_string()),
    ///     ..BrokerSection::default()
    /// };
    /// assert!(section.landscape_source().get_all().is_empty());
    /// ```
    pub fn landscape_source(&self) -> Arc<dyn LandscapeSource> {
        match &self.landscapes {
            Some(json) => Arc::new(JsonLandscapeSource::new(json)),
            None => Arc::new(EnvLandscapeSource::new(&self.landscapes_env)),
        }
    }
}

impl Default for BrokerSection {
    fn default() -> Self {
        Self {
            supported_api_version: default_api_version(),
            landscapes_env: default_landscapes_env(),
            landscapes: None,
        }
    }
}

fn default_api_version() -> String {
    SUPPORTED_API_VERSION.to_string()
}

fn default_landscapes_env() -> String {
    DEFAULT_LANDSCAPES_ENV.to_string()
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON lines (production).
    #[default]
    Json,
    /// Human-readable output (development).
    Pretty,
}

/// Logging section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directive (e.g. `info`, `lookup_broker=debug`).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include source file and line.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            include_location: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Prometheus metrics section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    /// Install the exporter.
    #[serde(default)]
    pub enabled: bool,

    /// Exporter listen address.
    #[serde(default = "default_metrics_addr")]
    pub addr: String,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            enabled: false,
            addr: default_metrics_addr(),
        }
    }
}

fn default_metrics_addr() -> String {
    "0.0.0.0:9090".to_string()
}

/// Telemetry section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TelemetrySection {
    /// Service name attached to logs and metrics.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingSection,

    /// Metrics settings.
    #[serde(default)]
    pub metrics: MetricsSection,
}

impl Default for TelemetrySection {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            logging: LoggingSection::default(),
            metrics: MetricsSection::default(),
        }
    }
}

fn default_service_name() -> String {
    "lookup-broker".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookup_broker_core::fixtures;

    #[test]
    fn test_server_defaults() {
        let server = ServerSection::default();
        assert_eq!(server.http_addr, "0.0.0.0:5000");
        assert_eq!(server.shutdown_timeout_secs, 30);
        assert_eq!(server.request_timeout_ms, 30_000);
        assert_eq!(server.max_body_bytes, 1_048_576);
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let logging: LoggingSection = toml::from_str(r#"level = "debug""#).unwrap();
        assert_eq!(logging.level, "debug");
        assert!(logging.enabled);
        assert_eq!(logging.format, LogFormat::Json);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<MetricsSection, _> = toml::from_str(r#"port = 9090"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_log_format_lowercase() {
        let logging: LoggingSection = toml::from_str(r#"format = "pretty""#).unwrap();
        assert_eq!(logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_inline_landscapes_win() {
        let section = BrokerSection {
            landscapes_env: "LOOKUP_BROKER_TEST_UNUSED_LANDSCAPES".to_string(),
            landscapes: Some(fixtures::LANDSCAPES_JSON.to_string()),
            ..BrokerSection::default()
        };
        assert_eq!(section.landscape_source().get_all().len(), 3);
    }

    #[test]
    fn test_env_landscapes_by_default() {
        let section = BrokerSection {
            landscapes_env: "LOOKUP_BROKER_TEST_SCHEMA_LANDSCAPES".to_string(),
            ..BrokerSection::default()
        };
        std::env::set_var("LOOKUP_BROKER_TEST_SCHEMA_LANDSCAPES", fixtures::LANDSCAPES_JSON);
        let count = section.landscape_source().get_all().len();
        std::env::remove_var("LOOKUP_BROKER_TEST_SCHEMA_LANDSCAPES");
        assert_eq!(count, 3);
    }
}
