//! # Lookup Broker Config
//!
//! Typed, layered configuration for the lookup broker.
//!
//! Configuration is assembled from defaults, an optional TOML or JSON file,
//! an optional `.env` file, the platform `PORT` variable and
//! `LOOKUP_BROKER__SECTION__KEY` environment overrides. Unknown fields in
//! files are rejected.
//!
//! ```toml
//! [server]
//! http_addr = "0.0.0.0:5000"
//! shutdown_timeout_secs = 30
//! request_timeout_ms = 30000
//! max_body_bytes = 1048576
//!
//! [broker]
//! supported_api_version = "2.14"
//! landscapes_env = "LANDSCAPES"
//!
//! [telemetry]
//! service_name = "lookup-broker"
//!
//! [telemetry.logging]
//! level = "info"
//! format = "json"
//!
//! [telemetry.metrics]
//! enabled = false
//! addr = "0.0.0.0:9090"
//! ```
//!
//! ## Example
//!
//! ```
//! use lookup_broker_config::ConfigLoader;
//!
//! let config = ConfigLoader::new()
//!     .with_string("[broker]\nsupported_api_version = \"2.15\"", "toml")
//!     .unwrap()
//!     .load()
//!     .unwrap();
//!
//! assert_eq!(config.broker.supported_api_version, "2.15");
//! assert_eq!(config.server.http_addr, "0.0.0.0:5000");
//! ```

#![doc(html_root_url = "https://docs.rs/lookup-broker-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::BrokerConfig;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{
    BrokerSection, LogFormat, LoggingSection, MetricsSection, ServerSection, TelemetrySection,
};
