//! Layered configuration loading.
//!
//! Layers apply in call order, later layers overriding earlier ones:
//!
//! 1. Defaults
//! 2. A TOML or JSON file (format chosen by extension)
//! 3. A `.env` file, which only populates the process environment
//! 4. The platform `PORT` variable
//! 5. `PREFIX__SECTION__KEY` variables
//!
//! Environment layers are read when [`ConfigLoader::load`] runs.

use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::schema::LogFormat;
use crate::{BrokerConfig, ConfigError};

/// Configuration loader.
///
/// # Example
///
/// ```no_run
/// use lookup_broker_config::ConfigLoader;
///
/// # fn main() -> Result<(), lookup_broker_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_defaults()
///     .with_optional_file("lookup-broker.toml")?
///     .with_dotenv()?
///     .with_port_env("PORT")
///     .with_env_prefix("LOOKUP_BROKER")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config: BrokerConfig,
    port_env: Option<String>,
    env_prefix: Option<String>,
}

impl ConfigLoader {
    /// Creates a loader starting from defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets to the default configuration.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = BrokerConfig::default();
        self
    }

    /// Resets to the development preset.
    ///
    /// ```
    /// use lookup_broker_config::{ConfigLoader, LogFormat};
    ///
    /// let config = ConfigLoader::new().with_development().load().unwrap();
    /// assert_eq!(config.telemetry.logging.format, LogFormat::Pretty);
    /// ```
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = BrokerConfig::development();
        self
    }

    /// Loads a TOML (`.toml`) or JSON (`.json`) file.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;

        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.display().to_string()))?;

        self.config = parse(&content, format)?;
        Ok(self)
    }

    /// Loads a file if it exists.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Loads configuration from a string in the given format (`toml` or `json`).
    ///
    /// ```
    /// use lookup_broker_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string("[server]\nhttp_addr = \"127.0.0.1:3000\"", "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.server.http_addr, "127.0.0.1:3000");
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = parse(content, format)?;
        Ok(self)
    }

    /// Loads `.env` from the working directory, if present.
    ///
    /// Variables already set in the environment are not overwritten.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if e.not_found() => Ok(self),
            Err(e) => Err(ConfigError::DotenvError(e.to_string())),
        }
    }

    /// Loads a specific `.env` file.
    pub fn with_dotenv_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        dotenvy::from_path(path.as_ref())
            .map_err(|e| ConfigError::DotenvError(e.to_string()))?;
        Ok(self)
    }

    /// Reads a bare port number from `var` and applies it to
    /// `server.http_addr`.
    #[must_use]
    pub fn with_port_env(mut self, var: &str) -> Self {
        self.port_env = Some(var.to_string());
        self
    }

    /// Enables `PREFIX__SECTION__KEY` overrides, e.g.
    /// `LOOKUP_BROKER__SERVER__HTTP_ADDR=0.0.0.0:8080`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Applies environment overrides and validates.
    pub fn load(self) -> Result<BrokerConfig, ConfigError> {
        let config = self.load_unvalidated()?;
        config.validate()?;
        Ok(config)
    }

    /// Applies environment overrides without validating.
    pub fn load_unvalidated(mut self) -> Result<BrokerConfig, ConfigError> {
        if let Some(var) = self.port_env.take() {
            if let Ok(value) = env::var(&var) {
                self.apply_port(&var, &value)?;
            }
        }

        if let Some(prefix) = self.env_prefix.take() {
            let mut vars: Vec<(String, String)> = env::vars()
                .filter(|(key, _)| key.starts_with(&format!("{prefix}__")))
                .collect();
            vars.sort();

            for (key, value) in vars {
                self.apply_env_var(&key, &value, &prefix)?;
            }
        }

        Ok(self.config)
    }

    fn apply_port(&mut self, var: &str, value: &str) -> Result<(), ConfigError> {
        let port: u16 = value
            .trim()
            .parse()
            .map_err(|_| ConfigError::env_parse_error(var, "expected port number"))?;

        let addr = &self.config.server.http_addr;
        let host = addr.rsplit_once(':').map_or(addr.as_str(), |(host, _)| host);
        self.config.server.http_addr = format!("{host}:{port}");
        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let Some(path) = key
            .strip_prefix(prefix)
            .and_then(|k| k.strip_prefix("__"))
        else {
            return Ok(());
        };

        let parts: Vec<&str> = path.split("__").collect();
        let config = &mut self.config;

        match parts.as_slice() {
            ["SERVER", "HTTP_ADDR"] => config.server.http_addr = value.to_string(),
            ["SERVER", "SHUTDOWN_TIMEOUT_SECS"] => {
                config.server.shutdown_timeout_secs = parse_number(key, value)?;
            }
            ["SERVER", "REQUEST_TIMEOUT_MS"] => {
                config.server.request_timeout_ms = parse_number(key, value)?;
            }
            ["SERVER", "MAX_BODY_BYTES"] => {
                config.server.max_body_bytes = parse_number(key, value)?;
            }

            ["BROKER", "SUPPORTED_API_VERSION"] => {
                config.broker.supported_api_version = value.to_string();
            }
            ["BROKER", "LANDSCAPES_ENV"] => config.broker.landscapes_env = value.to_string(),
            ["BROKER", "LANDSCAPES"] => {
                config.broker.landscapes = (!value.is_empty()).then(|| value.to_string());
            }

            ["TELEMETRY", "SERVICE_NAME"] => config.telemetry.service_name = value.to_string(),
            ["TELEMETRY", "LOGGING", "ENABLED"] => {
                config.telemetry.logging.enabled = parse_bool(key, value)?;
            }
            ["TELEMETRY", "LOGGING", "LEVEL"] => {
                config.telemetry.logging.level = value.to_string();
            }
            ["TELEMETRY", "LOGGING", "FORMAT"] => {
                config.telemetry.logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    _ => {
                        return Err(ConfigError::env_parse_error(
                            key,
                            "expected 'json' or 'pretty'",
                        ))
                    }
                };
            }
            ["TELEMETRY", "LOGGING", "INCLUDE_LOCATION"] => {
                config.telemetry.logging.include_location = parse_bool(key, value)?;
            }
            ["TELEMETRY", "METRICS", "ENABLED"] => {
                config.telemetry.metrics.enabled = parse_bool(key, value)?;
            }
            ["TELEMETRY", "METRICS", "ADDR"] => config.telemetry.metrics.addr = value.to_string(),

            // Unknown keys are ignored.
            _ => {}
        }

        Ok(())
    }
}

fn parse(content: &str, format: &str) -> Result<BrokerConfig, ConfigError> {
    match format.to_lowercase().as_str() {
        "toml" => Ok(toml::from_str(content)?),
        "json" => Ok(serde_json::from_str(content)?),
        _ => Err(ConfigError::UnsupportedFormat(format.to_string())),
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::env_parse_error(key, "expected integer"))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::env_parse_error(key, "expected boolean")),
    }
}
