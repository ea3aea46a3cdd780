//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings.
//! Configuration is loaded from a TOML file; the inference API key is read
//! from the `NODEFLEET_API_KEY` environment variable and never from disk.
//!
//! # Example
//!
//! ```no_run
//! use nodefleet::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging(0);
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::fleet::{FleetConfig, RuntimeConfig};
use super::inference::{InferenceConfig, API_KEY_ENV};
use super::installer::InstallerConfig;
use super::logging::LoggingConfig;
use crate::error::{ConfigError, Result};

/// Main application configuration.
///
/// Every section is optional; missing sections take their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging and tracing configuration.
    pub logging: LoggingConfig,

    /// Fleet layout and node container parameters.
    pub fleet: FleetConfig,

    /// Container runtime invocation.
    pub runtime: RuntimeConfig,

    /// Local inference service.
    pub inference: InferenceConfig,

    /// System dependencies.
    pub installer: InstallerConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.load_secrets();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is malformed, or fails
    /// validation.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load from `path`, or fall back to defaults when the file is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be loaded.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }
        debug!(path = %path.display(), "config file not found, using defaults");
        let mut config = Self::default();
        config.load_secrets();
        config.validate()?;
        Ok(config)
    }

    /// Initialize logging from the `[logging]` section.
    pub fn init_logging(&self, verbosity: u8) {
        self.logging.init(verbosity);
    }

    fn load_secrets(&mut self) {
        self.inference.api_key = std::env::var(API_KEY_ENV)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<()> {
        let fleet = &self.fleet;
        if fleet.image.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "fleet.image" }.into());
        }
        if fleet.network.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "fleet.network",
            }
            .into());
        }
        if fleet.models.iter().all(|m| m.trim().is_empty()) {
            return Err(ConfigError::MissingField {
                field: "fleet.models",
            }
            .into());
        }
        if !looks_like_cidr(&fleet.subnet) {
            return Err(ConfigError::InvalidValue {
                field: "fleet.subnet",
                reason: format!("'{}' is not an IPv4 CIDR range", fleet.subnet),
            }
            .into());
        }
        if fleet.upstream_port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "fleet.upstream_port",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if fleet.nodes_per_wallet == 0 {
            return Err(ConfigError::InvalidValue {
                field: "fleet.nodes_per_wallet",
                reason: "must be at least 1".to_string(),
            }
            .into());
        }

        if self.runtime.binary.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "runtime.binary",
            }
            .into());
        }
        if self.runtime.compose_command.is_empty() {
            return Err(ConfigError::MissingField {
                field: "runtime.compose_command",
            }
            .into());
        }

        let inference = &self.inference;
        if inference.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "inference.port",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if let Some(smoke_url) = &inference.smoke_url {
            url::Url::parse(smoke_url).map_err(|e| ConfigError::InvalidValue {
                field: "inference.smoke_url",
                reason: e.to_string(),
            })?;
        }

        if self.installer.package_manager.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "installer.package_manager",
            }
            .into());
        }

        Ok(())
    }
}

fn looks_like_cidr(value: &str) -> bool {
    let Some((addr, prefix)) = value.split_once('/') else {
        return false;
    };
    let prefix_ok = prefix.parse::<u8>().is_ok_and(|p| p <= 32);
    prefix_ok && addr.parse::<std::net::Ipv4Addr>().is_ok()
}
