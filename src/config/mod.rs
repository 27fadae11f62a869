//! Configuration loading and validation.
//!
//! Configuration is loaded from a TOML file. The geocoding API key is read
//! from the `GEOCODE_API_KEY` environment variable, never from the file.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::{ConfigError, Result};

mod geocode;
mod logging;

pub use geocode::{GeocodeConfig, API_KEY_ENV, DEFAULT_ENDPOINT};
pub use logging::LoggingConfig;

/// Address model settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AddressConfig {
    /// Boolean flag names. Each becomes an `is_<name>` attribute.
    pub flags: Vec<String>,
}

impl Default for AddressConfig {
    fn default() -> Self {
        Self {
            flags: vec!["primary".into(), "billing".into(), "shipping".into()],
        }
    }
}

/// Database settings for the SQLite adapter.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "addresses.db".into(),
        }
    }
}

/// Main configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub geocode: GeocodeConfig,
    #[serde(default)]
    pub addresses: AddressConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl Config {
    /// Load from a TOML file, then pick up the API key from the environment
    /// (or a `.env` file in the working directory).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let _ = dotenvy::dotenv();

        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let mut config = Self::parse(&content)?;

        config.geocode.api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());

        Ok(config)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.geocode.enabled {
            if self.geocode.endpoint.trim().is_empty() {
                return Err(ConfigError::MissingField { field: "endpoint" }.into());
            }
            url::Url::parse(&self.geocode.endpoint).map_err(|e| ConfigError::InvalidValue {
                field: "endpoint",
                reason: e.to_string(),
            })?;
        }

        let mut seen = HashSet::new();
        for flag in &self.addresses.flags {
            let well_formed = !flag.is_empty()
                && flag
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
            if !well_formed {
                return Err(ConfigError::InvalidValue {
                    field: "flags",
                    reason: format!("'{flag}' must be lowercase letters, digits or '_'"),
                }
                .into());
            }
            if !seen.insert(flag.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: "flags",
                    reason: format!("'{flag}' is listed more than once"),
                }
                .into());
            }
        }

        if self.database.url.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "url" }.into());
        }

        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
