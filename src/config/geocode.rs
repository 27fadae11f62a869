//! Geocoding provider configuration.

use serde::Deserialize;

use crate::domain::geocode::QueryEncoding;

/// Default Google geocoding endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://maps.google.com/maps/api/geocode/json";

/// Environment variable holding the provider API key.
pub const API_KEY_ENV: &str = "GEOCODE_API_KEY";

/// Geocoding configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeocodeConfig {
    /// Geocode every address on save.
    pub enabled: bool,
    /// Provider endpoint, without query string.
    pub endpoint: String,
    /// How the address query is escaped into the URL.
    pub encoding: QueryEncoding,
    /// Provider API key. Loaded from the environment, never from the file.
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: DEFAULT_ENDPOINT.into(),
            encoding: QueryEncoding::default(),
            api_key: None,
        }
    }
}
