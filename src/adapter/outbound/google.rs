//! Google Maps geocoding client.
//!
//! Provides an implementation of the [`Geocoder`] trait for the Google
//! geocoding JSON API. One GET per lookup; no retries, no caching.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::GeocodeConfig;
use crate::domain::{Coordinates, GeocodeQuery, QueryEncoding};
use crate::error::{Error, Result};
use crate::port::outbound::Geocoder;

/// Google geocoding API client.
#[derive(Debug, Clone)]
pub struct GoogleGeocoder {
    /// HTTP client for API requests.
    client: Client,
    /// Endpoint URL without query string.
    endpoint: String,
    /// Escaping applied to the address parameter.
    encoding: QueryEncoding,
    /// Optional API key, sent as `key`.
    api_key: Option<String>,
}

impl GoogleGeocoder {
    /// Create a client with explicit settings.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, encoding: QueryEncoding) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            encoding,
            api_key: None,
        }
    }

    /// Create a client from geocoding configuration.
    #[must_use]
    pub fn from_config(config: &GeocodeConfig) -> Self {
        let mut geocoder = Self::new(config.endpoint.clone(), config.encoding);
        geocoder.api_key = config.api_key.clone();
        geocoder
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Full request URL for a query.
    #[must_use]
    pub fn request_url(&self, query: &GeocodeQuery) -> String {
        let mut url = format!(
            "{}?address={}&sensor=false",
            self.endpoint,
            query.encode(self.encoding)
        );
        if let Some(key) = &self.api_key {
            url.push_str("&key=");
            url.push_str(&url::form_urlencoded::byte_serialize(key.as_bytes()).collect::<String>());
        }
        url
    }
}

#[derive(Deserialize)]
struct Response {
    results: Vec<ResultEntry>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct ResultEntry {
    geometry: Geometry,
}

#[derive(Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}

/// Statuses that mean "answered, nothing found" rather than a failure.
const NO_MATCH_STATUSES: [&str; 2] = ["OK", "ZERO_RESULTS"];

/// Extract the first result's location from a response body.
fn parse_response(body: &str) -> Result<Option<Coordinates>> {
    if body.trim().is_empty() {
        return Err(Error::Geocode("empty response body".into()));
    }

    let response: Response = serde_json::from_str(body)?;

    if let Some(first) = response.results.into_iter().next() {
        let location = first.geometry.location;
        return Ok(Some(Coordinates::new(location.lat, location.lng)));
    }

    match response.status {
        Some(status) if !NO_MATCH_STATUSES.contains(&status.as_str()) => {
            let detail = response.error_message.unwrap_or_default();
            Err(Error::Geocode(format!("{status} {detail}").trim_end().to_string()))
        }
        _ => Ok(None),
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn locate(&self, query: &GeocodeQuery) -> Result<Option<Coordinates>> {
        let url = self.request_url(query);
        debug!(query = %query.as_str(), "Sending geocode request");

        let body = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_response(&body)
    }
}


/// Tests against the live Google API.
/// Run with: `GEOCODE_API_KEY=... cargo test --features integration-tests -- --ignored`
#[cfg(all(test, feature = "integration-tests"))]
mod integration_tests {
    use super::*;
    use std::time::Duration;

    fn live_client() -> Option<GoogleGeocoder> {
        match std::env::var(crate::config::API_KEY_ENV) {
            Ok(key) if !key.is_empty() => Some(
                GoogleGeocoder::new(crate::config::DEFAULT_ENDPOINT, QueryEncoding::Plus)
                    .with_api_key(key),
            ),
            _ => {
                eprintln!("Skipping Google integration test: no API key");
                None
            }
        }
    }

    #[tokio::test]
    #[ignore = "requires GEOCODE_API_KEY and network access"]
    async fn locates_known_address() {
        let Some(geocoder) = live_client() else {
            return;
        };
        let query = GeocodeQuery::from_components([
            Some("221B Baker St"),
            Some("London"),
            Some("NW16XE"),
            Some("UK"),
        ]);

        let found = tokio::time::timeout(Duration::from_secs(30), geocoder.locate(&query))
            .await
            .expect("Request timed out")
            .expect("API call failed")
            .expect("No match for a known address");

        assert!((found.lat - 51.52).abs() < 0.05, "lat {}", found.lat);
        assert!((found.lng + 0.16).abs() < 0.05, "lng {}", found.lng);
    }
}
