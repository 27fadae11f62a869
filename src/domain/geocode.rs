//! Geocoding value types.
//!
//! - [`GeocodeQuery`] - the comma-joined address text sent to the provider
//! - [`QueryEncoding`] - how that text is escaped into the request URL
//! - [`Coordinates`] - a latitude/longitude pair
//! - [`GeocodeOutcome`] - what a geocode stage did to a record

use serde::{Deserialize, Serialize};

/// How the query text is escaped into the request URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryEncoding {
    /// Replace spaces with `+` and leave everything else literal.
    #[default]
    Plus,
    /// Full `application/x-www-form-urlencoded` escaping.
    Percent,
}

/// Address text for a geocoding lookup.
///
/// # Examples
///
/// ```
/// use addresses::domain::geocode::{GeocodeQuery, QueryEncoding};
///
/// let query = GeocodeQuery::from_components([Some("1 Main St"), None, Some(""), Some("Springfield"), Some("USA")]);
/// assert_eq!(query.as_str(), "1 Main St,Springfield,USA");
/// assert_eq!(query.encode(QueryEncoding::Plus), "1+Main+St,Springfield,USA");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeQuery(String);

impl GeocodeQuery {
    /// Join the non-empty components with commas, in order.
    pub fn from_components<'a, I>(components: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let joined = components
            .into_iter()
            .flatten()
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join(",");
        Self(joined.trim().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Escape the query for use as the `address` URL parameter.
    #[must_use]
    pub fn encode(&self, encoding: QueryEncoding) -> String {
        match encoding {
            QueryEncoding::Plus => self.0.replace(' ', "+"),
            QueryEncoding::Percent => url::form_urlencoded::byte_serialize(self.0.as_bytes()).collect(),
        }
    }
}

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Result of a geocode stage.
///
/// Geocoding never fails a save; this records what happened instead.
#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeOutcome {
    /// Geocoding is turned off; no request was made.
    Disabled,
    /// The provider returned a location and the record was updated.
    Located(Coordinates),
    /// The provider had no result, or there was nothing to look up.
    NoMatch,
    /// The lookup failed; the record's coordinates were left untouched.
    Failed(String),
}

impl GeocodeOutcome {
    #[must_use]
    pub fn is_located(&self) -> bool {
        matches!(self, GeocodeOutcome::Located(_))
    }

    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            GeocodeOutcome::Located(c) => Some(*c),
            _ => None,
        }
    }
}
