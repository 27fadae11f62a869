//! Geocoding port.
//!
//! Turns address text into coordinates through an external provider.

use async_trait::async_trait;

use crate::domain::{Coordinates, GeocodeQuery};
use crate::error::Result;

/// Client for a geocoding provider.
///
/// # Errors
///
/// [`locate`](Self::locate) returns an error for transport failures or
/// unreadable responses. Callers on the save path absorb these; see
/// [`AddressService::geocode`](crate::app::AddressService::geocode).
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Return the provider name for logging.
    fn name(&self) -> &'static str;

    /// Look up the first match for a query.
    ///
    /// Returns `Ok(None)` when the provider answered but found nothing.
    async fn locate(&self, query: &GeocodeQuery) -> Result<Option<Coordinates>>;
}
