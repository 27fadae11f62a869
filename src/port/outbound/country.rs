//! Country lookup port.

use std::future::Future;

use crate::domain::{Country, CountryId};
use crate::error::Result;

/// Resolves `country_id` references.
pub trait CountryLookup: Send + Sync {
    /// Get a country by id. A missing country is `Ok(None)`, not an error.
    fn find(&self, id: CountryId) -> impl Future<Output = Result<Option<Country>>> + Send;
}
