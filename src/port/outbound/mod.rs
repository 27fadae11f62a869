//! Outbound ports (driven side): interfaces implemented by outbound adapters.

pub mod country;
pub mod geocoder;
pub mod owner;
pub mod store;

pub use country::CountryLookup;
pub use geocoder::Geocoder;
pub use owner::OwnerResolver;
pub use store::{AddressStore, Trashed};
