//! Outbound adapters (driven side).

pub mod google;
pub mod memory;
pub mod sqlite;

pub use google::GoogleGeocoder;
pub use memory::{MemoryAddressStore, MemoryCountries};
pub use sqlite::{SqliteAddressStore, SqliteCountries};
