//! Port definitions (hexagonal architecture).
//!
//! Outbound ports describe what the address service needs from the outside
//! world: persistence, country reference data, owner lookup, and geocoding.

pub mod outbound;
