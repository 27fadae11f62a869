//! Storage-agnostic address types.
//!
//! - [`address`] - the record, mass assignment, attribute maps
//! - [`format`] - array / HTML / line rendering
//! - [`validation`] - rule sets and validation errors
//! - [`geocode`] - query text, coordinates, outcomes
//! - [`owner`] - polymorphic owner references
//! - [`country`] - country reference data
//! - [`id`] - identifier newtypes

pub mod address;
pub mod country;
pub mod format;
pub mod geocode;
pub mod id;
pub mod owner;
pub mod validation;

pub use address::Address;
pub use country::Country;
pub use geocode::{Coordinates, GeocodeOutcome, GeocodeQuery, QueryEncoding};
pub use id::{AddressId, CountryId, OwnerId};
pub use owner::{Owner, OwnerRef};
pub use validation::{validation_rules, Rule, ValidationErrors, ValidationRules, Violation};
