//! Application layer: the address service and owner registry.

mod owners;
mod service;

pub use owners::OwnerRegistry;
pub use service::{AddressService, SaveReport};
