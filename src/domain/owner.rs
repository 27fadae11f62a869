//! Polymorphic address owners.
//!
//! An address belongs to at most one owner, identified by a type tag plus an
//! id within that type (for example `("customer", 7)`). Nothing at this layer
//! checks that the owner exists; resolution happens lazily through
//! [`OwnerRegistry`](crate::app::OwnerRegistry).

use std::fmt;

use serde::{Deserialize, Serialize};

use super::id::OwnerId;

/// Reference to the entity an address belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerRef {
    pub owner_type: String,
    pub owner_id: OwnerId,
}

impl OwnerRef {
    pub fn new(owner_type: impl Into<String>, owner_id: i64) -> Self {
        Self {
            owner_type: owner_type.into(),
            owner_id: OwnerId::new(owner_id),
        }
    }
}

impl fmt::Display for OwnerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.owner_type, self.owner_id)
    }
}

/// A resolved owner entity.
///
/// Implemented by whatever entity types the host application attaches
/// addresses to.
pub trait Owner: fmt::Debug + Send + Sync {
    /// Type tag this entity is registered under.
    fn owner_type(&self) -> &str;

    fn owner_id(&self) -> OwnerId;

    /// Human-readable label, if the entity has one.
    fn label(&self) -> Option<String> {
        None
    }

    /// The reference an address would store to point at this owner.
    fn owner_ref(&self) -> OwnerRef {
        OwnerRef {
            owner_type: self.owner_type().to_string(),
            owner_id: self.owner_id(),
        }
    }
}
