//! Owner resolution port.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Owner, OwnerId};
use crate::error::Result;

/// Loads owner entities of one type.
///
/// The host application registers one resolver per owner type tag with
/// [`OwnerRegistry`](crate::app::OwnerRegistry).
#[async_trait]
pub trait OwnerResolver: Send + Sync {
    /// Load the owner with this id, or `Ok(None)` if it does not exist.
    async fn resolve(&self, id: OwnerId) -> Result<Option<Arc<dyn Owner>>>;
}
