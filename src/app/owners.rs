//! Registry of owner resolvers keyed by owner type.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::{Owner, OwnerId, OwnerRef};
use crate::error::Result;
use crate::port::outbound::OwnerResolver;

/// Maps owner type tags to the resolvers that load them.
///
/// Owners are resolved lazily, only when [`resolve`](Self::resolve) is
/// called. An unregistered type resolves to `None`.
#[derive(Default, Clone)]
pub struct OwnerRegistry {
    resolvers: HashMap<String, Arc<dyn OwnerResolver>>,
}

impl OwnerRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the resolver for one owner type, replacing any previous one.
    pub fn register<R: OwnerResolver + 'static>(&mut self, owner_type: impl Into<String>, resolver: R) {
        self.resolvers.insert(owner_type.into(), Arc::new(resolver));
    }

    /// Register a synchronous lookup function for one owner type.
    pub fn register_fn<F>(&mut self, owner_type: impl Into<String>, lookup: F)
    where
        F: Fn(OwnerId) -> Option<Arc<dyn Owner>> + Send + Sync + 'static,
    {
        self.register(owner_type, FnResolver(lookup));
    }

    #[must_use]
    pub fn contains(&self, owner_type: &str) -> bool {
        self.resolvers.contains_key(owner_type)
    }

    /// Registered owner types, sorted.
    #[must_use]
    pub fn owner_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.resolvers.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    /// Load the entity an owner reference points at.
    ///
    /// # Errors
    ///
    /// Propagates resolver failures. Unknown types and missing entities
    /// are `Ok(None)`.
    pub async fn resolve(&self, owner: &OwnerRef) -> Result<Option<Arc<dyn Owner>>> {
        let Some(resolver) = self.resolvers.get(&owner.owner_type) else {
            warn!(owner = %owner, "No resolver registered for owner type");
            return Ok(None);
        };
        resolver.resolve(owner.owner_id).await
    }
}

impl fmt::Debug for OwnerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnerRegistry")
            .field("owner_types", &self.owner_types())
            .finish()
    }
}

struct FnResolver<F>(F);

#[async_trait]
impl<F> OwnerResolver for FnResolver<F>
where
    F: Fn(OwnerId) -> Option<Arc<dyn Owner>> + Send + Sync + 'static,
{
    async fn resolve(&self, id: OwnerId) -> Result<Option<Arc<dyn Owner>>> {
        Ok((self.0)(id))
    }
}
