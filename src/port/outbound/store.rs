//! Persistence port for addresses.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::domain::{Address, AddressId, OwnerRef};
use crate::error::Result;

/// Which soft-deleted rows a query sees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Trashed {
    /// Live rows only.
    #[default]
    Exclude,
    /// Live and soft-deleted rows.
    Include,
    /// Soft-deleted rows only.
    Only,
}

impl Trashed {
    /// Whether a row with this `deleted_at` is visible under the scope.
    #[must_use]
    pub fn admits(self, deleted_at: Option<&DateTime<Utc>>) -> bool {
        match self {
            Trashed::Exclude => deleted_at.is_none(),
            Trashed::Include => true,
            Trashed::Only => deleted_at.is_some(),
        }
    }
}

/// Storage operations for addresses.
///
/// # Implementation Notes
///
/// - `insert` assigns the id, stamps `created_at`/`updated_at`, and ignores
///   `deleted_at`: new rows are always live
/// - `update` stamps `updated_at` and overwrites every column except
///   `created_at` and `deleted_at`
/// - `soft_delete` only sets `deleted_at`; the row stays until `force_delete`
pub trait AddressStore: Send + Sync {
    /// Insert a new address and return its assigned id.
    fn insert(&self, address: &Address) -> impl Future<Output = Result<AddressId>> + Send;

    /// Overwrite a stored address. Returns false if no row has its id.
    fn update(&self, address: &Address) -> impl Future<Output = Result<bool>> + Send;

    /// Get an address by id, within the given trash scope.
    fn find(
        &self,
        id: AddressId,
        scope: Trashed,
    ) -> impl Future<Output = Result<Option<Address>>> + Send;

    /// All addresses of one owner, ordered by id.
    fn list_for_owner(
        &self,
        owner: &OwnerRef,
        scope: Trashed,
    ) -> impl Future<Output = Result<Vec<Address>>> + Send;

    /// Mark an address deleted. Returns false if it is missing or already trashed.
    fn soft_delete(
        &self,
        id: AddressId,
        at: DateTime<Utc>,
    ) -> impl Future<Output = Result<bool>> + Send;

    /// Clear the deleted marker. Returns false if it is missing or not trashed.
    fn restore(&self, id: AddressId) -> impl Future<Output = Result<bool>> + Send;

    /// Remove the row permanently, trashed or not. Returns true if it existed.
    fn force_delete(&self, id: AddressId) -> impl Future<Output = Result<bool>> + Send;
}
