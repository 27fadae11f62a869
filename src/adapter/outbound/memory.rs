//! In-memory store and country table.
//!
//! Useful for tests and for hosts that keep addresses elsewhere.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};

use crate::domain::{Address, AddressId, Country, CountryId, OwnerRef};
use crate::error::Result;
use crate::port::outbound::{AddressStore, CountryLookup, Trashed};

/// In-memory address store.
#[derive(Debug, Default)]
pub struct MemoryAddressStore {
    rows: RwLock<BTreeMap<AddressId, Address>>,
    next_id: Mutex<i64>,
}

impl MemoryAddressStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows, trashed included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }
}

impl AddressStore for MemoryAddressStore {
    async fn insert(&self, address: &Address) -> Result<AddressId> {
        let id = {
            let mut next = self.next_id.lock();
            *next += 1;
            AddressId::new(*next)
        };

        let now = Utc::now();
        let mut row = address.clone();
        row.id = Some(id);
        row.created_at = Some(now);
        row.updated_at = Some(now);
        row.deleted_at = None;
        self.rows.write().insert(id, row);

        Ok(id)
    }

    async fn update(&self, address: &Address) -> Result<bool> {
        let Some(id) = address.id else {
            return Ok(false);
        };

        let mut rows = self.rows.write();
        let Some(existing) = rows.get_mut(&id) else {
            return Ok(false);
        };

        let created_at = existing.created_at;
        let deleted_at = existing.deleted_at;
        *existing = address.clone();
        existing.created_at = created_at;
        existing.deleted_at = deleted_at;
        existing.updated_at = Some(Utc::now());
        Ok(true)
    }

    async fn find(&self, id: AddressId, scope: Trashed) -> Result<Option<Address>> {
        Ok(self
            .rows
            .read()
            .get(&id)
            .filter(|a| scope.admits(a.deleted_at.as_ref()))
            .cloned())
    }

    async fn list_for_owner(&self, owner: &OwnerRef, scope: Trashed) -> Result<Vec<Address>> {
        Ok(self
            .rows
            .read()
            .values()
            .filter(|a| a.owner.as_ref() == Some(owner))
            .filter(|a| scope.admits(a.deleted_at.as_ref()))
            .cloned()
            .collect())
    }

    async fn soft_delete(&self, id: AddressId, at: DateTime<Utc>) -> Result<bool> {
        let mut rows = self.rows.write();
        match rows.get_mut(&id) {
            Some(row) if row.deleted_at.is_none() => {
                row.deleted_at = Some(at);
                row.updated_at = Some(at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn restore(&self, id: AddressId) -> Result<bool> {
        let mut rows = self.rows.write();
        match rows.get_mut(&id) {
            Some(row) if row.deleted_at.is_some() => {
                row.deleted_at = None;
                row.updated_at = Some(Utc::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn force_delete(&self, id: AddressId) -> Result<bool> {
        Ok(self.rows.write().remove(&id).is_some())
    }
}

/// In-memory country table.
#[derive(Debug, Default)]
pub struct MemoryCountries {
    countries: RwLock<BTreeMap<CountryId, Country>>,
}

impl MemoryCountries {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a country.
    pub fn insert(&self, country: Country) {
        self.countries.write().insert(country.id, country);
    }
}

impl FromIterator<Country> for MemoryCountries {
    fn from_iter<I: IntoIterator<Item = Country>>(iter: I) -> Self {
        let countries = Self::new();
        for country in iter {
            countries.insert(country);
        }
        countries
    }
}

impl CountryLookup for MemoryCountries {
    async fn find(&self, id: CountryId) -> Result<Option<Country>> {
        Ok(self.countries.read().get(&id).cloned())
    }
}
