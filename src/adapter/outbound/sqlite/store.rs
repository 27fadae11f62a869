//! SQLite address store and country lookup.
//!
//! Provides persistent storage for addresses using SQLite and Diesel ORM.
//! Timestamps are RFC 3339 text; flags are a JSON object.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use tracing::debug;

use super::connection::{checkout, DbPool};
use super::model::{AddressChangeset, AddressRow, CountryRow, LastInsertRowId, NewAddressRow};
use super::schema::{addresses, countries};
use crate::domain::{Address, AddressId, Country, CountryId, OwnerId, OwnerRef};
use crate::error::{Error, Result};
use crate::port::outbound::{AddressStore, CountryLookup, Trashed};

/// SQLite-backed address store.
pub struct SqliteAddressStore {
    /// Database connection pool.
    pool: DbPool,
}

impl SqliteAddressStore {
    /// Create a new SQLite address store with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn new_row(address: &Address, now: DateTime<Utc>) -> Result<NewAddressRow> {
        let now = now.to_rfc3339();
        Ok(NewAddressRow {
            line_1: address.line_1.clone(),
            line_2: address.line_2.clone(),
            line_3: address.line_3.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            post_code: address.post_code.clone(),
            country_id: address.country_id.map(CountryId::get),
            lat: address.lat,
            lng: address.lng,
            addressable_type: address.owner.as_ref().map(|o| o.owner_type.clone()),
            addressable_id: address.owner.as_ref().map(|o| o.owner_id.get()),
            flags: serde_json::to_string(&address.flags)?,
            created_at: now.clone(),
            updated_at: now,
            // Inserted rows start live.
            deleted_at: None,
        })
    }

    fn changeset(address: &Address, now: DateTime<Utc>) -> Result<AddressChangeset> {
        let row = Self::new_row(address, now)?;
        Ok(AddressChangeset {
            line_1: row.line_1,
            line_2: row.line_2,
            line_3: row.line_3,
            city: row.city,
            state: row.state,
            post_code: row.post_code,
            country_id: row.country_id,
            lat: row.lat,
            lng: row.lng,
            addressable_type: row.addressable_type,
            addressable_id: row.addressable_id,
            flags: row.flags,
            updated_at: row.updated_at,
        })
    }

    fn from_row(row: AddressRow) -> Result<Address> {
        let flags: BTreeMap<String, bool> =
            serde_json::from_str(&row.flags).map_err(|e| Error::Parse(e.to_string()))?;

        let owner = match (row.addressable_type, row.addressable_id) {
            (Some(owner_type), Some(owner_id)) => Some(OwnerRef {
                owner_type,
                owner_id: OwnerId::new(owner_id),
            }),
            _ => None,
        };

        Ok(Address {
            id: row.id.map(AddressId::new),
            line_1: row.line_1,
            line_2: row.line_2,
            line_3: row.line_3,
            city: row.city,
            state: row.state,
            post_code: row.post_code,
            country_id: row.country_id.map(CountryId::new),
            lat: row.lat,
            lng: row.lng,
            owner,
            flags,
            created_at: Some(parse_timestamp(&row.created_at)?),
            updated_at: Some(parse_timestamp(&row.updated_at)?),
            deleted_at: row.deleted_at.as_deref().map(parse_timestamp).transpose()?,
        })
    }
}

fn parse_timestamp(text: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::Parse(e.to_string()))
}

impl AddressStore for SqliteAddressStore {
    async fn insert(&self, address: &Address) -> Result<AddressId> {
        let row = Self::new_row(address, Utc::now())?;
        let mut conn = checkout(&self.pool)?;

        let id = conn.transaction(|conn| {
            diesel::insert_into(addresses::table)
                .values(&row)
                .execute(conn)?;

            diesel::sql_query("SELECT last_insert_rowid() AS id")
                .get_result::<LastInsertRowId>(conn)
                .map(|row| row.id)
        })?;

        debug!(id = id, "Inserted address row");
        Ok(AddressId::new(id))
    }

    async fn update(&self, address: &Address) -> Result<bool> {
        let Some(id) = address.id else {
            return Ok(false);
        };
        let changes = Self::changeset(address, Utc::now())?;
        let mut conn = checkout(&self.pool)?;

        let updated = diesel::update(addresses::table.filter(addresses::id.eq(id.get())))
            .set(&changes)
            .execute(&mut conn)?;

        Ok(updated > 0)
    }

    async fn find(&self, id: AddressId, scope: Trashed) -> Result<Option<Address>> {
        let mut conn = checkout(&self.pool)?;

        let row: Option<AddressRow> = addresses::table
            .filter(addresses::id.eq(id.get()))
            .select(AddressRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row
            .map(Self::from_row)
            .transpose()?
            .filter(|a| scope.admits(a.deleted_at.as_ref())))
    }

    async fn list_for_owner(&self, owner: &OwnerRef, scope: Trashed) -> Result<Vec<Address>> {
        let mut conn = checkout(&self.pool)?;

        let mut query = addresses::table
            .filter(addresses::addressable_type.eq(&owner.owner_type))
            .filter(addresses::addressable_id.eq(owner.owner_id.get()))
            .order(addresses::id.asc())
            .select(AddressRow::as_select())
            .into_boxed();

        query = match scope {
            Trashed::Exclude => query.filter(addresses::deleted_at.is_null()),
            Trashed::Include => query,
            Trashed::Only => query.filter(addresses::deleted_at.is_not_null()),
        };

        let rows: Vec<AddressRow> = query.load(&mut conn)?;
        rows.into_iter().map(Self::from_row).collect()
    }

    async fn soft_delete(&self, id: AddressId, at: DateTime<Utc>) -> Result<bool> {
        let mut conn = checkout(&self.pool)?;
        let at = at.to_rfc3339();

        let updated = diesel::update(
            addresses::table
                .filter(addresses::id.eq(id.get()))
                .filter(addresses::deleted_at.is_null()),
        )
        .set((
            addresses::deleted_at.eq(Some(&at)),
            addresses::updated_at.eq(&at),
        ))
        .execute(&mut conn)?;

        Ok(updated > 0)
    }

    async fn restore(&self, id: AddressId) -> Result<bool> {
        let mut conn = checkout(&self.pool)?;

        let updated = diesel::update(
            addresses::table
                .filter(addresses::id.eq(id.get()))
                .filter(addresses::deleted_at.is_not_null()),
        )
        .set((
            addresses::deleted_at.eq(None::<String>),
            addresses::updated_at.eq(Utc::now().to_rfc3339()),
        ))
        .execute(&mut conn)?;

        Ok(updated > 0)
    }

    async fn force_delete(&self, id: AddressId) -> Result<bool> {
        let mut conn = checkout(&self.pool)?;
        let deleted = diesel::delete(addresses::table.filter(addresses::id.eq(id.get())))
            .execute(&mut conn)?;
        Ok(deleted > 0)
    }
}

/// SQLite-backed country lookup.
pub struct SqliteCountries {
    pool: DbPool,
}

impl SqliteCountries {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Add or replace a country row.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    pub fn upsert(&self, country: &Country) -> Result<()> {
        let row = CountryRow {
            id: country.id.get(),
            name: country.name.clone(),
            iso_3166_2: country.iso_3166_2.clone(),
        };
        let mut conn = checkout(&self.pool)?;
        diesel::replace_into(countries::table)
            .values(&row)
            .execute(&mut conn)?;
        Ok(())
    }
}

impl CountryLookup for SqliteCountries {
    async fn find(&self, id: CountryId) -> Result<Option<Country>> {
        let mut conn = checkout(&self.pool)?;

        let row: Option<CountryRow> = countries::table
            .find(id.get())
            .select(CountryRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(|r| Country {
            id: CountryId::new(r.id),
            name: r.name,
            iso_3166_2: r.iso_3166_2,
        }))
    }
}
