//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::{addresses, countries};

/// Database row for an address (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = addresses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AddressRow {
    pub id: Option<i64>,
    pub line_1: Option<String>,
    pub line_2: Option<String>,
    pub line_3: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub post_code: Option<String>,
    pub country_id: Option<i64>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub addressable_type: Option<String>,
    pub addressable_id: Option<i64>,
    pub flags: String,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
}

/// Database row for an address (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = addresses)]
pub struct NewAddressRow {
    pub line_1: Option<String>,
    pub line_2: Option<String>,
    pub line_3: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub post_code: Option<String>,
    pub country_id: Option<i64>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub addressable_type: Option<String>,
    pub addressable_id: Option<i64>,
    pub flags: String,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
}

/// Column values written on update. `None` clears the column.
///
/// `deleted_at` is absent: only soft delete and restore change it.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = addresses)]
#[diesel(treat_none_as_null = true)]
pub struct AddressChangeset {
    pub line_1: Option<String>,
    pub line_2: Option<String>,
    pub line_3: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub post_code: Option<String>,
    pub country_id: Option<i64>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub addressable_type: Option<String>,
    pub addressable_id: Option<i64>,
    pub flags: String,
    pub updated_at: String,
}

/// Database row for a country.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = countries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CountryRow {
    pub id: i64,
    pub name: String,
    pub iso_3166_2: Option<String>,
}

/// Result of `SELECT last_insert_rowid()`.
#[derive(QueryableByName, Debug)]
pub struct LastInsertRowId {
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub id: i64,
}
