//! The address record.
//!
//! An [`Address`] holds postal fields, optional coordinates, a polymorphic
//! owner reference, a configurable set of boolean flags, and soft-delete
//! bookkeeping. Records are usually built by mass assignment from a raw
//! attribute map (a decoded form or JSON body) with [`Address::fill`], which
//! only touches fillable attributes and ignores everything else.
//!
//! # Examples
//!
//! ```
//! use addresses::domain::address::Address;
//! use serde_json::json;
//!
//! let flags = vec!["primary".to_string()];
//! let attrs = json!({
//!     "line_1": "221B Baker St",
//!     "city": "London",
//!     "post_code": "NW16XE",
//!     "country_id": 826,
//!     "is_primary": true,
//!     "id": 99,
//! });
//!
//! let mut address = Address::default();
//! address.fill(attrs.as_object().unwrap(), &flags).unwrap();
//!
//! assert_eq!(address.city.as_deref(), Some("London"));
//! assert!(address.flag("primary"));
//! assert!(address.id.is_none()); // not fillable
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::geocode::{Coordinates, GeocodeQuery};
use super::id::{AddressId, CountryId, OwnerId};
use super::owner::OwnerRef;
use super::validation::{validation_rules, ValidationRules};
use crate::error::{Error, Result};

/// Attributes [`Address::fill`] may assign, besides the configured flags.
pub const FILLABLE: [&str; 11] = [
    "line_1",
    "line_2",
    "line_3",
    "city",
    "state",
    "post_code",
    "country_id",
    "lat",
    "lng",
    "addressable_id",
    "addressable_type",
];

/// Prefix of flag attribute names (`is_primary`, ...).
pub const FLAG_PREFIX: &str = "is_";

/// A postal address attachable to one owner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub id: Option<AddressId>,
    pub line_1: Option<String>,
    pub line_2: Option<String>,
    pub line_3: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub post_code: Option<String>,
    pub country_id: Option<CountryId>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub owner: Option<OwnerRef>,
    /// Flag values keyed by bare flag name (`primary`, not `is_primary`).
    #[serde(default)]
    pub flags: BTreeMap<String, bool>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Set when the record is soft-deleted.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Address {
    /// Build the validation rule set for the configured flags.
    #[must_use]
    pub fn validation_rules(flags: &[String]) -> ValidationRules {
        validation_rules(flags)
    }

    /// Mass-assign fillable attributes from a raw attribute map.
    ///
    /// Keys that are neither fillable nor `is_<flag>` for a configured flag
    /// are skipped. `null` and `""` clear optional fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Attribute`] when a value has the wrong shape, e.g. a
    /// non-numeric `lat`. Attributes before the bad one may already be set.
    pub fn fill(&mut self, attrs: &Map<String, Value>, flags: &[String]) -> Result<&mut Self> {
        let mut owner_type = self.owner.as_ref().map(|o| o.owner_type.clone());
        let mut owner_id = self.owner.as_ref().map(|o| o.owner_id);

        for (key, value) in attrs {
            match key.as_str() {
                "line_1" => self.line_1 = text(key, value)?,
                "line_2" => self.line_2 = text(key, value)?,
                "line_3" => self.line_3 = text(key, value)?,
                "city" => self.city = text(key, value)?,
                "state" => self.state = text(key, value)?,
                "post_code" => self.post_code = text(key, value)?,
                "country_id" => self.country_id = integer(key, value)?.map(CountryId::new),
                "lat" => self.lat = float(key, value)?,
                "lng" => self.lng = float(key, value)?,
                "addressable_type" => owner_type = text(key, value)?,
                "addressable_id" => owner_id = integer(key, value)?.map(OwnerId::new),
                _ => match key
                    .strip_prefix(FLAG_PREFIX)
                    .filter(|name| flags.iter().any(|f| f == name))
                {
                    Some(name) => match boolean(key, value)? {
                        Some(on) => {
                            self.flags.insert(name.to_string(), on);
                        }
                        None => {
                            self.flags.remove(name);
                        }
                    },
                    None => debug!(attribute = %key, "Ignoring non-fillable attribute"),
                },
            }
        }

        self.owner = match (owner_type, owner_id) {
            (Some(owner_type), Some(owner_id)) => Some(OwnerRef {
                owner_type,
                owner_id,
            }),
            _ => None,
        };

        Ok(self)
    }

    /// Render the record as a raw attribute map, the shape [`fill`](Self::fill)
    /// accepts and validation rules check.
    #[must_use]
    pub fn attributes(&self) -> Map<String, Value> {
        let mut map = Map::new();
        let mut put = |key: &str, value: Value| {
            map.insert(key.to_string(), value);
        };

        put("line_1", self.line_1.clone().into());
        put("line_2", self.line_2.clone().into());
        put("line_3", self.line_3.clone().into());
        put("city", self.city.clone().into());
        put("state", self.state.clone().into());
        put("post_code", self.post_code.clone().into());
        put("country_id", self.country_id.map(CountryId::get).into());
        put("lat", self.lat.into());
        put("lng", self.lng.into());
        put(
            "addressable_type",
            self.owner.as_ref().map(|o| o.owner_type.clone()).into(),
        );
        put(
            "addressable_id",
            self.owner.as_ref().map(|o| o.owner_id.get()).into(),
        );
        for (name, on) in &self.flags {
            put(&format!("{FLAG_PREFIX}{name}"), Value::Bool(*on));
        }

        map
    }

    /// Value of a flag; unset flags read as `false`.
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    pub fn set_flag(&mut self, name: impl Into<String>, on: bool) {
        self.flags.insert(name.into(), on);
    }

    /// Current coordinates, when both halves are known.
    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            _ => None,
        }
    }

    pub fn set_coordinates(&mut self, coordinates: Coordinates) {
        self.lat = Some(coordinates.lat);
        self.lng = Some(coordinates.lng);
    }

    /// Geocoding query: lines, city, state, post code, then country name.
    #[must_use]
    pub fn geocode_query(&self, country: Option<&str>) -> GeocodeQuery {
        GeocodeQuery::from_components([
            self.line_1.as_deref(),
            self.line_2.as_deref(),
            self.line_3.as_deref(),
            self.city.as_deref(),
            self.state.as_deref(),
            self.post_code.as_deref(),
            country,
        ])
    }

    #[must_use]
    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }

    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

fn invalid(key: &str, reason: impl Into<String>) -> Error {
    Error::Attribute {
        field: key.to_string(),
        reason: reason.into(),
    }
}

fn text(key: &str, value: &Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        _ => Err(invalid(key, "expected a string")),
    }
}

fn integer(key: &str, value: &Value) -> Result<Option<i64>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| invalid(key, format!("'{s}' is not an integer"))),
        Value::Number(n) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| invalid(key, format!("{n} is not an integer"))),
        _ => Err(invalid(key, "expected an integer")),
    }
}

fn float(key: &str, value: &Value) -> Result<Option<f64>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| invalid(key, format!("'{s}' is not a number"))),
        Value::Number(n) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| invalid(key, format!("{n} is not a number"))),
        _ => Err(invalid(key, "expected a number")),
    }
}

fn boolean(key: &str, value: &Value) -> Result<Option<bool>> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Ok(Some(false)),
            Some(1) => Ok(Some(true)),
            _ => Err(invalid(key, format!("{n} is not a boolean"))),
        },
        Value::String(s) => match s.as_str() {
            "" => Ok(None),
            "0" | "false" => Ok(Some(false)),
            "1" | "true" => Ok(Some(true)),
            _ => Err(invalid(key, format!("'{s}' is not a boolean"))),
        },
        _ => Err(invalid(key, "expected a boolean")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flags() -> Vec<String> {
        vec!["primary".into(), "billing".into(), "shipping".into()]
    }

    fn fill(value: Value) -> Result<Address> {
        let mut address = Address::default();
        address.fill(value.as_object().unwrap(), &flags())?;
        Ok(address)
    }

    #[test]
    fn fill_coerces_form_values() {
        let address = fill(json!({
            "line_1": "1 Main St",
            "post_code": 12345,
            "country_id": "840",
            "lat": "40.5",
            "lng": -73.25,
            "is_billing": "1",
            "is_shipping": 0,
        }))
        .unwrap();

        assert_eq!(address.post_code.as_deref(), Some("12345"));
        assert_eq!(address.country_id, Some(CountryId::new(840)));
        assert_eq!(address.coordinates(), Some(Coordinates::new(40.5, -73.25)));
        assert!(address.flag("billing"));
        assert!(!address.flag("shipping"));
        assert!(!address.flag("primary"));
    }

    #[test]
    fn fill_ignores_non_fillable_and_unknown_flags() {
        let address = fill(json!({
            "id": 5,
            "deleted_at": "2024-01-01T00:00:00Z",
            "is_archived": true,
            "city": "Springfield",
        }))
        .unwrap();

        assert!(address.id.is_none());
        assert!(address.deleted_at.is_none());
        assert!(address.flags.is_empty());
        assert_eq!(address.city.as_deref(), Some("Springfield"));
    }

    #[test]
    fn fill_sets_owner_from_both_halves() {
        let address = fill(json!({
            "addressable_type": "customer",
            "addressable_id": 7,
        }))
        .unwrap();
        assert_eq!(address.owner, Some(OwnerRef::new("customer", 7)));

        let half = fill(json!({ "addressable_type": "customer" })).unwrap();
        assert!(half.owner.is_none());
    }

    #[test]
    fn fill_merges_owner_with_existing() {
        let mut address = fill(json!({
            "addressable_type": "customer",
            "addressable_id": 7,
        }))
        .unwrap();
        address
            .fill(json!({ "addressable_id": 9 }).as_object().unwrap(), &flags())
            .unwrap();
        assert_eq!(address.owner, Some(OwnerRef::new("customer", 9)));
    }

    #[test]
    fn fill_clears_with_null_and_empty_string() {
        let mut address = fill(json!({ "line_2": "Flat 3", "state": "Kent" })).unwrap();
        address
            .fill(
                json!({ "line_2": null, "state": "" }).as_object().unwrap(),
                &flags(),
            )
            .unwrap();
        assert!(address.line_2.is_none());
        assert!(address.state.is_none());
    }

    #[test]
    fn fill_rejects_malformed_values() {
        let err = fill(json!({ "lat": "north" })).unwrap_err();
        assert!(matches!(err, Error::Attribute { ref field, .. } if field == "lat"));

        let err = fill(json!({ "country_id": 1.5 })).unwrap_err();
        assert!(matches!(err, Error::Attribute { ref field, .. } if field == "country_id"));

        let err = fill(json!({ "is_primary": "maybe" })).unwrap_err();
        assert!(matches!(err, Error::Attribute { ref field, .. } if field == "is_primary"));
    }

    #[test]
    fn attributes_round_trip_through_fill() {
        let mut original = fill(json!({
            "line_1": "221B Baker St",
            "city": "London",
            "post_code": "NW16XE",
            "country_id": 826,
            "addressable_type": "customer",
            "addressable_id": 3,
            "is_primary": true,
        }))
        .unwrap();
        original.set_coordinates(Coordinates::new(51.5237, -0.1585));

        let copy = fill(Value::Object(original.attributes())).unwrap();
        assert_eq!(copy, original);
    }

    #[test]
    fn attributes_pass_validation_for_complete_record() {
        let address = fill(json!({
            "line_1": "221B Baker St",
            "city": "London",
            "post_code": "NW16XE",
            "country_id": 826,
            "is_primary": true,
        }))
        .unwrap();

        let rules = Address::validation_rules(&flags());
        assert!(rules.validate(&address.attributes()).is_ok());
    }

    #[test]
    fn geocode_query_follows_field_order() {
        let address = fill(json!({
            "line_1": "1 Main St",
            "city": "Springfield",
        }))
        .unwrap();

        let query = address.geocode_query(Some("USA"));
        assert_eq!(query.as_str(), "1 Main St,Springfield,USA");
    }

    #[test]
    fn coordinates_need_both_halves() {
        let address = Address {
            lat: Some(1.0),
            ..Address::default()
        };
        assert!(address.coordinates().is_none());
    }
}
