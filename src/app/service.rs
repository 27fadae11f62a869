//! Address service: the save pipeline and relation accessors.
//!
//! Saving is an explicit pipeline rather than a framework hook:
//!
//! 1. [`validate`](AddressService::validate) - checked by the caller, or by
//!    [`create`](AddressService::create) / [`update`](AddressService::update)
//! 2. [`maybe_geocode`](AddressService::maybe_geocode) - only when
//!    geocoding is enabled; never fails
//! 3. the store write
//!
//! Country and owner lookups that miss resolve to `None`.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::owners::OwnerRegistry;
use crate::adapter::outbound::sqlite::{self, SqliteAddressStore, SqliteCountries};
use crate::adapter::outbound::GoogleGeocoder;
use crate::config::Config;
use crate::domain::{
    validation_rules, Address, AddressId, Country, GeocodeOutcome, Owner, OwnerRef,
    ValidationErrors, ValidationRules,
};
use crate::error::{Error, Result};
use crate::port::outbound::{AddressStore, CountryLookup, Geocoder, Trashed};

/// What a save did.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveReport {
    pub id: AddressId,
    /// True when the record was inserted rather than updated.
    pub created: bool,
    pub geocode: GeocodeOutcome,
}

/// Address operations over a store, a country lookup, and a geocoder.
pub struct AddressService<S, C> {
    store: S,
    countries: C,
    geocoder: Arc<dyn Geocoder>,
    owners: OwnerRegistry,
    geocode_enabled: bool,
    flags: Vec<String>,
}

impl<S: AddressStore, C: CountryLookup> AddressService<S, C> {
    /// Create a service using the geocoding switch and flag names from `config`.
    pub fn new(config: &Config, store: S, countries: C, geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            store,
            countries,
            geocoder,
            owners: OwnerRegistry::new(),
            geocode_enabled: config.geocode.enabled,
            flags: config.addresses.flags.clone(),
        }
    }

    /// Attach the owner resolvers.
    #[must_use]
    pub fn with_owners(mut self, owners: OwnerRegistry) -> Self {
        self.owners = owners;
        self
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn countries(&self) -> &C {
        &self.countries
    }

    /// Configured flag names.
    #[must_use]
    pub fn flags(&self) -> &[String] {
        &self.flags
    }

    #[must_use]
    pub fn geocode_enabled(&self) -> bool {
        self.geocode_enabled
    }

    /// Full rule set for the configured flags.
    #[must_use]
    pub fn validation_rules(&self) -> ValidationRules {
        validation_rules(&self.flags)
    }

    /// Validate an in-memory record.
    ///
    /// # Errors
    ///
    /// Returns every violated rule.
    pub fn validate(&self, address: &Address) -> std::result::Result<(), ValidationErrors> {
        self.validate_attributes(&address.attributes())
    }

    /// Validate a raw attribute map, e.g. a decoded request body.
    ///
    /// # Errors
    ///
    /// Returns every violated rule.
    pub fn validate_attributes(
        &self,
        attrs: &Map<String, Value>,
    ) -> std::result::Result<(), ValidationErrors> {
        self.validation_rules().validate(attrs)
    }

    /// The country referenced by `country_id`, if any.
    ///
    /// # Errors
    ///
    /// Propagates lookup failures; an unknown id is `Ok(None)`.
    pub async fn country(&self, address: &Address) -> Result<Option<Country>> {
        match address.country_id {
            Some(id) => self.countries.find(id).await,
            None => Ok(None),
        }
    }

    /// Display name of the referenced country.
    ///
    /// Lookup failures are logged and read as no country.
    pub async fn country_name(&self, address: &Address) -> Option<String> {
        match self.country(address).await {
            Ok(country) => country.and_then(|c| c.display_name().map(str::to_string)),
            Err(e) => {
                warn!(country_id = ?address.country_id, error = %e, "Country lookup failed");
                None
            }
        }
    }

    /// The owner entity, resolved through the registry.
    ///
    /// # Errors
    ///
    /// Propagates resolver failures; a missing owner is `Ok(None)`.
    pub async fn owner(&self, address: &Address) -> Result<Option<Arc<dyn Owner>>> {
        match &address.owner {
            Some(owner) => self.owners.resolve(owner).await,
            None => Ok(None),
        }
    }

    /// Look the address up and store the first match in `lat`/`lng`.
    ///
    /// Runs regardless of configuration. Failures leave the coordinates
    /// untouched and are reported in the outcome, never as an error.
    pub async fn geocode(&self, address: &mut Address) -> GeocodeOutcome {
        let country = self.country_name(address).await;
        let query = address.geocode_query(country.as_deref());

        if query.is_empty() {
            debug!("Nothing to geocode");
            return GeocodeOutcome::NoMatch;
        }

        match self.geocoder.locate(&query).await {
            Ok(Some(coordinates)) => {
                address.set_coordinates(coordinates);
                debug!(
                    provider = self.geocoder.name(),
                    lat = coordinates.lat,
                    lng = coordinates.lng,
                    "Geocoded address"
                );
                GeocodeOutcome::Located(coordinates)
            }
            Ok(None) => {
                debug!(provider = self.geocoder.name(), query = %query.as_str(), "No geocode match");
                GeocodeOutcome::NoMatch
            }
            Err(e) => {
                warn!(
                    provider = self.geocoder.name(),
                    error = %e,
                    "Geocoding failed, keeping existing coordinates"
                );
                GeocodeOutcome::Failed(e.to_string())
            }
        }
    }

    /// Geocode only when geocoding is enabled.
    pub async fn maybe_geocode(&self, address: &mut Address) -> GeocodeOutcome {
        if !self.geocode_enabled {
            return GeocodeOutcome::Disabled;
        }
        self.geocode(address).await
    }

    /// Geocode if enabled, then insert or update.
    ///
    /// Does not validate; call [`validate`](Self::validate) first. On
    /// success `address` is refreshed from the store (id, timestamps).
    ///
    /// # Errors
    ///
    /// Store failures, or [`Error::NotFound`] when updating a record that
    /// no longer exists.
    pub async fn save(&self, address: &mut Address) -> Result<SaveReport> {
        let geocode = self.maybe_geocode(address).await;

        let (id, created) = match address.id {
            Some(id) => {
                if !self.store.update(address).await? {
                    return Err(Error::NotFound(id));
                }
                (id, false)
            }
            None => (self.store.insert(address).await?, true),
        };

        if let Some(stored) = self.store.find(id, Trashed::Include).await? {
            *address = stored;
        } else {
            address.id = Some(id);
        }

        info!(id = %id, created, geocode = ?geocode, "Saved address");
        Ok(SaveReport {
            id,
            created,
            geocode,
        })
    }

    /// Validate, mass-assign and save a new address.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] or [`Error::Attribute`] before anything is
    /// written; store failures after.
    pub async fn create(&self, attrs: &Map<String, Value>) -> Result<Address> {
        self.validate_attributes(attrs)?;

        let mut address = Address::default();
        address.fill(attrs, &self.flags)?;
        self.save(&mut address).await?;

        Ok(address)
    }

    /// Apply attribute changes to a live address, validating the result.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for a missing or trashed id, plus the errors of
    /// [`create`](Self::create).
    pub async fn update(&self, id: AddressId, attrs: &Map<String, Value>) -> Result<Address> {
        let mut address = self
            .store
            .find(id, Trashed::Exclude)
            .await?
            .ok_or(Error::NotFound(id))?;

        let mut merged = address.attributes();
        merged.extend(attrs.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.validate_attributes(&merged)?;

        address.fill(attrs, &self.flags)?;
        self.save(&mut address).await?;

        Ok(address)
    }

    /// Get an address by id within a trash scope.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn find(&self, id: AddressId, scope: Trashed) -> Result<Option<Address>> {
        self.store.find(id, scope).await
    }

    /// Addresses belonging to one owner.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn addresses_for(&self, owner: &OwnerRef, scope: Trashed) -> Result<Vec<Address>> {
        self.store.list_for_owner(owner, scope).await
    }

    /// Soft-delete. Returns false if the address is missing or already trashed.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn delete(&self, id: AddressId) -> Result<bool> {
        let deleted = self.store.soft_delete(id, Utc::now()).await?;
        if deleted {
            info!(id = %id, "Soft-deleted address");
        }
        Ok(deleted)
    }

    /// Undo a soft delete, then save the restored record so it is
    /// geocoded like any other save.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn restore(&self, id: AddressId) -> Result<bool> {
        if !self.store.restore(id).await? {
            return Ok(false);
        }
        info!(id = %id, "Restored address");

        if self.geocode_enabled {
            if let Some(mut address) = self.store.find(id, Trashed::Exclude).await? {
                self.save(&mut address).await?;
            }
        }
        Ok(true)
    }

    /// Remove permanently.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn force_delete(&self, id: AddressId) -> Result<bool> {
        let removed = self.store.force_delete(id).await?;
        if removed {
            info!(id = %id, "Permanently deleted address");
        }
        Ok(removed)
    }

    /// [`Address::to_array`] with the country name resolved.
    pub async fn array(&self, address: &Address) -> Option<Vec<String>> {
        let country = self.country_name(address).await;
        address.to_array(country.as_deref())
    }

    /// [`Address::to_html`] with the country name resolved.
    pub async fn html(&self, address: &Address) -> Option<String> {
        let country = self.country_name(address).await;
        address.to_html(country.as_deref())
    }

    /// [`Address::to_line`] with the country name resolved.
    pub async fn line(&self, address: &Address) -> Option<String> {
        let country = self.country_name(address).await;
        address.to_line(country.as_deref())
    }
}

impl AddressService<SqliteAddressStore, SqliteCountries> {
    /// Wire a service to the configured SQLite database and the Google
    /// geocoder, running pending migrations first.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be created or migrations fail.
    pub fn sqlite(config: &Config) -> Result<Self> {
        let pool = sqlite::create_pool(&config.database.url)?;
        sqlite::run_migrations(&pool)?;

        Ok(Self::new(
            config,
            SqliteAddressStore::new(pool.clone()),
            SqliteCountries::new(pool),
            Arc::new(GoogleGeocoder::from_config(&config.geocode)),
        ))
    }
}
