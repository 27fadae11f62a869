//! Addresses - polymorphic postal addresses with validation, geocoding, and
//! soft-delete persistence.
//!
//! An [`Address`](domain::Address) belongs to one owner of any type (a
//! customer, a supplier, ...), points at a country, and carries a
//! configurable set of boolean flags such as `is_primary` or `is_billing`.
//!
//! # Architecture
//!
//! The crate follows a ports-and-adapters layout:
//!
//! - **`domain`** - the record, validation rules, formatting, geocode types
//! - **`port::outbound`** - store, country lookup, owner resolver, geocoder traits
//! - **`adapter::outbound`** - SQLite (Diesel), in-memory, and Google implementations
//! - **`app`** - [`AddressService`](app::AddressService), the save pipeline
//!
//! # Modules
//!
//! - [`config`] - Configuration loading from TOML files
//! - [`domain`] - Storage-agnostic types
//! - [`error`] - Error types for the crate
//! - [`port`] - Trait definitions for outbound dependencies
//! - [`adapter`] - Port implementations
//! - [`app`] - Application service
//!
//! # Example
//!
//! ```no_run
//! use addresses::app::AddressService;
//! use addresses::config::Config;
//! use serde_json::json;
//!
//! # async fn run() -> addresses::error::Result<()> {
//! let config = Config::load("addresses.toml")?;
//! config.init_logging();
//!
//! let service = AddressService::sqlite(&config)?;
//! let attrs = json!({
//!     "line_1": "221B Baker St",
//!     "city": "London",
//!     "post_code": "NW16XE",
//!     "country_id": 826,
//!     "addressable_type": "customer",
//!     "addressable_id": 7,
//!     "is_primary": true,
//! });
//!
//! let address = service.create(attrs.as_object().unwrap()).await?;
//! println!("{:?}", service.line(&address).await);
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;
