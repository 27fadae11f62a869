use thiserror::Error;

use crate::domain::id::AddressId;
use crate::domain::validation::ValidationErrors;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("invalid value for attribute '{field}': {reason}")]
    Attribute { field: String, reason: String },

    #[error("address {0} not found")]
    NotFound(AddressId),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("geocoding provider error: {0}")]
    Geocode(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Error::Validation(errors)
    }
}

impl From<diesel::result::Error> for Error {
    fn from(err: diesel::result::Error) -> Self {
        Error::Database(err.to_string())
    }
}
