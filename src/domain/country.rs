//! Country reference data.

use serde::{Deserialize, Serialize};

use super::id::CountryId;

/// A country an address can point at through its `country_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: CountryId,
    /// Display name used in formatted addresses and geocode queries.
    pub name: String,
    /// ISO 3166-1 alpha-2 code, when known.
    pub iso_3166_2: Option<String>,
}

impl Country {
    pub fn new(id: CountryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            iso_3166_2: None,
        }
    }

    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.iso_3166_2 = Some(code.into());
        self
    }

    /// The display name, or `None` when it is blank.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        Some(self.name.as_str()).filter(|n| !n.is_empty())
    }
}
