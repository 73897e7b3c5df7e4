//! Per-tenant gateway settings.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::validate::Validate;

/// Maximum length of a connection string, in characters.
pub const MAX_CONNECTION_STRING_LEN: usize = 2048;

/// Settings stored for a single tenant.
///
/// A tenant without stored settings reads as `Settings::default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Connection string for the tenant's device hub.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub connection_string: String,
}

impl Settings {
    /// Create settings with the given connection string.
    #[must_use]
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
        }
    }

    /// Returns `true` when no connection string is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.connection_string.is_empty()
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<(), ValidationError> {
        let len = self.connection_string.chars().count();
        if len > MAX_CONNECTION_STRING_LEN {
            return Err(ValidationError::field(
                "connection_string",
                format!("length must be no more than {MAX_CONNECTION_STRING_LEN} characters (got {len})"),
            ));
        }
        Ok(())
    }
}
