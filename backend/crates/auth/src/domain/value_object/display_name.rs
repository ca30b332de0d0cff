//! Display Name Value Object

use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Minimum display name length after trimming
const NAME_MIN_LENGTH: usize = 2;

/// Maximum display name length
const NAME_MAX_LENGTH: usize = 100;

/// User display name (free text, trimmed)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayName(String);

impl DisplayName {
    /// Create a new display name, trimming and validating the input
    pub fn new(name: impl Into<String>) -> Result<Self, AuthError> {
        let name = name.into().trim().to_string();

        if name.is_empty() {
            return Err(AuthError::Validation("Missing required fields".into()));
        }

        if name.chars().count() < NAME_MIN_LENGTH {
            return Err(AuthError::Validation(
                "Name must be at least 2 characters long".into(),
            ));
        }

        if name.chars().count() > NAME_MAX_LENGTH {
            return Err(AuthError::Validation(format!(
                "Name must be at most {} characters long",
                NAME_MAX_LENGTH
            )));
        }

        Ok(Self(name))
    }

    /// Create from a database value (already validated at write time)
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DisplayName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
