//! Opaque user identity.

use serde::{Deserialize, Serialize};

use crate::error::LendError;

/// Identity of a user as handed over by the external session provider.
///
/// An email-equivalent opaque string. The domain never parses, normalizes or
/// mutates it beyond trimming surrounding whitespace at construction; equality
/// is exact string equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Wrap an identity string. Fails on blank input.
    pub fn new(raw: impl Into<String>) -> Result<Self, LendError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LendError::validation("identity cannot be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Identity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
