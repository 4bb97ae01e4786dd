//! Credential domain model.
//!
//! [`CredentialInput`] is the secret a user supplied at login. It is opaque
//! to the sync core and is handed verbatim to the credential store when a
//! federated identity is promoted.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Credential type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialType {
    /// Password credential.
    #[default]
    Password,
    /// TOTP (Time-based One-Time Password) credential.
    Totp,
}

impl CredentialType {
    /// Returns the string representation used in storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Password => "password",
            Self::Totp => "otp",
        }
    }
}

/// A credential supplied at authentication time.
///
/// ## Security Note
///
/// The secret value is never printed by `Debug` and must never be logged.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialInput {
    /// Credential type.
    pub credential_type: CredentialType,
    /// Raw secret value.
    value: String,
}

impl CredentialInput {
    /// Creates a credential of the given type.
    #[must_use]
    pub fn new(credential_type: CredentialType, value: impl Into<String>) -> Self {
        Self {
            credential_type,
            value: value.into(),
        }
    }

    /// Creates a password credential.
    #[must_use]
    pub fn password(value: impl Into<String>) -> Self {
        Self::new(CredentialType::Password, value)
    }

    /// Returns the raw secret value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Debug for CredentialInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialInput")
            .field("credential_type", &self.credential_type)
            .field("value", &"<redacted>")
            .finish()
    }
}
