//! Identity domain model.
//!
//! An identity is a user principal within a realm. It is either backed by
//! an external federated directory (materialized per session) or by a
//! persistent local record. Provenance is carried by [`IdentityId`], which
//! is produced once when a raw id crosses into the model.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Prefix marking a raw identity id as federated.
pub const FEDERATED_ID_PREFIX: &str = "f:";

/// Errors raised when parsing a raw identity id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityIdError {
    /// The raw id was empty.
    #[error("identity id is empty")]
    Empty,

    /// The raw id carried the federation prefix but nothing after it.
    #[error("federated identity id has no external part")]
    EmptyExternalId,

    /// The raw id had no federation prefix and is not a valid local id.
    #[error("invalid local identity id '{0}'")]
    InvalidLocalId(String),
}

/// Typed identity id carrying provenance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "provenance", rename_all = "snake_case")]
pub enum IdentityId {
    /// Identity whose authoritative record lives in an external directory.
    Federated {
        /// Id of the user in the external directory (without the prefix).
        external_id: String,
    },

    /// Identity persisted by the local store.
    Local {
        /// Local record id.
        id: Uuid,
    },
}

impl IdentityId {
    /// Creates a federated id.
    #[must_use]
    pub fn federated(external_id: impl Into<String>) -> Self {
        Self::Federated {
            external_id: external_id.into(),
        }
    }

    /// Creates a local id.
    #[must_use]
    pub const fn local(id: Uuid) -> Self {
        Self::Local { id }
    }

    /// Parses a raw id string.
    ///
    /// Ids starting with [`FEDERATED_ID_PREFIX`] are federated; everything
    /// else must be a local UUID.
    ///
    /// ## Errors
    ///
    /// Returns an [`IdentityIdError`] for empty ids, a bare prefix, or an
    /// unprefixed id that is not a UUID.
    pub fn parse(raw: &str) -> Result<Self, IdentityIdError> {
        if raw.is_empty() {
            return Err(IdentityIdError::Empty);
        }

        if let Some(external_id) = raw.strip_prefix(FEDERATED_ID_PREFIX) {
            if external_id.is_empty() {
                return Err(IdentityIdError::EmptyExternalId);
            }
            return Ok(Self::federated(external_id));
        }

        Uuid::parse_str(raw)
            .map(Self::local)
            .map_err(|_| IdentityIdError::InvalidLocalId(raw.to_string()))
    }

    /// Returns true if this id denotes a federated identity.
    #[must_use]
    pub const fn is_federated(&self) -> bool {
        matches!(self, Self::Federated { .. })
    }

    /// Returns the local record id, if this is a local identity.
    #[must_use]
    pub const fn local_id(&self) -> Option<Uuid> {
        match self {
            Self::Local { id } => Some(*id),
            Self::Federated { .. } => None,
        }
    }

    /// Returns the external id, if this is a federated identity.
    #[must_use]
    pub fn external_id(&self) -> Option<&str> {
        match self {
            Self::Federated { external_id } => Some(external_id),
            Self::Local { .. } => None,
        }
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Federated { external_id } => write!(f, "{FEDERATED_ID_PREFIX}{external_id}"),
            Self::Local { id } => write!(f, "{id}"),
        }
    }
}

impl FromStr for IdentityId {
    type Err = IdentityIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A user principal.
///
/// Identities carry a profile and an open attribute map. Group memberships
/// and credentials are owned by the store and reached through the storage
/// traits, not through this struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    // === Identity ===
    /// Typed id with provenance.
    pub id: IdentityId,
    /// Realm this identity belongs to.
    pub realm_id: Uuid,
    /// Unique username within the realm.
    pub username: String,
    /// Whether the account is enabled.
    pub enabled: bool,

    // === Profile ===
    /// Email address.
    pub email: Option<String>,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,

    // === Timestamps ===
    /// When the record was created (or materialized, for federated identities).
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,

    // === Custom Attributes ===
    /// Custom attributes (multi-valued).
    pub attributes: HashMap<String, Vec<String>>,
}

impl Identity {
    /// Creates an identity with the given id.
    #[must_use]
    pub fn new(id: IdentityId, realm_id: Uuid, username: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            realm_id,
            username: username.into(),
            enabled: true,
            email: None,
            first_name: None,
            last_name: None,
            created_at: now,
            updated_at: now,
            attributes: HashMap::new(),
        }
    }

    /// Creates a federated identity.
    #[must_use]
    pub fn federated(
        realm_id: Uuid,
        external_id: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self::new(IdentityId::federated(external_id), realm_id, username)
    }

    /// Creates a local identity with a fresh id.
    #[must_use]
    pub fn local(realm_id: Uuid, username: impl Into<String>) -> Self {
        Self::new(IdentityId::local(Uuid::now_v7()), realm_id, username)
    }

    /// Creates an identity from a raw id string.
    ///
    /// ## Errors
    ///
    /// Returns an error if the raw id cannot be parsed.
    pub fn from_raw_id(
        realm_id: Uuid,
        raw_id: &str,
        username: impl Into<String>,
    ) -> Result<Self, IdentityIdError> {
        Ok(Self::new(IdentityId::parse(raw_id)?, realm_id, username))
    }

    /// Sets the email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the first name.
    #[must_use]
    pub fn with_first_name(mut self, name: impl Into<String>) -> Self {
        self.first_name = Some(name.into());
        self
    }

    /// Sets the last name.
    #[must_use]
    pub fn with_last_name(mut self, name: impl Into<String>) -> Self {
        self.last_name = Some(name.into());
        self
    }

    /// Sets a single-valued attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), vec![value.into()]);
        self
    }

    /// Checks if this is a federated identity.
    #[must_use]
    pub const fn is_federated(&self) -> bool {
        self.id.is_federated()
    }

    /// Gets all values of an attribute.
    #[must_use]
    pub fn get_attribute(&self, name: &str) -> Option<&Vec<String>> {
        self.attributes.get(name)
    }

    /// Gets the first value of an attribute.
    #[must_use]
    pub fn get_first_attribute(&self, name: &str) -> Option<&str> {
        self.get_attribute(name)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    /// Sets an attribute value.
    pub fn set_attribute(&mut self, name: impl Into<String>, values: Vec<String>) {
        self.attributes.insert(name.into(), values);
    }

    /// Copies email, first name and last name from another identity.
    pub fn copy_profile_from(&mut self, other: &Self) {
        self.email.clone_from(&other.email);
        self.first_name.clone_from(&other.first_name);
        self.last_name.clone_from(&other.last_name);
        self.updated_at = Utc::now();
    }
}
