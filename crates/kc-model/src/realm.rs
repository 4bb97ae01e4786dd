//! Realm domain model.
//!
//! A realm scopes group lookups and identity records. The sync core only
//! passes realms through; it never mutates them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A realm reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Realm {
    /// Unique identifier.
    pub id: Uuid,
    /// Realm name (e.g., "master").
    pub name: String,
}

impl Realm {
    /// Creates a new realm with a fresh id.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
        }
    }
}
