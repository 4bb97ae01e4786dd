//! Local identity storage trait.

use async_trait::async_trait;
use kc_model::Identity;
use uuid::Uuid;

use crate::error::StorageResult;

/// Provider for persistent local identities.
///
/// Implementations must be thread-safe and support concurrent access.
#[async_trait]
pub trait LocalUserProvider: Send + Sync {
    /// Creates a new local identity with the given username.
    ///
    /// The new record is enabled, non-federated, and has an empty profile.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::Duplicate` if a local identity with the same
    /// username exists in the realm.
    async fn create_local(&self, realm_id: Uuid, username: &str) -> StorageResult<Identity>;

    /// Gets a local identity by username.
    async fn find_by_username(
        &self,
        realm_id: Uuid,
        username: &str,
    ) -> StorageResult<Option<Identity>>;

    /// Persists the profile fields (email, names, enabled flag) of a local identity.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the identity doesn't exist, and
    /// `StorageError::InvalidData` if it is not a local identity.
    async fn update_profile(&self, identity: &Identity) -> StorageResult<()>;

    /// Removes a local identity by ID.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the identity doesn't exist.
    async fn remove_local(&self, realm_id: Uuid, id: Uuid) -> StorageResult<()>;
}
