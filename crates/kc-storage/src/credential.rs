//! Credential storage trait.

use async_trait::async_trait;
use kc_model::CredentialInput;
use uuid::Uuid;

use crate::error::StorageResult;

/// Provider for credential storage operations.
///
/// ## Security Note
///
/// Implementations must hash or encrypt secrets at rest and must never log
/// the credential value.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Installs a credential as the sole authentication factor of a local identity.
    ///
    /// Any credentials the identity already holds are replaced.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the identity doesn't exist.
    async fn install_credential(
        &self,
        realm_id: Uuid,
        user_id: Uuid,
        credential: &CredentialInput,
    ) -> StorageResult<()>;
}
