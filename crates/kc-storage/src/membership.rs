//! Group membership trait.

use async_trait::async_trait;
use kc_model::{Group, IdentityId};
use uuid::Uuid;

use crate::error::StorageResult;

/// Membership read and mutation primitives.
///
/// Memberships are keyed by [`IdentityId`], so the same provider serves
/// federated identities (whose memberships live in federated storage) and
/// local records.
#[async_trait]
pub trait MembershipProvider: Send + Sync {
    /// Gets the groups an identity currently belongs to.
    async fn current_groups(
        &self,
        realm_id: Uuid,
        identity_id: &IdentityId,
    ) -> StorageResult<Vec<Group>>;

    /// Adds an identity to a group.
    ///
    /// Joining a group the identity already belongs to is a no-op.
    async fn join_group(
        &self,
        realm_id: Uuid,
        identity_id: &IdentityId,
        group: &Group,
    ) -> StorageResult<()>;

    /// Removes an identity from a group.
    ///
    /// Leaving a group the identity does not belong to is a no-op.
    async fn leave_group(
        &self,
        realm_id: Uuid,
        identity_id: &IdentityId,
        group: &Group,
    ) -> StorageResult<()>;
}
