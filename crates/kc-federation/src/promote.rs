//! Federated to local identity promotion.
//!
//! On first successful login a federated identity is copied into a
//! persistent local record: profile, the credential the user just
//! authenticated with, and group memberships from the roles attribute.
//! After that the user can authenticate without the external directory.

use std::sync::Arc;

use kc_model::{CredentialInput, Identity, IdentityId, Realm};
use kc_storage::{CredentialProvider, LocalUserProvider, MembershipProvider};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::collaborators::SyncCollaborators;
use crate::config::SyncConfig;
use crate::error::{FederationError, FederationErrorContext, FederationResult};
use crate::resolve::GroupResolver;
use crate::roles::DesiredRoleSet;

/// Result of a promotion attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PromotionOutcome {
    /// A local record was created.
    Promoted {
        /// Id of the new local identity.
        local_id: Uuid,
        /// Groups the new identity was joined to.
        granted: Vec<String>,
    },

    /// The identity is not federated; nothing to do.
    NotFederated,

    /// A local identity with the same username already exists.
    AlreadyLocal {
        /// Id of the existing identity.
        existing: IdentityId,
    },
}

impl PromotionOutcome {
    /// Returns true if a local record was created.
    #[must_use]
    pub const fn is_promoted(&self) -> bool {
        matches!(self, Self::Promoted { .. })
    }
}

/// Promotes federated identities to local records.
#[derive(Clone)]
pub struct IdentityPromoter {
    resolver: GroupResolver,
    memberships: Arc<dyn MembershipProvider>,
    users: Arc<dyn LocalUserProvider>,
    credentials: Arc<dyn CredentialProvider>,
    roles_attribute: String,
    guard_existing: bool,
}

impl IdentityPromoter {
    /// Creates a promoter.
    #[must_use]
    pub fn new(collaborators: &SyncCollaborators, config: &SyncConfig) -> Self {
        Self {
            resolver: GroupResolver::new(
                Arc::clone(&collaborators.directory),
                config.group_parent_path.clone(),
            ),
            memberships: Arc::clone(&collaborators.memberships),
            users: Arc::clone(&collaborators.users),
            credentials: Arc::clone(&collaborators.credentials),
            roles_attribute: config.roles_attribute.clone(),
            guard_existing: config.guard_against_existing_local_user,
        }
    }

    /// Promotes the identity if it is federated, returning whether a local
    /// record was created.
    ///
    /// ## Errors
    ///
    /// See [`IdentityPromoter::promote`].
    pub async fn promote_if_needed(
        &self,
        realm: &Realm,
        identity: &Identity,
        credential: &CredentialInput,
    ) -> FederationResult<bool> {
        Ok(self.promote(realm, identity, credential).await?.is_promoted())
    }

    /// Promotes the identity if it is federated.
    ///
    /// ## Errors
    ///
    /// Store failures abort the promotion. If the local record had already
    /// been created it is removed again before the error is returned, so a
    /// failed promotion never leaves a half-initialized identity behind.
    /// A uniqueness conflict on create surfaces as an error for which
    /// [`FederationError::is_conflict`] returns true.
    pub async fn promote(
        &self,
        realm: &Realm,
        identity: &Identity,
        credential: &CredentialInput,
    ) -> FederationResult<PromotionOutcome> {
        if !identity.is_federated() {
            tracing::debug!(user_id = %identity.id, "User is not federated, skipping migration");
            return Ok(PromotionOutcome::NotFederated);
        }

        if self.guard_existing {
            if let Some(existing) = self
                .users
                .find_by_username(realm.id, &identity.username)
                .await?
            {
                tracing::debug!(
                    username = %identity.username,
                    "User already exists locally, skipping migration"
                );
                return Ok(PromotionOutcome::AlreadyLocal {
                    existing: existing.id,
                });
            }
        }

        tracing::info!(
            username = %identity.username,
            realm = %realm.name,
            "Migrating federated user to local storage"
        );

        let mut local = self.users.create_local(realm.id, &identity.username).await?;
        let Some(local_id) = local.id.local_id() else {
            return Err(FederationError::invalid_identity(format!(
                "store returned non-local identity '{}' for '{}'",
                local.id, identity.username
            )));
        };

        match self
            .initialize(realm, identity, credential, &mut local, local_id)
            .await
        {
            Ok(granted) => {
                tracing::info!(
                    username = %local.username,
                    id = %local_id,
                    groups = granted.len(),
                    "Successfully migrated user"
                );
                Ok(PromotionOutcome::Promoted { local_id, granted })
            }
            Err(err) => {
                let ctx = FederationErrorContext::new("promote", realm.id)
                    .with_username(identity.username.as_str());
                self.rollback(&ctx, local_id).await;
                Err(err)
            }
        }
    }

    /// Copies profile, installs the credential and grants groups.
    async fn initialize(
        &self,
        realm: &Realm,
        federated: &Identity,
        credential: &CredentialInput,
        local: &mut Identity,
        local_id: Uuid,
    ) -> FederationResult<Vec<String>> {
        local.copy_profile_from(federated);
        local.enabled = true;
        self.users.update_profile(local).await?;

        self.credentials
            .install_credential(realm.id, local_id, credential)
            .await?;
        tracing::debug!(
            username = %local.username,
            email = ?local.email,
            credential_type = credential.credential_type.as_str(),
            "Created local user"
        );

        self.grant_roles(realm, federated, local).await
    }

    /// Joins the new local identity to every resolvable desired group.
    async fn grant_roles(
        &self,
        realm: &Realm,
        federated: &Identity,
        local: &Identity,
    ) -> FederationResult<Vec<String>> {
        let desired = DesiredRoleSet::from_identity(federated, &self.roles_attribute);
        if desired.is_empty() {
            tracing::debug!(username = %federated.username, "No roles to migrate for user");
            return Ok(Vec::new());
        }

        let mut granted = Vec::with_capacity(desired.len());
        for name in &desired {
            let Some(group) = self.resolver.resolve(realm, name, &local.username).await? else {
                continue;
            };

            self.memberships
                .join_group(realm.id, &local.id, &group)
                .await?;
            tracing::debug!(role = %name, username = %local.username, "Granted group");
            granted.push(group.name);
        }

        Ok(granted)
    }

    async fn rollback(&self, ctx: &FederationErrorContext, local_id: Uuid) {
        match self.users.remove_local(ctx.realm_id, local_id).await {
            Ok(()) => tracing::warn!(
                operation = ctx.operation,
                username = ?ctx.username,
                id = %local_id,
                "Promotion failed, removed partially created local user"
            ),
            Err(e) => tracing::error!(
                operation = ctx.operation,
                username = ?ctx.username,
                id = %local_id,
                error = %e,
                "Promotion failed and the partially created local user could not be removed"
            ),
        }
    }
}

impl std::fmt::Debug for IdentityPromoter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityPromoter")
            .field("roles_attribute", &self.roles_attribute)
            .field("guard_existing", &self.guard_existing)
            .finish_non_exhaustive()
    }
}
