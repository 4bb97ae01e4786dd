//! Login hook.
//!
//! Runs group reconciliation and then promotion for one successful
//! authentication of a federated (or local) identity.

use kc_model::{CredentialInput, Identity, Realm};
use serde::{Deserialize, Serialize};

use crate::collaborators::SyncCollaborators;
use crate::config::SyncConfig;
use crate::error::FederationResult;
use crate::promote::{IdentityPromoter, PromotionOutcome};
use crate::reconcile::{GroupReconciler, ReconcileReport};

/// What a login sync did. `None` means the stage is disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginSyncOutcome {
    /// Result of group reconciliation.
    pub reconcile: Option<ReconcileReport>,
    /// Result of promotion.
    pub promotion: Option<PromotionOutcome>,
}

impl LoginSyncOutcome {
    /// Returns true if a local record was created.
    #[must_use]
    pub fn promoted(&self) -> bool {
        self.promotion
            .as_ref()
            .is_some_and(PromotionOutcome::is_promoted)
    }
}

/// Composes the reconciler and the promoter for a login event.
#[derive(Debug, Clone)]
pub struct LoginSync {
    reconciler: GroupReconciler,
    promoter: IdentityPromoter,
    sync_groups: bool,
    promote: bool,
}

impl LoginSync {
    /// Creates a login hook.
    #[must_use]
    pub fn new(collaborators: &SyncCollaborators, config: &SyncConfig) -> Self {
        Self {
            reconciler: GroupReconciler::new(collaborators, config),
            promoter: IdentityPromoter::new(collaborators, config),
            sync_groups: config.sync_groups_on_login,
            promote: config.promote_on_login,
        }
    }

    /// Handles a successful authentication.
    ///
    /// Reconciliation runs before promotion, and only for federated
    /// identities: a local record does not carry the roles attribute, so
    /// its memberships are managed elsewhere.
    ///
    /// ## Errors
    ///
    /// A reconcile failure aborts the sync before promotion is attempted;
    /// a promotion failure is returned as is. The caller should fail the
    /// login in both cases.
    pub async fn on_login(
        &self,
        realm: &Realm,
        identity: &Identity,
        credential: &CredentialInput,
    ) -> FederationResult<LoginSyncOutcome> {
        let mut outcome = LoginSyncOutcome::default();

        if self.sync_groups && identity.is_federated() {
            outcome.reconcile = Some(self.reconciler.reconcile(realm, identity).await?);
        }
        if self.promote {
            outcome.promotion = Some(self.promoter.promote(realm, identity, credential).await?);
        }

        Ok(outcome)
    }
}
