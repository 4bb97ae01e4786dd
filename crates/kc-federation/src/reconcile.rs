//! Group membership reconciliation.
//!
//! Converges an identity's group memberships to the set declared by its
//! roles attribute with the minimal number of leaves and joins. Groups
//! are compared by name, so two groups with the same name in different
//! scopes are indistinguishable here.

use std::collections::HashSet;
use std::sync::Arc;

use kc_model::{Identity, Realm};
use kc_storage::MembershipProvider;
use serde::{Deserialize, Serialize};

use crate::collaborators::SyncCollaborators;
use crate::config::SyncConfig;
use crate::error::FederationResult;
use crate::resolve::GroupResolver;
use crate::roles::DesiredRoleSet;

/// Membership changes issued by one reconcile call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
    /// Groups joined, in the order they were joined.
    pub joined: Vec<String>,
    /// Groups left, in the order they were left.
    pub left: Vec<String>,
}

impl ReconcileReport {
    /// Returns true if no membership changed.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.joined.is_empty() && self.left.is_empty()
    }

    /// Returns the total number of joins and leaves.
    #[must_use]
    pub fn changes(&self) -> usize {
        self.joined.len() + self.left.len()
    }
}

/// Reconciles group memberships against the roles attribute.
#[derive(Clone)]
pub struct GroupReconciler {
    resolver: GroupResolver,
    memberships: Arc<dyn MembershipProvider>,
    roles_attribute: String,
}

impl GroupReconciler {
    /// Creates a reconciler.
    #[must_use]
    pub fn new(collaborators: &SyncCollaborators, config: &SyncConfig) -> Self {
        Self {
            resolver: GroupResolver::new(
                Arc::clone(&collaborators.directory),
                config.group_parent_path.clone(),
            ),
            memberships: Arc::clone(&collaborators.memberships),
            roles_attribute: config.roles_attribute.clone(),
        }
    }

    /// Converges the identity's memberships to its desired role set.
    ///
    /// Groups whose names are not desired are left first; desired groups
    /// not yet held are then resolved and joined. A desired name that does
    /// not resolve is skipped with a warning.
    ///
    /// ## Errors
    ///
    /// Any directory or membership store failure aborts the call. Changes
    /// issued before the failure are not rolled back.
    pub async fn reconcile(
        &self,
        realm: &Realm,
        identity: &Identity,
    ) -> FederationResult<ReconcileReport> {
        let desired = DesiredRoleSet::from_identity(identity, &self.roles_attribute);
        tracing::debug!(
            username = %identity.username,
            desired = desired.len(),
            "Syncing groups for user"
        );

        let current = self
            .memberships
            .current_groups(realm.id, &identity.id)
            .await?;
        let current_names: HashSet<&str> = current.iter().map(|g| g.name.as_str()).collect();

        let mut report = ReconcileReport::default();

        for group in current.iter().filter(|g| !desired.contains(&g.name)) {
            self.memberships
                .leave_group(realm.id, &identity.id, group)
                .await?;
            tracing::debug!(group = %group.name, username = %identity.username, "Left group");
            report.left.push(group.name.clone());
        }

        for name in desired.iter().filter(|n| !current_names.contains(n)) {
            let Some(group) = self.resolver.resolve(realm, name, &identity.username).await? else {
                continue;
            };

            self.memberships
                .join_group(realm.id, &identity.id, &group)
                .await?;
            tracing::debug!(group = %name, username = %identity.username, "Joined group");
            report.joined.push(group.name);
        }

        tracing::debug!(
            username = %identity.username,
            changes = report.changes(),
            "Group sync finished"
        );
        Ok(report)
    }
}

impl std::fmt::Debug for GroupReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupReconciler")
            .field("roles_attribute", &self.roles_attribute)
            .finish_non_exhaustive()
    }
}
