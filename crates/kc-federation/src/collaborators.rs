//! Collaborator bundle.

use std::sync::Arc;

use kc_storage::{CredentialProvider, GroupDirectory, LocalUserProvider, MembershipProvider};

/// The storage collaborators the sync components call through.
///
/// Components receive their collaborators explicitly; nothing is looked up
/// from ambient session state.
#[derive(Clone)]
pub struct SyncCollaborators {
    /// Group lookup.
    pub directory: Arc<dyn GroupDirectory>,
    /// Membership read/mutation.
    pub memberships: Arc<dyn MembershipProvider>,
    /// Local identity store.
    pub users: Arc<dyn LocalUserProvider>,
    /// Credential store.
    pub credentials: Arc<dyn CredentialProvider>,
}

impl SyncCollaborators {
    /// Creates a bundle from individual collaborators.
    #[must_use]
    pub fn new(
        directory: Arc<dyn GroupDirectory>,
        memberships: Arc<dyn MembershipProvider>,
        users: Arc<dyn LocalUserProvider>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            directory,
            memberships,
            users,
            credentials,
        }
    }

    /// Creates a bundle from a single backend implementing every trait.
    #[must_use]
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: GroupDirectory + MembershipProvider + LocalUserProvider + CredentialProvider + 'static,
    {
        Self {
            directory: store.clone(),
            memberships: store.clone(),
            users: store.clone(),
            credentials: store,
        }
    }
}

impl std::fmt::Debug for SyncCollaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncCollaborators").finish_non_exhaustive()
    }
}
