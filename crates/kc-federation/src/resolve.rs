//! Group name resolution shared by the reconciler and the promoter.

use std::sync::Arc;

use kc_model::{Group, GroupPath, Realm};
use kc_storage::GroupDirectory;

use crate::error::FederationResult;

/// Resolves desired role names to groups.
///
/// A name that does not resolve is not an error: it is logged at warning
/// level and reported as `None`. Directory failures propagate.
#[derive(Clone)]
pub(crate) struct GroupResolver {
    directory: Arc<dyn GroupDirectory>,
    parent_path: Option<GroupPath>,
}

impl GroupResolver {
    pub(crate) fn new(directory: Arc<dyn GroupDirectory>, parent_path: Option<GroupPath>) -> Self {
        Self {
            directory,
            parent_path,
        }
    }

    pub(crate) async fn resolve(
        &self,
        realm: &Realm,
        name: &str,
        username: &str,
    ) -> FederationResult<Option<Group>> {
        let group = self
            .directory
            .resolve_group(realm.id, self.parent_path.as_ref(), name)
            .await?;

        if group.is_none() {
            tracing::warn!(
                role = %name,
                username = %username,
                realm = %realm.name,
                parent = ?self.parent_path.as_ref().map(GroupPath::to_path_string),
                "Group not found for role"
            );
        }

        Ok(group)
    }
}
