//! In-memory store.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use kc_model::{CredentialInput, Group, GroupPath, Identity, IdentityId};
use kc_storage::error::{StorageError, StorageResult};
use kc_storage::{CredentialProvider, GroupDirectory, LocalUserProvider, MembershipProvider};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::fault::FailPoint;

/// A mutating call recorded by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOperation {
    /// An identity joined a group.
    Join {
        /// Identity that joined.
        identity_id: IdentityId,
        /// Group name.
        group: String,
    },
    /// An identity left a group.
    Leave {
        /// Identity that left.
        identity_id: IdentityId,
        /// Group name.
        group: String,
    },
    /// A local identity was created.
    CreateLocal {
        /// Username of the new identity.
        username: String,
    },
    /// A local identity was removed.
    RemoveLocal {
        /// Id of the removed identity.
        id: Uuid,
    },
    /// A credential was installed.
    InstallCredential {
        /// Id of the identity receiving the credential.
        user_id: Uuid,
    },
}

impl StoreOperation {
    /// Checks if this operation changed a group membership.
    #[must_use]
    pub const fn is_membership_change(&self) -> bool {
        matches!(self, Self::Join { .. } | Self::Leave { .. })
    }
}

#[derive(Debug, Default)]
struct State {
    groups: HashMap<Uuid, Group>,
    users: HashMap<Uuid, Identity>,
    memberships: HashMap<(Uuid, IdentityId), Vec<Uuid>>,
    credentials: HashMap<Uuid, Vec<CredentialInput>>,
    operations: Vec<StoreOperation>,
    armed: HashSet<FailPoint>,
}

impl State {
    fn trip(&mut self, point: FailPoint) -> StorageResult<()> {
        if self.armed.remove(&point) {
            return Err(point.error());
        }
        Ok(())
    }

    fn find_group(&self, realm_id: Uuid, parent_id: Option<Uuid>, name: &str) -> Option<&Group> {
        self.groups
            .values()
            .find(|g| g.realm_id == realm_id && g.parent_id == parent_id && g.name == name)
    }

    /// Walks a path from the top level, returning the id of its last segment.
    ///
    /// `Ok(None)` is the root; `Err(())` means a segment is missing.
    fn walk(&self, realm_id: Uuid, path: &GroupPath) -> Result<Option<Uuid>, ()> {
        let mut current = None;
        for segment in &path.segments {
            let group = self.find_group(realm_id, current, segment).ok_or(())?;
            current = Some(group.id);
        }
        Ok(current)
    }
}

/// Thread-safe in-memory implementation of all storage traits.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a top-level group.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::Duplicate` if a top-level group with the same
    /// name exists.
    pub fn add_group(&self, realm_id: Uuid, name: &str) -> StorageResult<Group> {
        self.add_group_at(realm_id, &GroupPath::root(), name)
    }

    /// Registers a group under an existing parent path.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFoundByName` if the parent path does not
    /// exist and `StorageError::Duplicate` if a sibling with the same name
    /// exists.
    pub fn add_group_at(
        &self,
        realm_id: Uuid,
        parent: &GroupPath,
        name: &str,
    ) -> StorageResult<Group> {
        let mut state = self.state.write();
        let parent_id = state
            .walk(realm_id, parent)
            .map_err(|()| StorageError::not_found_by_name("Group", parent.to_path_string()))?;

        if state.find_group(realm_id, parent_id, name).is_some() {
            return Err(StorageError::duplicate(
                "Group",
                "name",
                parent.child(name).to_path_string(),
            ));
        }

        let group = match parent_id {
            Some(parent_id) => Group::new_child(realm_id, parent_id, name),
            None => Group::new(realm_id, name),
        };
        state.groups.insert(group.id, group.clone());
        Ok(group)
    }

    /// Inserts an existing local identity.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::InvalidData` for federated identities and
    /// `StorageError::Duplicate` if the username is taken.
    pub fn insert_local(&self, identity: Identity) -> StorageResult<()> {
        let Some(id) = identity.id.local_id() else {
            return Err(StorageError::InvalidData(format!(
                "identity '{}' is not local",
                identity.id
            )));
        };

        let mut state = self.state.write();
        if username_taken(&state, identity.realm_id, &identity.username) {
            return Err(StorageError::duplicate(
                "Identity",
                "username",
                identity.username,
            ));
        }
        state.users.insert(id, identity);
        Ok(())
    }

    /// Adds a membership directly, bypassing operation recording.
    ///
    /// Used to seed the memberships a federated identity already has.
    pub fn seed_membership(&self, realm_id: Uuid, identity_id: &IdentityId, group: &Group) {
        let mut state = self.state.write();
        let entry = state
            .memberships
            .entry((realm_id, identity_id.clone()))
            .or_default();
        if !entry.contains(&group.id) {
            entry.push(group.id);
        }
    }

    /// Arms a fail point; the next matching call returns a connection error.
    pub fn fail_next(&self, point: FailPoint) {
        self.state.write().armed.insert(point);
    }

    /// Returns the names of the groups an identity belongs to, sorted.
    #[must_use]
    pub fn group_names(&self, realm_id: Uuid, identity_id: &IdentityId) -> Vec<String> {
        let state = self.state.read();
        let mut names: Vec<String> = state
            .memberships
            .get(&(realm_id, identity_id.clone()))
            .into_iter()
            .flatten()
            .filter_map(|id| state.groups.get(id))
            .map(|g| g.name.clone())
            .collect();
        names.sort();
        names
    }

    /// Returns all local identities in a realm.
    #[must_use]
    pub fn local_users(&self, realm_id: Uuid) -> Vec<Identity> {
        self.state
            .read()
            .users
            .values()
            .filter(|u| u.realm_id == realm_id)
            .cloned()
            .collect()
    }

    /// Returns the credentials held by a local identity.
    #[must_use]
    pub fn credentials(&self, user_id: Uuid) -> Vec<CredentialInput> {
        self.state
            .read()
            .credentials
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns the recorded mutating calls in order.
    #[must_use]
    pub fn operations(&self) -> Vec<StoreOperation> {
        self.state.read().operations.clone()
    }

    /// Clears the recorded calls.
    pub fn clear_operations(&self) {
        self.state.write().operations.clear();
    }
}

fn username_taken(state: &State, realm_id: Uuid, username: &str) -> bool {
    state
        .users
        .values()
        .any(|u| u.realm_id == realm_id && u.username == username)
}

#[async_trait]
impl GroupDirectory for InMemoryStore {
    async fn resolve_group(
        &self,
        realm_id: Uuid,
        parent: Option<&GroupPath>,
        name: &str,
    ) -> StorageResult<Option<Group>> {
        let mut state = self.state.write();
        state.trip(FailPoint::ResolveGroup)?;

        let parent_id = match parent {
            Some(path) => match state.walk(realm_id, path) {
                Ok(id) => id,
                Err(()) => return Ok(None),
            },
            None => None,
        };

        Ok(state.find_group(realm_id, parent_id, name).cloned())
    }
}

#[async_trait]
impl MembershipProvider for InMemoryStore {
    async fn current_groups(
        &self,
        realm_id: Uuid,
        identity_id: &IdentityId,
    ) -> StorageResult<Vec<Group>> {
        let mut state = self.state.write();
        state.trip(FailPoint::CurrentGroups)?;

        let groups = state
            .memberships
            .get(&(realm_id, identity_id.clone()))
            .into_iter()
            .flatten()
            .filter_map(|id| state.groups.get(id))
            .cloned()
            .collect();
        Ok(groups)
    }

    async fn join_group(
        &self,
        realm_id: Uuid,
        identity_id: &IdentityId,
        group: &Group,
    ) -> StorageResult<()> {
        let mut state = self.state.write();
        state.trip(FailPoint::JoinGroup)?;

        if !state.groups.contains_key(&group.id) {
            return Err(StorageError::not_found("Group", group.id));
        }
        if let IdentityId::Local { id } = identity_id {
            if !state.users.contains_key(id) {
                return Err(StorageError::not_found("Identity", *id));
            }
        }

        let entry = state
            .memberships
            .entry((realm_id, identity_id.clone()))
            .or_default();
        if entry.contains(&group.id) {
            return Ok(());
        }
        entry.push(group.id);

        state.operations.push(StoreOperation::Join {
            identity_id: identity_id.clone(),
            group: group.name.clone(),
        });
        Ok(())
    }

    async fn leave_group(
        &self,
        realm_id: Uuid,
        identity_id: &IdentityId,
        group: &Group,
    ) -> StorageResult<()> {
        let mut state = self.state.write();
        state.trip(FailPoint::LeaveGroup)?;

        let Some(entry) = state.memberships.get_mut(&(realm_id, identity_id.clone())) else {
            return Ok(());
        };
        let before = entry.len();
        entry.retain(|id| *id != group.id);
        if entry.len() == before {
            return Ok(());
        }

        state.operations.push(StoreOperation::Leave {
            identity_id: identity_id.clone(),
            group: group.name.clone(),
        });
        Ok(())
    }
}

#[async_trait]
impl LocalUserProvider for InMemoryStore {
    async fn create_local(&self, realm_id: Uuid, username: &str) -> StorageResult<Identity> {
        let mut state = self.state.write();
        state.trip(FailPoint::CreateLocal)?;

        if username_taken(&state, realm_id, username) {
            return Err(StorageError::duplicate("Identity", "username", username));
        }

        let identity = Identity::local(realm_id, username);
        if let Some(id) = identity.id.local_id() {
            state.users.insert(id, identity.clone());
        }
        state.operations.push(StoreOperation::CreateLocal {
            username: username.to_string(),
        });
        Ok(identity)
    }

    async fn find_by_username(
        &self,
        realm_id: Uuid,
        username: &str,
    ) -> StorageResult<Option<Identity>> {
        let mut state = self.state.write();
        state.trip(FailPoint::FindByUsername)?;

        Ok(state
            .users
            .values()
            .find(|u| u.realm_id == realm_id && u.username == username)
            .cloned())
    }

    async fn update_profile(&self, identity: &Identity) -> StorageResult<()> {
        let mut state = self.state.write();
        state.trip(FailPoint::UpdateProfile)?;

        let id = identity.id.local_id().ok_or_else(|| {
            StorageError::InvalidData(format!("identity '{}' is not local", identity.id))
        })?;
        let stored = state
            .users
            .get_mut(&id)
            .ok_or_else(|| StorageError::not_found("Identity", id))?;

        stored.email.clone_from(&identity.email);
        stored.first_name.clone_from(&identity.first_name);
        stored.last_name.clone_from(&identity.last_name);
        stored.enabled = identity.enabled;
        stored.updated_at = identity.updated_at;
        Ok(())
    }

    async fn remove_local(&self, realm_id: Uuid, id: Uuid) -> StorageResult<()> {
        let mut state = self.state.write();
        state.trip(FailPoint::RemoveLocal)?;

        if state.users.remove(&id).is_none() {
            return Err(StorageError::not_found("Identity", id));
        }
        state.credentials.remove(&id);
        state.memberships.remove(&(realm_id, IdentityId::local(id)));
        state.operations.push(StoreOperation::RemoveLocal { id });
        Ok(())
    }
}

#[async_trait]
impl CredentialProvider for InMemoryStore {
    async fn install_credential(
        &self,
        _realm_id: Uuid,
        user_id: Uuid,
        credential: &CredentialInput,
    ) -> StorageResult<()> {
        let mut state = self.state.write();
        state.trip(FailPoint::InstallCredential)?;

        if !state.users.contains_key(&user_id) {
            return Err(StorageError::not_found("Identity", user_id));
        }

        state.credentials.insert(user_id, vec![credential.clone()]);
        state
            .operations
            .push(StoreOperation::InstallCredential { user_id });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolves_top_level_and_nested_groups() {
        let store = InMemoryStore::new();
        let realm_id = Uuid::now_v7();
        let org = store.add_group(realm_id, "org").unwrap();
        let team = store
            .add_group_at(realm_id, &GroupPath::parse("/org"), "team")
            .unwrap();

        let found = store.resolve_group(realm_id, None, "org").await.unwrap();
        assert_eq!(found, Some(org));

        let nested = store
            .resolve_group(realm_id, Some(&GroupPath::parse("/org")), "team")
            .await
            .unwrap();
        assert_eq!(nested, Some(team));

        assert!(store
            .resolve_group(realm_id, None, "team")
            .await
            .unwrap()
            .is_none());
        assert!(store
            .resolve_group(realm_id, Some(&GroupPath::parse("/missing")), "team")
            .await
            .unwrap()
            .is_none());
    }

    #[test]
    fn rejects_duplicate_sibling_groups() {
        let store = InMemoryStore::new();
        let realm_id = Uuid::now_v7();
        store.add_group(realm_id, "admins").unwrap();

        let err = store.add_group(realm_id, "admins").unwrap_err();
        assert!(err.is_duplicate());

        let err = store
            .add_group_at(realm_id, &GroupPath::parse("/nowhere"), "x")
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn join_and_leave_are_recorded_once() {
        let store = InMemoryStore::new();
        let realm_id = Uuid::now_v7();
        let group = store.add_group(realm_id, "dev").unwrap();
        let id = IdentityId::federated("7");

        store.join_group(realm_id, &id, &group).await.unwrap();
        store.join_group(realm_id, &id, &group).await.unwrap();
        assert_eq!(store.group_names(realm_id, &id), vec!["dev"]);

        store.leave_group(realm_id, &id, &group).await.unwrap();
        store.leave_group(realm_id, &id, &group).await.unwrap();
        assert!(store.group_names(realm_id, &id).is_empty());

        let ops = store.operations();
        assert_eq!(ops.len(), 2);
        assert!(ops.iter().all(StoreOperation::is_membership_change));
    }

    #[tokio::test]
    async fn create_local_enforces_unique_username() {
        let store = InMemoryStore::new();
        let realm_id = Uuid::now_v7();

        let created = store.create_local(realm_id, "alice").await.unwrap();
        assert!(!created.is_federated());
        assert!(created.enabled);

        let err = store.create_local(realm_id, "alice").await.unwrap_err();
        assert!(err.is_duplicate());

        let other_realm = Uuid::now_v7();
        assert!(store.create_local(other_realm, "alice").await.is_ok());
    }

    #[tokio::test]
    async fn install_credential_replaces_existing() {
        let store = InMemoryStore::new();
        let realm_id = Uuid::now_v7();
        let user = store.create_local(realm_id, "alice").await.unwrap();
        let user_id = user.id.local_id().unwrap();

        store
            .install_credential(realm_id, user_id, &CredentialInput::password("one"))
            .await
            .unwrap();
        store
            .install_credential(realm_id, user_id, &CredentialInput::password("two"))
            .await
            .unwrap();

        let creds = store.credentials(user_id);
        assert_eq!(creds.len(), 1);
        assert_eq!(creds[0].value(), "two");
    }

    #[tokio::test]
    async fn fail_point_fires_once() {
        let store = InMemoryStore::new();
        let realm_id = Uuid::now_v7();
        store.fail_next(FailPoint::CreateLocal);

        let err = store.create_local(realm_id, "alice").await.unwrap_err();
        assert!(err.is_connection_error());
        assert!(store.create_local(realm_id, "alice").await.is_ok());
    }

    #[tokio::test]
    async fn remove_local_drops_credentials_and_memberships() {
        let store = InMemoryStore::new();
        let realm_id = Uuid::now_v7();
        let group = store.add_group(realm_id, "dev").unwrap();
        let user = store.create_local(realm_id, "alice").await.unwrap();
        let user_id = user.id.local_id().unwrap();

        store.join_group(realm_id, &user.id, &group).await.unwrap();
        store
            .install_credential(realm_id, user_id, &CredentialInput::password("pw"))
            .await
            .unwrap();
        store.remove_local(realm_id, user_id).await.unwrap();

        assert!(store.local_users(realm_id).is_empty());
        assert!(store.credentials(user_id).is_empty());
        assert!(store.group_names(realm_id, &user.id).is_empty());
        assert!(store
            .remove_local(realm_id, user_id)
            .await
            .unwrap_err()
            .is_not_found());
    }
}
