//! Common test utilities and fixtures.

use std::sync::Arc;

use kc_federation::{LoginSync, SyncCollaborators, SyncConfig};
use kc_model::{Group, GroupPath, Identity, Realm};
use kc_storage_memory::InMemoryStore;

/// Test environment: an in-memory backend, a realm and a login hook.
pub struct TestEnv {
    /// Backing store.
    pub store: Arc<InMemoryStore>,
    /// Realm all fixtures live in.
    pub realm: Realm,
    /// Login hook under test.
    pub login: LoginSync,
}

impl TestEnv {
    /// Creates an environment with the default configuration.
    pub fn new() -> anyhow::Result<Self> {
        Self::with_config(&SyncConfig::default())
    }

    /// Creates an environment with the given configuration.
    pub fn with_config(config: &SyncConfig) -> anyhow::Result<Self> {
        // Initialize tracing for tests
        let _ = tracing_subscriber::fmt()
            .with_env_filter("kc_federation=debug")
            .with_test_writer()
            .try_init();

        let store = Arc::new(InMemoryStore::new());
        let realm = Realm::new("corp");
        let login = LoginSync::new(&SyncCollaborators::from_store(Arc::clone(&store)), config);

        Ok(Self {
            store,
            realm,
            login,
        })
    }

    /// Registers top-level groups.
    pub fn groups(&self, names: &[&str]) -> anyhow::Result<Vec<Group>> {
        names
            .iter()
            .map(|name| self.store.add_group(self.realm.id, name))
            .collect::<Result<_, _>>()
            .map_err(anyhow::Error::from)
    }

    /// Registers groups under a parent path.
    pub fn groups_at(&self, parent: &str, names: &[&str]) -> anyhow::Result<Vec<Group>> {
        let parent = GroupPath::parse(parent);
        names
            .iter()
            .map(|name| self.store.add_group_at(self.realm.id, &parent, name))
            .collect::<Result<_, _>>()
            .map_err(anyhow::Error::from)
    }

    /// Builds a federated identity as the external directory would materialize it.
    pub fn federated(&self, raw_id: &str, username: &str, roles: &str) -> anyhow::Result<Identity> {
        Ok(Identity::from_raw_id(self.realm.id, raw_id, username)?
            .with_email(format!("{username}@example.com"))
            .with_first_name(username.to_uppercase())
            .with_last_name("Federated")
            .with_attribute("roles", roles))
    }

    /// Returns the local identity with the given username.
    pub fn local(&self, username: &str) -> Option<Identity> {
        self.store
            .local_users(self.realm.id)
            .into_iter()
            .find(|u| u.username == username)
    }
}
