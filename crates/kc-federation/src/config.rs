//! Sync configuration.
//!
//! Configuration can be built in code with [`SyncConfig::builder`],
//! deserialized with serde, or read from a provider component's
//! string-keyed config map with [`SyncConfig::from_provider_config`].

use std::collections::HashMap;

use kc_model::GroupPath;
use serde::{Deserialize, Serialize};

use crate::error::{FederationError, FederationResult};

/// Default name of the attribute listing desired groups.
pub const DEFAULT_ROLES_ATTRIBUTE: &str = "roles";

/// Provider config keys.
pub mod keys {
    /// Attribute holding the comma-separated group list.
    pub const ROLES_ATTRIBUTE: &str = "roles.attribute";
    /// Parent path under which role groups are resolved.
    pub const GROUP_PARENT_PATH: &str = "groups.parent.path";
    /// Whether an existing local user blocks promotion.
    pub const GUARD_EXISTING_USER: &str = "migration.guard.existing.user";
    /// Whether group memberships are reconciled on login.
    pub const SYNC_GROUPS_ON_LOGIN: &str = "sync.groups.on.login";
    /// Whether federated identities are promoted on login.
    pub const PROMOTE_ON_LOGIN: &str = "migration.on.login";
}

/// Configuration shared by the reconciler, the promoter and the login hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Attribute holding the comma-separated desired group list.
    pub roles_attribute: String,

    /// Parent path under which role groups are resolved (None = top level).
    pub group_parent_path: Option<GroupPath>,

    /// When set, a local user with the same username blocks promotion.
    pub guard_against_existing_local_user: bool,

    /// Run group reconciliation on login.
    pub sync_groups_on_login: bool,

    /// Run promotion on login.
    pub promote_on_login: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            roles_attribute: DEFAULT_ROLES_ATTRIBUTE.to_string(),
            group_parent_path: None,
            guard_against_existing_local_user: true,
            sync_groups_on_login: true,
            promote_on_login: true,
        }
    }
}

impl SyncConfig {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> SyncConfigBuilder {
        SyncConfigBuilder::new()
    }

    /// Reads configuration from a provider component config map.
    ///
    /// Missing keys keep their defaults.
    ///
    /// ## Errors
    ///
    /// Returns `FederationError::Configuration` for non-boolean flags, an
    /// empty attribute name, or a parent path not starting with `/`.
    pub fn from_provider_config(config: &HashMap<String, String>) -> FederationResult<Self> {
        let mut builder = Self::builder();

        if let Some(attribute) = config.get(keys::ROLES_ATTRIBUTE) {
            builder = builder.roles_attribute(attribute.trim());
        }
        if let Some(path) = config.get(keys::GROUP_PARENT_PATH) {
            let path = path.trim();
            if !path.starts_with('/') {
                return Err(FederationError::config(format!(
                    "{} must start with '/': '{path}'",
                    keys::GROUP_PARENT_PATH
                )));
            }
            builder = builder.group_parent_path(GroupPath::parse(path));
        }
        if let Some(guard) = parse_bool(config, keys::GUARD_EXISTING_USER)? {
            builder = builder.guard_against_existing_local_user(guard);
        }
        if let Some(sync) = parse_bool(config, keys::SYNC_GROUPS_ON_LOGIN)? {
            builder = builder.sync_groups_on_login(sync);
        }
        if let Some(promote) = parse_bool(config, keys::PROMOTE_ON_LOGIN)? {
            builder = builder.promote_on_login(promote);
        }

        let config = builder.build();
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// ## Errors
    ///
    /// Returns `FederationError::Configuration` if the roles attribute name
    /// is empty.
    pub fn validate(&self) -> FederationResult<()> {
        if self.roles_attribute.trim().is_empty() {
            return Err(FederationError::config("roles attribute name cannot be empty"));
        }
        Ok(())
    }
}

fn parse_bool(config: &HashMap<String, String>, key: &str) -> FederationResult<Option<bool>> {
    config
        .get(key)
        .map(|v| {
            v.trim()
                .parse::<bool>()
                .map_err(|_| FederationError::config(format!("{key} must be a boolean: '{v}'")))
        })
        .transpose()
}

/// Builder for SyncConfig.
#[derive(Debug, Default)]
pub struct SyncConfigBuilder {
    config: SyncConfig,
}

impl SyncConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the roles attribute name.
    #[must_use]
    pub fn roles_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.config.roles_attribute = attribute.into();
        self
    }

    /// Sets the parent path for group resolution.
    #[must_use]
    pub fn group_parent_path(mut self, path: GroupPath) -> Self {
        self.config.group_parent_path = if path.is_root() { None } else { Some(path) };
        self
    }

    /// Sets the existing-local-user guard.
    #[must_use]
    pub const fn guard_against_existing_local_user(mut self, guard: bool) -> Self {
        self.config.guard_against_existing_local_user = guard;
        self
    }

    /// Enables or disables reconciliation on login.
    #[must_use]
    pub const fn sync_groups_on_login(mut self, enabled: bool) -> Self {
        self.config.sync_groups_on_login = enabled;
        self
    }

    /// Enables or disables promotion on login.
    #[must_use]
    pub const fn promote_on_login(mut self, enabled: bool) -> Self {
        self.config.promote_on_login = enabled;
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> SyncConfig {
        self.config
    }
}
