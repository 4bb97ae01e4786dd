//! Group directory trait.

use async_trait::async_trait;
use kc_model::{Group, GroupPath};
use uuid::Uuid;

use crate::error::StorageResult;

/// Read-only lookup of groups by name.
///
/// Implementations must be thread-safe and support concurrent access.
#[async_trait]
pub trait GroupDirectory: Send + Sync {
    /// Resolves a group by name under the given parent path.
    ///
    /// A `parent` of `None` (or the root path) looks among top-level groups.
    /// Returns `Ok(None)` when no such group exists; lookups never create
    /// groups.
    async fn resolve_group(
        &self,
        realm_id: Uuid,
        parent: Option<&GroupPath>,
        name: &str,
    ) -> StorageResult<Option<Group>>;
}
