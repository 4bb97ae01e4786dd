//! Group domain model.
//!
//! Groups are named, optionally nested containers of identities within a
//! realm. Membership is what the roles attribute drives.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A group within a realm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Unique identifier.
    pub id: Uuid,
    /// Group name, unique among its siblings.
    pub name: String,
    /// Realm this group belongs to.
    pub realm_id: Uuid,
    /// Parent group ID (None for top-level groups).
    pub parent_id: Option<Uuid>,
    /// When the group was created.
    pub created_at: DateTime<Utc>,
}

impl Group {
    /// Creates a new top-level group.
    #[must_use]
    pub fn new(realm_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            realm_id,
            parent_id: None,
            created_at: Utc::now(),
        }
    }

    /// Creates a new child group.
    #[must_use]
    pub fn new_child(realm_id: Uuid, parent_id: Uuid, name: impl Into<String>) -> Self {
        let mut group = Self::new(realm_id, name);
        group.parent_id = Some(parent_id);
        group
    }
}

/// Parent path used to scope group lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GroupPath {
    /// Path segments from root to leaf.
    pub segments: Vec<String>,
}

impl GroupPath {
    /// Returns the root path (no segments).
    #[must_use]
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Parses a group path string (e.g., "/parent/child/grandchild").
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let segments: Vec<String> = path
            .trim_start_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Self { segments }
    }

    /// Returns the path extended by one segment.
    #[must_use]
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.into());
        Self { segments }
    }

    /// Returns the path as a string.
    #[must_use]
    pub fn to_path_string(&self) -> String {
        if self.segments.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", self.segments.join("/"))
        }
    }

    /// Returns true for the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for GroupPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_path_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_level_group_creation() {
        let realm_id = Uuid::now_v7();
        let group = Group::new(realm_id, "admins");

        assert_eq!(group.name, "admins");
        assert_eq!(group.parent_id, None);
    }

    #[test]
    fn child_group_creation() {
        let realm_id = Uuid::now_v7();
        let parent_id = Uuid::now_v7();
        let group = Group::new_child(realm_id, parent_id, "developers");

        assert_eq!(group.parent_id, Some(parent_id));
    }

    #[test]
    fn group_path_parsing() {
        let path = GroupPath::parse("/org/team/");

        assert_eq!(path.segments, vec!["org", "team"]);
        assert_eq!(path.to_string(), "/org/team");
        assert_eq!(path.child("dev").to_string(), "/org/team/dev");
    }

    #[test]
    fn root_path() {
        let root = GroupPath::parse("/");
        assert!(root.is_root());
        assert_eq!(root, GroupPath::root());
        assert_eq!(root.to_string(), "/");
    }
}
