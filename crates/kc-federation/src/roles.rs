//! Desired role set parsing.

use std::collections::btree_set;
use std::collections::BTreeSet;

use kc_model::Identity;

/// The set of group names declared by an identity's roles attribute.
///
/// Parsing splits on commas, trims each token and drops empty ones.
/// Names are compared case-sensitively. Iteration is in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesiredRoleSet {
    names: BTreeSet<String>,
}

impl DesiredRoleSet {
    /// Parses a raw attribute value. `None` and blank values yield the empty set.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let names = raw
            .into_iter()
            .flat_map(|value| value.split(','))
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect();

        Self { names }
    }

    /// Reads and parses the given attribute of an identity.
    ///
    /// Only the first attribute value is considered.
    #[must_use]
    pub fn from_identity(identity: &Identity, attribute: &str) -> Self {
        Self::parse(identity.get_first_attribute(attribute))
    }

    /// Checks if a group name is desired.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Returns the number of desired groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if no groups are desired.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates over the desired group names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<'a> IntoIterator for &'a DesiredRoleSet {
    type Item = &'a String;
    type IntoIter = btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}
