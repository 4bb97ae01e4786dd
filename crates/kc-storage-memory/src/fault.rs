//! Fault injection points.

use kc_storage::StorageError;

/// A store call that can be made to fail once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
    /// `GroupDirectory::resolve_group`.
    ResolveGroup,
    /// `MembershipProvider::current_groups`.
    CurrentGroups,
    /// `MembershipProvider::join_group`.
    JoinGroup,
    /// `MembershipProvider::leave_group`.
    LeaveGroup,
    /// `LocalUserProvider::create_local`.
    CreateLocal,
    /// `LocalUserProvider::find_by_username`.
    FindByUsername,
    /// `LocalUserProvider::update_profile`.
    UpdateProfile,
    /// `LocalUserProvider::remove_local`.
    RemoveLocal,
    /// `CredentialProvider::install_credential`.
    InstallCredential,
}

impl FailPoint {
    /// Returns the operation name used in injected error messages.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::ResolveGroup => "resolve_group",
            Self::CurrentGroups => "current_groups",
            Self::JoinGroup => "join_group",
            Self::LeaveGroup => "leave_group",
            Self::CreateLocal => "create_local",
            Self::FindByUsername => "find_by_username",
            Self::UpdateProfile => "update_profile",
            Self::RemoveLocal => "remove_local",
            Self::InstallCredential => "install_credential",
        }
    }

    /// Builds the error returned when this point fires.
    #[must_use]
    pub fn error(&self) -> StorageError {
        StorageError::connection(format!("injected failure in {}", self.operation()))
    }
}
