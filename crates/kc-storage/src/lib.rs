//! # kc-storage
//!
//! Collaborator traits the federation sync core calls through.
//!
//! ## Provider Traits
//!
//! - [`GroupDirectory`] - group lookup by name
//! - [`MembershipProvider`] - membership read/join/leave
//! - [`LocalUserProvider`] - create and query local identities
//! - [`CredentialProvider`] - credential installation

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod credential;
pub mod error;
pub mod group;
pub mod membership;
pub mod user;

pub use credential::CredentialProvider;
pub use error::{StorageError, StorageResult};
pub use group::GroupDirectory;
pub use membership::MembershipProvider;
pub use user::LocalUserProvider;
