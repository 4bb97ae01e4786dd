//! # kc-model
//!
//! Domain models for federated identity sync.
//!
//! - [`Identity`] and its typed [`IdentityId`] (federated or local)
//! - [`Group`] and [`GroupPath`]
//! - [`Realm`]
//! - [`CredentialInput`]

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod credential;
pub mod group;
pub mod identity;
pub mod realm;

pub use credential::{CredentialInput, CredentialType};
pub use group::{Group, GroupPath};
pub use identity::{Identity, IdentityId, IdentityIdError, FEDERATED_ID_PREFIX};
pub use realm::Realm;
