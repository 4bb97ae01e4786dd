//! # kc-federation
//!
//! Attribute-driven group sync and federated-to-local promotion.
//!
//! - [`GroupReconciler`] converges an identity's group memberships to the
//!   comma-separated list in its roles attribute.
//! - [`IdentityPromoter`] copies a federated identity, the credential it
//!   logged in with, and its roles into a new local record.
//! - [`LoginSync`] runs both, in that order, for one login event.
//!
//! Both components call storage only through the `kc-storage` traits
//! bundled in [`SyncCollaborators`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod collaborators;
pub mod config;
pub mod error;
pub mod login;
pub mod promote;
pub mod reconcile;
pub mod roles;

mod resolve;

pub use collaborators::SyncCollaborators;
pub use config::{SyncConfig, SyncConfigBuilder};
pub use error::{FederationError, FederationResult};
pub use login::{LoginSync, LoginSyncOutcome};
pub use promote::{IdentityPromoter, PromotionOutcome};
pub use reconcile::{GroupReconciler, ReconcileReport};
pub use roles::DesiredRoleSet;
