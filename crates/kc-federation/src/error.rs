//! Federation error types.
//!
//! Only fatal conditions are errors. Expected outcomes (an identity that is
//! not federated, one that was already promoted, a role naming a group that
//! does not exist) are reported through return values and logs instead.

use kc_storage::StorageError;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during federation sync operations.
#[derive(Debug, Error)]
pub enum FederationError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An identity handed back by a collaborator is not usable.
    #[error("Invalid identity: {0}")]
    InvalidIdentity(String),

    /// Directory or store failure. Aborts the whole operation.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl FederationError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Creates an invalid identity error.
    #[must_use]
    pub fn invalid_identity(msg: impl Into<String>) -> Self {
        Self::InvalidIdentity(msg.into())
    }

    /// Checks if this error came from the directory or store.
    #[must_use]
    pub const fn is_storage_error(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    /// Checks if this is a uniqueness conflict raised by the store.
    ///
    /// Two first logins racing to promote the same username surface here.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_duplicate())
    }
}

/// Result type for federation operations.
pub type FederationResult<T> = Result<T, FederationError>;

/// Context attached to federation error logs.
#[derive(Debug, Clone)]
pub struct FederationErrorContext {
    /// Operation that failed (e.g., "promote").
    pub operation: &'static str,
    /// Realm ID.
    pub realm_id: Uuid,
    /// Username (if applicable).
    pub username: Option<String>,
}

impl FederationErrorContext {
    /// Creates a new error context.
    #[must_use]
    pub const fn new(operation: &'static str, realm_id: Uuid) -> Self {
        Self {
            operation,
            realm_id,
            username: None,
        }
    }

    /// Sets the username.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }
}
