//! Core error types.

use thiserror::Error;

/// Errors raised by the catalog and the configuration manager.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Entity identity is not a positive integer.
    #[error("invalid identity {0}: must be an integer >= 1")]
    InvalidIdentity(i64),

    /// Config version is not a non-negative integer.
    #[error("invalid version {0}: must be an integer >= 0")]
    InvalidVersion(i64),

    /// Config status code is neither INACTIVE nor ACTIVE.
    #[error("invalid status {0}: expected 0 (inactive) or 1 (active)")]
    InvalidStatus(i64),

    /// An entity with this identity already exists.
    #[error("entity with identity {0} already exists")]
    DuplicateIdentity(i64),

    /// A config with this version already exists.
    #[error("config with version {0} already exists")]
    DuplicateVersion(i64),

    /// No entity with this identity exists.
    #[error("entity with identity {0} not found")]
    IdentityNotFound(i64),

    /// No config with this version exists.
    #[error("config with version {0} not found")]
    ConfigNotFound(i64),

    /// An active config is already present.
    #[error("config version {active} is already active")]
    ActiveAlreadyExists { active: i64 },

    /// The active config cannot be removed.
    #[error("cannot remove active config version {0}")]
    CannotRemoveActive(i64),

    /// A field that may not change through this operation was changed.
    #[error("field '{field}' cannot be modified by update")]
    ImmutableFieldViolation { field: &'static str },
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
