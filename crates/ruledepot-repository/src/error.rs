//! Error types for the repository layer

use crate::models::ItemKind;
use ruledepot_compiler::MarshalError;
use ruledepot_core::CoreError;
use thiserror::Error;

/// Result type alias for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors that can occur during repository operations
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Unrecognized path shape or verb
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Package or asset absent from the store
    #[error("Not found: {path}")]
    NotFound { path: String },

    /// Package or asset already present
    #[error("Already exists: {path}")]
    AlreadyExists { path: String },

    /// Stale write; names whoever committed last
    #[error("The {kind} was modified by: {contributor}, unable to write changes.")]
    Conflict { kind: ItemKind, contributor: String },

    /// Operation the repository does not provide
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Malformed percent-encoding in a path segment
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Marshaller failure while rendering source
    #[error("Marshal error: {0}")]
    Marshal(#[from] MarshalError),

    /// Stored rule model could not be decoded
    #[error("Rule model error: {0}")]
    Model(#[from] CoreError),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration loading error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Store-internal failure
    #[error("Store error: {0}")]
    Store(String),
}

impl RepositoryError {
    pub(crate) fn not_found(path: impl Into<String>) -> Self {
        RepositoryError::NotFound { path: path.into() }
    }

    pub(crate) fn already_exists(path: impl Into<String>) -> Self {
        RepositoryError::AlreadyExists { path: path.into() }
    }

    pub(crate) fn conflict(kind: ItemKind, contributor: impl Into<String>) -> Self {
        RepositoryError::Conflict {
            kind,
            contributor: contributor.into(),
        }
    }

    /// Whether this error is a stale-write conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, RepositoryError::Conflict { .. })
    }
}
