//! Marshaller error types

use thiserror::Error;

/// Marshaller error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarshalError {
    /// A pattern variant placed where it cannot be rendered
    #[error("Unsupported pattern {construct} for {context}")]
    UnsupportedPattern { construct: String, context: String },

    /// Source text cannot be turned back into a rule model
    #[error("Unmarshal not implemented: {0}")]
    Unmarshal(String),
}

impl MarshalError {
    pub(crate) fn unsupported_pattern(construct: &str, context: &str) -> Self {
        MarshalError::UnsupportedPattern {
            construct: construct.to_string(),
            context: context.to_string(),
        }
    }
}

/// Result type for marshaller operations
pub type Result<T> = std::result::Result<T, MarshalError>;
