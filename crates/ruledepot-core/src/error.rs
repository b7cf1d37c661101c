//! Error types for ruledepot core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    #[error("Invalid rule model: {0}")]
    InvalidModel(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
