//! ruledepot core - the guided rule model
//!
//! This crate provides the data structures shared across the ruledepot workspace:
//! - The rule model (header, attributes, metadata, LHS patterns, RHS actions)
//! - Visitor traits that dispatch over the closed pattern and action variants
//! - Error types

pub mod ast;
pub mod error;

// Re-export commonly used types
pub use ast::{Action, Pattern, RuleModel};
pub use error::CoreError;
