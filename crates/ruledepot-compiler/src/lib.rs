//! ruledepot compiler - rule model to DRL source
//!
//! This crate renders a [`RuleModel`](ruledepot_core::RuleModel) into rule-language
//! source text. Rendering is a pure function of the model; converting source text
//! back into a model is not supported.

pub mod codegen;
pub mod error;
pub mod marshaller;

// Re-export main types
pub use error::{MarshalError, Result};
pub use marshaller::{DrlMarshaller, RulePersistence};

// Re-export codegen types
pub use codegen::{DrlWriter, LhsPatternRenderer, RhsActionRenderer, RuleRenderer};
