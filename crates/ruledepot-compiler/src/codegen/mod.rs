//! Code generation module
//!
//! This module contains the renderers that turn a rule model into DRL text.

pub mod action_codegen;
pub mod constraint_codegen;
pub mod pattern_codegen;
pub mod rule_codegen;
pub mod writer;

pub use action_codegen::RhsActionRenderer;
pub use pattern_codegen::LhsPatternRenderer;
pub use rule_codegen::RuleRenderer;
pub use writer::DrlWriter;
