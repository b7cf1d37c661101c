//! Rule model definitions
//!
//! This module contains the node definitions for:
//! - Rules (header, attributes, metadata)
//! - LHS patterns and field constraints
//! - RHS actions
//! - Free-form lines and DSL sentences shared by both sides
//! - Visitor traits used to traverse patterns and actions

pub mod action;
pub mod constraint;
pub mod dsl;
pub mod pattern;
pub mod rule;
pub mod visit;

pub use action::{
    Action, ActionCallMethod, ActionFieldValue, ActionGlobalCollectionAdd, ActionInsertFact,
    ActionRetractFact, ActionSetField, FieldNature,
};
pub use constraint::{
    CompositeFieldConstraint, ConnectiveConstraint, ConstraintValueType, FieldConstraint,
    JunctionType, SingleFieldConstraint,
};
pub use dsl::{DslSentence, FreeFormLine};
pub use pattern::{
    AccumulateExpression, CompositeFactPattern, CompositeType, FactPattern,
    FromAccumulateCompositeFactPattern, FromCollectCompositeFactPattern,
    FromCompositeFactPattern, Pattern,
};
pub use rule::{RuleAttribute, RuleMetadata, RuleModel};
pub use visit::{ActionVisitor, PatternVisitor};
