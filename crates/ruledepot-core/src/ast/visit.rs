//! Visitor traits over the pattern and action trees
//!
//! Each trait has one required method per variant and `accept` dispatches with an
//! exhaustive match, so adding a variant fails to compile until every visitor
//! handles it.

use super::action::{
    Action, ActionCallMethod, ActionGlobalCollectionAdd, ActionInsertFact, ActionRetractFact,
    ActionSetField,
};
use super::dsl::{DslSentence, FreeFormLine};
use super::pattern::{
    CompositeFactPattern, FactPattern, FromAccumulateCompositeFactPattern,
    FromCollectCompositeFactPattern, FromCompositeFactPattern, Pattern,
};

/// Visitor over LHS patterns
pub trait PatternVisitor {
    type Error;

    fn visit_fact_pattern(&mut self, pattern: &FactPattern) -> Result<(), Self::Error>;

    fn visit_composite_pattern(&mut self, pattern: &CompositeFactPattern)
        -> Result<(), Self::Error>;

    fn visit_from_pattern(&mut self, pattern: &FromCompositeFactPattern)
        -> Result<(), Self::Error>;

    fn visit_from_collect_pattern(
        &mut self,
        pattern: &FromCollectCompositeFactPattern,
    ) -> Result<(), Self::Error>;

    fn visit_from_accumulate_pattern(
        &mut self,
        pattern: &FromAccumulateCompositeFactPattern,
    ) -> Result<(), Self::Error>;

    fn visit_free_form_line(&mut self, line: &FreeFormLine) -> Result<(), Self::Error>;

    fn visit_dsl_sentence(&mut self, sentence: &DslSentence) -> Result<(), Self::Error>;
}

/// Visitor over RHS actions
pub trait ActionVisitor {
    type Error;

    fn visit_insert_fact(&mut self, action: &ActionInsertFact) -> Result<(), Self::Error>;

    fn visit_insert_logical_fact(&mut self, action: &ActionInsertFact)
        -> Result<(), Self::Error>;

    fn visit_set_field(&mut self, action: &ActionSetField) -> Result<(), Self::Error>;

    fn visit_call_method(&mut self, action: &ActionCallMethod) -> Result<(), Self::Error>;

    fn visit_update_field(&mut self, action: &ActionSetField) -> Result<(), Self::Error>;

    fn visit_retract_fact(&mut self, action: &ActionRetractFact) -> Result<(), Self::Error>;

    fn visit_global_collection_add(
        &mut self,
        action: &ActionGlobalCollectionAdd,
    ) -> Result<(), Self::Error>;

    fn visit_free_form_line(&mut self, line: &FreeFormLine) -> Result<(), Self::Error>;

    fn visit_dsl_sentence(&mut self, sentence: &DslSentence) -> Result<(), Self::Error>;
}

impl Pattern {
    /// Dispatch to the visitor method for this variant
    pub fn accept<V: PatternVisitor + ?Sized>(&self, visitor: &mut V) -> Result<(), V::Error> {
        match self {
            Pattern::Fact(p) => visitor.visit_fact_pattern(p),
            Pattern::Composite(p) => visitor.visit_composite_pattern(p),
            Pattern::From(p) => visitor.visit_from_pattern(p),
            Pattern::FromCollect(p) => visitor.visit_from_collect_pattern(p),
            Pattern::FromAccumulate(p) => visitor.visit_from_accumulate_pattern(p),
            Pattern::FreeFormLine(line) => visitor.visit_free_form_line(line),
            Pattern::DslSentence(sentence) => visitor.visit_dsl_sentence(sentence),
        }
    }
}

impl Action {
    /// Dispatch to the visitor method for this variant
    pub fn accept<V: ActionVisitor + ?Sized>(&self, visitor: &mut V) -> Result<(), V::Error> {
        match self {
            Action::InsertFact(a) => visitor.visit_insert_fact(a),
            Action::InsertLogicalFact(a) => visitor.visit_insert_logical_fact(a),
            Action::SetField(a) => visitor.visit_set_field(a),
            Action::CallMethod(a) => visitor.visit_call_method(a),
            Action::UpdateField(a) => visitor.visit_update_field(a),
            Action::RetractFact(a) => visitor.visit_retract_fact(a),
            Action::GlobalCollectionAdd(a) => visitor.visit_global_collection_add(a),
            Action::FreeFormLine(line) => visitor.visit_free_form_line(line),
            Action::DslSentence(sentence) => visitor.visit_dsl_sentence(sentence),
        }
    }
}
