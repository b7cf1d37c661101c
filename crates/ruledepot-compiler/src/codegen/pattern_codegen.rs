//! LHS pattern rendering
//!
//! Implements [`PatternVisitor`] over the rule's `when` section. Positions that
//! only accept some pattern variants (composite children, collect and
//! accumulate sources) reject the rest with [`MarshalError::UnsupportedPattern`].

use super::constraint_codegen::ConstraintRenderer;
use super::writer::DrlWriter;
use crate::error::{MarshalError, Result};
use ruledepot_core::ast::{
    AccumulateExpression, CompositeFactPattern, CompositeType, DslSentence, FactPattern,
    FreeFormLine, FromAccumulateCompositeFactPattern, FromCollectCompositeFactPattern,
    FromCompositeFactPattern, Pattern, PatternVisitor,
};

/// Renders LHS patterns into a [`DrlWriter`]
pub struct LhsPatternRenderer<'a> {
    out: &'a mut DrlWriter,
    dsl_enhanced: bool,
    indentation: String,
}

impl<'a> LhsPatternRenderer<'a> {
    pub fn new(out: &'a mut DrlWriter, dsl_enhanced: bool, indentation: impl Into<String>) -> Self {
        LhsPatternRenderer {
            out,
            dsl_enhanced,
            indentation: indentation.into(),
        }
    }

    fn begin_line(&mut self) {
        self.out.begin_line(&self.indentation, self.dsl_enhanced);
    }

    /// `[not |binding : ]Type( constraints)`
    fn render_fact(&mut self, pattern: &FactPattern) {
        if pattern.negated {
            self.out.push("not ");
        } else if let Some(bound_name) = &pattern.bound_name {
            self.out.push(bound_name).push(" : ");
        }
        self.out.push(&pattern.fact_type).push("( ");
        self.out
            .push(&ConstraintRenderer::render_all(&pattern.constraints));
        self.out.push(")");
    }

    fn render_optional_fact(&mut self, pattern: Option<&FactPattern>) {
        if let Some(fact) = pattern {
            self.render_fact(fact);
        }
    }

    /// Child of an `exists`/`not`/`or` composite
    fn render_composite_child(&mut self, child: &Pattern) -> Result<()> {
        match child {
            Pattern::Fact(fact) => {
                self.render_fact(fact);
                Ok(())
            }
            Pattern::FromAccumulate(p) => self.visit_from_accumulate_pattern(p),
            Pattern::FromCollect(p) => self.visit_from_collect_pattern(p),
            Pattern::From(p) => self.visit_from_pattern(p),
            other => Err(MarshalError::unsupported_pattern(
                other.kind_name(),
                "CompositeFactPattern",
            )),
        }
    }

    /// `exists (A and B) ` / `not (A and B) `
    fn render_composite_fol(&mut self, pattern: &CompositeFactPattern) -> Result<()> {
        self.out.push(pattern.composite_type.as_str()).push(" (");
        for (i, child) in pattern.patterns.iter().enumerate() {
            if i > 0 {
                self.out.push(" and ");
            }
            self.render_composite_child(child)?;
        }
        self.out.push(") \n");
        Ok(())
    }

    /// `( A or B )`
    fn render_composite_or(&mut self, pattern: &CompositeFactPattern) -> Result<()> {
        self.out.push("( ");
        for (i, child) in pattern.patterns.iter().enumerate() {
            if i > 0 {
                self.out.push(" or ");
            }
            self.render_composite_child(child)?;
        }
        self.out.push(" )\n");
        Ok(())
    }

    fn render_collect_source(&mut self, source: &Pattern) -> Result<()> {
        match source {
            Pattern::Fact(fact) => {
                self.render_fact(fact);
                Ok(())
            }
            Pattern::FromAccumulate(p) => self.visit_from_accumulate_pattern(p),
            Pattern::FromCollect(p) => self.visit_from_collect_pattern(p),
            Pattern::From(p) => self.visit_from_pattern(p),
            Pattern::FreeFormLine(line) => self.visit_free_form_line(line),
            other => Err(MarshalError::unsupported_pattern(
                other.kind_name(),
                "FromCollectCompositeFactPattern",
            )),
        }
    }

    fn render_accumulate_source(&mut self, source: &Pattern) -> Result<()> {
        match source {
            Pattern::Fact(fact) => {
                self.render_fact(fact);
                Ok(())
            }
            Pattern::FromAccumulate(p) => self.visit_from_accumulate_pattern(p),
            Pattern::FromCollect(p) => self.visit_from_collect_pattern(p),
            Pattern::From(p) => self.visit_from_pattern(p),
            other => Err(MarshalError::unsupported_pattern(
                other.kind_name(),
                "FromAccumulateCompositeFactPattern",
            )),
        }
    }

    fn render_accumulate_expression(&mut self, expression: &AccumulateExpression) {
        let indentation = &self.indentation;
        match expression {
            AccumulateExpression::Function { function } => {
                self.out.push(indentation).push("\t").push(function);
            }
            AccumulateExpression::Code {
                init,
                action,
                reverse,
                result,
            } => {
                self.out.push(indentation).push("\tinit( ").push(init).push(" ),\n");
                self.out
                    .push(indentation)
                    .push("\taction( ")
                    .push(action)
                    .push(" ),\n");
                if let Some(reverse) = reverse.as_deref().filter(|r| !r.trim().is_empty()) {
                    self.out
                        .push(indentation)
                        .push("\treverse( ")
                        .push(reverse)
                        .push(" ),\n");
                }
                self.out
                    .push(indentation)
                    .push("\tresult( ")
                    .push(result)
                    .push(" )\n");
            }
        }
    }
}

impl PatternVisitor for LhsPatternRenderer<'_> {
    type Error = MarshalError;

    fn visit_fact_pattern(&mut self, pattern: &FactPattern) -> Result<()> {
        self.begin_line();
        self.render_fact(pattern);
        self.out.push("\n");
        Ok(())
    }

    fn visit_composite_pattern(&mut self, pattern: &CompositeFactPattern) -> Result<()> {
        self.begin_line();
        match pattern.composite_type {
            CompositeType::Exists | CompositeType::Not => self.render_composite_fol(pattern),
            CompositeType::Or => self.render_composite_or(pattern),
        }
    }

    fn visit_from_pattern(&mut self, pattern: &FromCompositeFactPattern) -> Result<()> {
        self.begin_line();
        self.render_optional_fact(pattern.fact_pattern.as_ref());
        self.out
            .push(" from\n")
            .push(&self.indentation)
            .push("  ")
            .line(&pattern.expression);
        Ok(())
    }

    fn visit_from_collect_pattern(&mut self, pattern: &FromCollectCompositeFactPattern) -> Result<()> {
        self.begin_line();
        self.render_optional_fact(pattern.fact_pattern.as_ref());
        self.out.push(" from collect ( ");
        if let Some(source) = &pattern.right_pattern {
            self.render_collect_source(source)?;
        }
        self.out.push(") \n");
        Ok(())
    }

    fn visit_from_accumulate_pattern(
        &mut self,
        pattern: &FromAccumulateCompositeFactPattern,
    ) -> Result<()> {
        self.begin_line();
        self.render_optional_fact(pattern.fact_pattern.as_ref());
        self.out.push(" from accumulate ( ");
        if let Some(source) = &pattern.source_pattern {
            self.render_accumulate_source(source)?;
        }
        self.out.push(",\n");
        self.render_accumulate_expression(&pattern.expression);
        self.out.push(") \n");
        Ok(())
    }

    fn visit_free_form_line(&mut self, line: &FreeFormLine) -> Result<()> {
        self.begin_line();
        self.out.line(&line.text);
        Ok(())
    }

    fn visit_dsl_sentence(&mut self, sentence: &DslSentence) -> Result<()> {
        // DSL sentences never carry the `>` marker
        self.out.push(&self.indentation).push_display(sentence).push("\n");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ruledepot_core::ast::SingleFieldConstraint;

    fn render(pattern: impl Into<Pattern>, dsl: bool) -> Result<String> {
        let mut out = DrlWriter::new();
        let mut renderer = LhsPatternRenderer::new(&mut out, dsl, "\t\t");
        pattern.into().accept(&mut renderer)?;
        Ok(out.into_string())
    }

    fn person() -> FactPattern {
        FactPattern::new("Person").with_constraint(SingleFieldConstraint::literal("age", ">", "18"))
    }

    #[test]
    fn test_fact_pattern() {
        assert_eq!(
            render(person(), false).unwrap(),
            "\t\tPerson( age > \"18\" )\n"
        );
    }

    #[test]
    fn test_bound_and_negated_fact() {
        let bound = FactPattern::new("Person").bound_to("$p");
        assert_eq!(render(bound, false).unwrap(), "\t\t$p : Person( )\n");

        let negated = FactPattern::new("Person").bound_to("$p").negate();
        assert_eq!(render(negated, false).unwrap(), "\t\tnot Person( )\n");
    }

    #[test]
    fn test_dsl_enhanced_marker() {
        assert_eq!(
            render(FactPattern::new("Cheese"), true).unwrap(),
            "\t\t>Cheese( )\n"
        );
        assert_eq!(
            render(FreeFormLine::new("eval( true )"), true).unwrap(),
            "\t\t>eval( true )\n"
        );
        assert_eq!(
            render(DslSentence::new("There is a {person}"), true).unwrap(),
            "\t\tThere is a person\n"
        );
    }

    #[test]
    fn test_composite_exists() {
        let composite = CompositeFactPattern::new(CompositeType::Exists)
            .with_pattern(FactPattern::new("A"))
            .with_pattern(FactPattern::new("B"));
        assert_eq!(
            render(composite, false).unwrap(),
            "\t\texists (A( ) and B( )) \n"
        );
    }

    #[test]
    fn test_composite_or() {
        let composite = CompositeFactPattern::new(CompositeType::Or)
            .with_pattern(FactPattern::new("A"))
            .with_pattern(FactPattern::new("B"));
        assert_eq!(
            render(composite, false).unwrap(),
            "\t\t( A( ) or B( ) )\n"
        );
    }

    #[test]
    fn test_composite_rejects_free_form_child() {
        let composite = CompositeFactPattern::new(CompositeType::Not)
            .with_pattern(FreeFormLine::new("x"));
        let err = render(composite, false).unwrap_err();
        assert_eq!(
            err,
            MarshalError::UnsupportedPattern {
                construct: "FreeFormLine".to_string(),
                context: "CompositeFactPattern".to_string(),
            }
        );
    }

    #[test]
    fn test_from_pattern() {
        let from = FromCompositeFactPattern::new(FactPattern::new("Item"), "$order.items");
        assert_eq!(
            render(from, false).unwrap(),
            "\t\tItem( ) from\n\t\t  $order.items\n"
        );
    }

    #[test]
    fn test_from_collect_with_fact() {
        let collect = FromCollectCompositeFactPattern::new(
            FactPattern::new("ArrayList"),
            FactPattern::new("Item"),
        );
        assert_eq!(
            render(collect, false).unwrap(),
            "\t\tArrayList( ) from collect ( Item( )) \n"
        );
    }

    #[test]
    fn test_from_collect_with_free_form() {
        let collect = FromCollectCompositeFactPattern::new(
            FactPattern::new("ArrayList"),
            FreeFormLine::new("Item()"),
        );
        assert_eq!(
            render(collect, false).unwrap(),
            "\t\tArrayList( ) from collect ( \t\tItem()\n) \n"
        );
    }

    #[test]
    fn test_from_collect_rejects_dsl_sentence() {
        let collect = FromCollectCompositeFactPattern::new(
            FactPattern::new("ArrayList"),
            DslSentence::new("x"),
        );
        assert!(matches!(
            render(collect, false),
            Err(MarshalError::UnsupportedPattern { .. })
        ));
    }

    #[test]
    fn test_from_accumulate_function() {
        let acc = FromAccumulateCompositeFactPattern::new(
            FactPattern::new("Number"),
            FactPattern::new("Item"),
            AccumulateExpression::function("sum( $price )"),
        );
        assert_eq!(
            render(acc, false).unwrap(),
            "\t\tNumber( ) from accumulate ( Item( ),\n\t\t\tsum( $price )) \n"
        );
    }

    #[test]
    fn test_from_accumulate_code() {
        let acc = FromAccumulateCompositeFactPattern::new(
            FactPattern::new("Number"),
            FactPattern::new("Item"),
            AccumulateExpression::Code {
                init: "int t = 0;".to_string(),
                action: "t++;".to_string(),
                reverse: Some("t--;".to_string()),
                result: "t".to_string(),
            },
        );
        let expected = "\t\tNumber( ) from accumulate ( Item( ),\n\
                        \t\t\tinit( int t = 0; ),\n\
                        \t\t\taction( t++; ),\n\
                        \t\t\treverse( t--; ),\n\
                        \t\t\tresult( t )\n\
                        ) \n";
        assert_eq!(render(acc, false).unwrap(), expected);
    }

    #[test]
    fn test_from_accumulate_rejects_free_form_source() {
        let acc = FromAccumulateCompositeFactPattern::new(
            FactPattern::new("Number"),
            FreeFormLine::new("Item()"),
            AccumulateExpression::function("count()"),
        );
        let err = render(acc, false).unwrap_err();
        assert_eq!(
            err,
            MarshalError::UnsupportedPattern {
                construct: "FreeFormLine".to_string(),
                context: "FromAccumulateCompositeFactPattern".to_string(),
            }
        );
    }
}
