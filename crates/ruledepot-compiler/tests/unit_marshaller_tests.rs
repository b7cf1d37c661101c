//! Integration tests for the DRL marshaller

use anyhow::Result;
use ruledepot_compiler::{DrlMarshaller, MarshalError, RulePersistence};
use ruledepot_core::ast::{
    ActionFieldValue, ActionInsertFact, ActionSetField, CompositeFactPattern, CompositeType,
    CompositeFieldConstraint, DslSentence, FactPattern, FreeFormLine, FromCompositeFactPattern,
    JunctionType, RuleAttribute, RuleMetadata, RuleModel, SingleFieldConstraint,
};

fn marshal(model: &RuleModel) -> Result<String> {
    Ok(DrlMarshaller::new().marshal(model)?)
}

// =============================================================================
// Whole-rule output
// =============================================================================

#[test]
fn test_reference_example() -> Result<()> {
    let model = RuleModel::new("r1")
        .with_metadata(RuleMetadata::new("tag", "x"))
        .with_attribute(RuleAttribute::new("salience", "10"))
        .with_pattern(
            FactPattern::new("Foo").with_constraint(SingleFieldConstraint::literal("bar", "==", "baz")),
        )
        .with_action(FreeFormLine::new("System.out.println();"));

    assert_eq!(
        marshal(&model)?,
        "rule \"r1\"\n\t@tag(x)\n\tsalience 10\n\tdialect \"mvel\"\n\twhen\n\t\tFoo( bar == \"baz\" )\n\tthen\n\t\tSystem.out.println();\nend\n"
    );
    Ok(())
}

#[test]
fn test_marshal_is_deterministic() -> Result<()> {
    let model = sample_model();
    let first = marshal(&model)?;
    for _ in 0..5 {
        assert_eq!(marshal(&model)?, first);
    }
    Ok(())
}

#[test]
fn test_fact_counter_resets_per_marshal() -> Result<()> {
    let model = RuleModel::new("r").with_action(
        ActionInsertFact::new("Alert")
            .with_field_value(ActionFieldValue::new("level", "1", "Integer"))
            .insert(),
    );
    let first = marshal(&model)?;
    let second = marshal(&model)?;
    assert!(first.contains("Alert fact0 = new Alert();"));
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_attributes_in_order_with_formatting() -> Result<()> {
    let model = RuleModel::new("r")
        .with_attribute(RuleAttribute::new("no-loop", ""))
        .with_attribute(RuleAttribute::new("agenda-group", "billing"))
        .with_attribute(RuleAttribute::new("enabled", "false"));
    let drl = marshal(&model)?;
    assert!(drl.starts_with(
        "rule \"r\"\n\tno-loop true\n\tagenda-group \"billing\"\n\tenabled false\n\tdialect \"mvel\"\n"
    ));
    Ok(())
}

#[test]
fn test_dsl_enhanced_rule() -> Result<()> {
    let model = RuleModel::new("dsl")
        .with_pattern(DslSentence::new("There is a customer"))
        .with_pattern(FactPattern::new("Order").bound_to("$o"))
        .with_action(ActionSetField::new("$o")
            .with_field_value(ActionFieldValue::new("status", "open", "String"))
            .update());

    let expected = "rule \"dsl\"\n\
                    \tdialect \"mvel\"\n\
                    \twhen\n\
                    \t\tThere is a customer\n\
                    \t\t>$o : Order( )\n\
                    \tthen\n\
                    \t\t>$o.setStatus( \"open\" );\n\
                    \t\t>update( $o );\n\
                    end\n";
    assert_eq!(marshal(&model)?, expected);
    Ok(())
}

#[test]
fn test_model_loaded_from_json() -> Result<()> {
    let json = sample_model().to_json()?;
    let decoded = RuleModel::from_json(&json)?;
    assert_eq!(marshal(&decoded)?, marshal(&sample_model())?);
    Ok(())
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_unsupported_composite_child_aborts() {
    let model = RuleModel::new("bad").with_pattern(
        CompositeFactPattern::new(CompositeType::Exists).with_pattern(DslSentence::new("x")),
    );
    let err = DrlMarshaller::new().marshal(&model).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unsupported pattern DslSentence for CompositeFactPattern"
    );
}

#[test]
fn test_unmarshal_fails() -> Result<()> {
    let drl = marshal(&sample_model())?;
    let err = DrlMarshaller::new().unmarshal(&drl).unwrap_err();
    assert!(matches!(err, MarshalError::Unmarshal(_)));
    Ok(())
}

fn sample_model() -> RuleModel {
    let age = CompositeFieldConstraint::new(JunctionType::Or)
        .with_constraint(SingleFieldConstraint::literal("age", "<", "18"))
        .with_constraint(SingleFieldConstraint::literal("age", ">", "65"));

    RuleModel::new("discount")
        .with_attribute(RuleAttribute::new("salience", "5"))
        .with_pattern(
            FactPattern::new("Customer")
                .bound_to("$c")
                .with_constraint(age),
        )
        .with_pattern(FromCompositeFactPattern::new(
            FactPattern::new("Item").bound_to("$i"),
            "$c.items",
        ))
        .with_pattern(
            CompositeFactPattern::new(CompositeType::Not).with_pattern(FactPattern::new("Blacklist")),
        )
        .with_action(
            ActionInsertFact::new("Discount")
                .with_field_value(ActionFieldValue::new("percent", "10", "Integer"))
                .insert(),
        )
}
