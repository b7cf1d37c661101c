//! Field constraint rendering
//!
//! Renders the constraint tree inside a fact pattern's parentheses.

use ruledepot_core::ast::{
    CompositeFieldConstraint, ConstraintValueType, FieldConstraint, SingleFieldConstraint,
};

/// Field constraint renderer
pub struct ConstraintRenderer;

impl ConstraintRenderer {
    /// Render the top-level constraints of a fact pattern
    ///
    /// Entries that render to nothing are skipped, the rest are joined with `", "`.
    pub fn render_all(constraints: &[FieldConstraint]) -> String {
        let mut out = String::new();
        let mut printed = 0;
        for constraint in constraints {
            let mut rendered = String::new();
            Self::render(constraint, false, &mut rendered);
            if rendered.is_empty() {
                continue;
            }
            if printed > 0 {
                out.push_str(", ");
            }
            out.push_str(&rendered);
            printed += 1;
        }
        out
    }

    /// Render a single constraint node into `buf`
    ///
    /// Composites are parenthesised only when `nested`.
    pub fn render(constraint: &FieldConstraint, nested: bool, buf: &mut String) {
        match constraint {
            FieldConstraint::Composite(composite) => Self::render_composite(composite, nested, buf),
            FieldConstraint::Single(single) => Self::render_single(single, buf),
        }
    }

    fn render_composite(composite: &CompositeFieldConstraint, nested: bool, buf: &mut String) {
        if nested {
            buf.push_str("( ");
        }
        let last = composite.constraints.len().saturating_sub(1);
        for (i, child) in composite.constraints.iter().enumerate() {
            Self::render(child, true, buf);
            if i < last {
                buf.push_str(composite.junction.as_str());
                buf.push(' ');
            }
        }
        if nested {
            buf.push(')');
        }
    }

    fn render_single(constraint: &SingleFieldConstraint, buf: &mut String) {
        if constraint.value_type == ConstraintValueType::Predicate {
            buf.push_str("eval( ");
            buf.push_str(constraint.value.as_deref().unwrap_or_default());
            buf.push_str(" )");
            return;
        }

        if let Some(binding) = &constraint.field_binding {
            buf.push_str(binding);
            buf.push_str(" : ");
        }

        if Self::shows_field(constraint) {
            for parent in &constraint.parent_path {
                buf.push_str(parent);
                buf.push('.');
            }
            match &constraint.left_expression {
                Some(expression) => buf.push_str(expression),
                None => buf.push_str(&constraint.field_name),
            }
        }

        Self::render_restriction(
            buf,
            constraint.value_type,
            constraint.operator.as_deref(),
            constraint.value.as_deref(),
            constraint.expression_value.as_deref(),
        );

        for connective in &constraint.connectives {
            Self::render_restriction(
                buf,
                connective.value_type,
                Some(&connective.operator),
                connective.value.as_deref(),
                None,
            );
        }
    }

    fn shows_field(constraint: &SingleFieldConstraint) -> bool {
        let has_restriction = match constraint.operator.as_deref() {
            Some(op) => constraint.value.is_some() || SingleFieldConstraint::is_null_test(op),
            None => false,
        };
        has_restriction
            || constraint.field_binding.is_some()
            || constraint.value_type == ConstraintValueType::ExpressionBuilder
            || constraint.left_expression.is_some()
    }

    fn render_restriction(
        buf: &mut String,
        value_type: ConstraintValueType,
        operator: Option<&str>,
        value: Option<&str>,
        expression: Option<&str>,
    ) {
        let Some(operator) = operator else {
            return;
        };
        let value = value.unwrap_or_default();

        buf.push(' ');
        buf.push_str(operator);
        buf.push(' ');

        match value_type {
            ConstraintValueType::ReturnValue => {
                buf.push_str("( ");
                buf.push_str(value);
                buf.push_str(" )");
            }
            ConstraintValueType::Literal => {
                if operator == "in" || operator == "not in" {
                    buf.push_str(value);
                } else if !SingleFieldConstraint::is_null_test(operator) {
                    buf.push('"');
                    buf.push_str(value);
                    buf.push('"');
                }
            }
            ConstraintValueType::ExpressionBuilder => {
                if let Some(expression) = expression {
                    buf.push_str(expression);
                }
            }
            ConstraintValueType::Template => {
                buf.push_str("@{");
                buf.push_str(value);
                buf.push('}');
            }
            _ => buf.push_str(value),
        }

        buf.push(' ');
    }
}
