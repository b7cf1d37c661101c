//! Field constraint definitions
//!
//! Constraints inside a fact pattern form a tree: single constraints on one field
//! (optionally followed by connectives on the same field) and composite constraints
//! joining their children with a junction operator.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A constraint on the fields of a fact pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldConstraint {
    Single(SingleFieldConstraint),
    Composite(CompositeFieldConstraint),
}

impl From<SingleFieldConstraint> for FieldConstraint {
    fn from(constraint: SingleFieldConstraint) -> Self {
        FieldConstraint::Single(constraint)
    }
}

impl From<CompositeFieldConstraint> for FieldConstraint {
    fn from(constraint: CompositeFieldConstraint) -> Self {
        FieldConstraint::Composite(constraint)
    }
}

/// How a constraint value should be interpreted when rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintValueType {
    #[default]
    Undefined,
    /// Quoted literal, except for null tests and `in` / `not in` lists
    Literal,
    /// A bound variable name
    Variable,
    /// A return value expression, rendered in parentheses
    ReturnValue,
    /// A predicate, rendered as `eval( ... )`
    Predicate,
    /// An enumeration value, rendered raw
    Enum,
    /// A value built with the expression builder
    ExpressionBuilder,
    /// A template key, rendered as `@{key}`
    Template,
}

/// A constraint on a single field
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SingleFieldConstraint {
    /// Field name the constraint applies to
    pub field_name: String,

    /// Optional variable bound to the field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_binding: Option<String>,

    /// Names of the enclosing fields, outermost first (`address.city`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parent_path: Vec<String>,

    /// Expression used as the left side instead of the field name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_expression: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default)]
    pub value_type: ConstraintValueType,

    /// Expression text for [`ConstraintValueType::ExpressionBuilder`] values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression_value: Option<String>,

    /// Additional restrictions on the same field (`> 10 && < 20`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connectives: Vec<ConnectiveConstraint>,
}

impl SingleFieldConstraint {
    /// Create a constraint with no operator
    pub fn new(field_name: impl Into<String>) -> Self {
        SingleFieldConstraint {
            field_name: field_name.into(),
            ..Default::default()
        }
    }

    /// Create a literal comparison, e.g. `name == "Bob"`
    pub fn literal(
        field_name: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::new(field_name).with_restriction(operator, value, ConstraintValueType::Literal)
    }

    /// Set operator, value and value type
    pub fn with_restriction(
        mut self,
        operator: impl Into<String>,
        value: impl Into<String>,
        value_type: ConstraintValueType,
    ) -> Self {
        self.operator = Some(operator.into());
        self.value = Some(value.into());
        self.value_type = value_type;
        self
    }

    /// Set only the operator (used by null tests)
    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = Some(operator.into());
        self
    }

    /// Bind the field to a variable
    pub fn bound_to(mut self, binding: impl Into<String>) -> Self {
        self.field_binding = Some(binding.into());
        self
    }

    /// Set the enclosing field path
    pub fn with_parent_path(mut self, path: Vec<String>) -> Self {
        self.parent_path = path;
        self
    }

    /// Use an expression as the left side
    pub fn with_left_expression(mut self, expression: impl Into<String>) -> Self {
        self.left_expression = Some(expression.into());
        self
    }

    /// Set an expression-builder value
    pub fn with_expression_value(
        mut self,
        operator: impl Into<String>,
        expression: impl Into<String>,
    ) -> Self {
        self.operator = Some(operator.into());
        self.value_type = ConstraintValueType::ExpressionBuilder;
        self.expression_value = Some(expression.into());
        self
    }

    /// Add a connective restriction
    pub fn with_connective(mut self, connective: ConnectiveConstraint) -> Self {
        self.connectives.push(connective);
        self
    }

    /// Whether the operator is a null test (`== null` / `!= null`)
    pub fn is_null_test(operator: &str) -> bool {
        operator == "== null" || operator == "!= null"
    }
}

/// An extra operator/value pair applied to the same field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectiveConstraint {
    /// Operator including its connective, e.g. `&& <`
    pub operator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default)]
    pub value_type: ConstraintValueType,
}

impl ConnectiveConstraint {
    pub fn new(
        operator: impl Into<String>,
        value: impl Into<String>,
        value_type: ConstraintValueType,
    ) -> Self {
        ConnectiveConstraint {
            operator: operator.into(),
            value: Some(value.into()),
            value_type,
        }
    }
}

/// Junction operator of a composite constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JunctionType {
    #[serde(rename = "&&")]
    And,
    #[serde(rename = "||")]
    Or,
}

impl JunctionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JunctionType::And => "&&",
            JunctionType::Or => "||",
        }
    }
}

impl fmt::Display for JunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JunctionType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "&&" | "and" => Ok(JunctionType::And),
            "||" | "or" => Ok(JunctionType::Or),
            other => Err(CoreError::UnknownOperator(other.to_string())),
        }
    }
}

/// Several constraints joined by one junction operator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeFieldConstraint {
    pub junction: JunctionType,
    #[serde(default)]
    pub constraints: Vec<FieldConstraint>,
}

impl CompositeFieldConstraint {
    pub fn new(junction: JunctionType) -> Self {
        CompositeFieldConstraint {
            junction,
            constraints: Vec::new(),
        }
    }

    pub fn with_constraint(mut self, constraint: impl Into<FieldConstraint>) -> Self {
        self.constraints.push(constraint.into());
        self
    }
}
