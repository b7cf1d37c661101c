//! LHS pattern definitions

use super::constraint::FieldConstraint;
use super::dsl::{DslSentence, FreeFormLine};
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A node of the rule's left-hand side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Pattern {
    Fact(FactPattern),
    Composite(CompositeFactPattern),
    From(FromCompositeFactPattern),
    FromCollect(FromCollectCompositeFactPattern),
    FromAccumulate(FromAccumulateCompositeFactPattern),
    FreeFormLine(FreeFormLine),
    DslSentence(DslSentence),
}

impl Pattern {
    /// Name of the concrete variant, used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Pattern::Fact(_) => "FactPattern",
            Pattern::Composite(_) => "CompositeFactPattern",
            Pattern::From(_) => "FromCompositeFactPattern",
            Pattern::FromCollect(_) => "FromCollectCompositeFactPattern",
            Pattern::FromAccumulate(_) => "FromAccumulateCompositeFactPattern",
            Pattern::FreeFormLine(_) => "FreeFormLine",
            Pattern::DslSentence(_) => "DslSentence",
        }
    }
}

impl From<FactPattern> for Pattern {
    fn from(p: FactPattern) -> Self {
        Pattern::Fact(p)
    }
}

impl From<CompositeFactPattern> for Pattern {
    fn from(p: CompositeFactPattern) -> Self {
        Pattern::Composite(p)
    }
}

impl From<FromCompositeFactPattern> for Pattern {
    fn from(p: FromCompositeFactPattern) -> Self {
        Pattern::From(p)
    }
}

impl From<FromCollectCompositeFactPattern> for Pattern {
    fn from(p: FromCollectCompositeFactPattern) -> Self {
        Pattern::FromCollect(p)
    }
}

impl From<FromAccumulateCompositeFactPattern> for Pattern {
    fn from(p: FromAccumulateCompositeFactPattern) -> Self {
        Pattern::FromAccumulate(p)
    }
}

impl From<FreeFormLine> for Pattern {
    fn from(line: FreeFormLine) -> Self {
        Pattern::FreeFormLine(line)
    }
}

impl From<DslSentence> for Pattern {
    fn from(sentence: DslSentence) -> Self {
        Pattern::DslSentence(sentence)
    }
}

/// A single fact type with field constraints, e.g. `p : Person( age > 18 )`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FactPattern {
    pub fact_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bound_name: Option<String>,

    /// Rendered as `not Type( ... )`; a negated pattern is never bound
    #[serde(default)]
    pub negated: bool,

    #[serde(default)]
    pub constraints: Vec<FieldConstraint>,
}

impl FactPattern {
    pub fn new(fact_type: impl Into<String>) -> Self {
        FactPattern {
            fact_type: fact_type.into(),
            ..Default::default()
        }
    }

    pub fn bound_to(mut self, name: impl Into<String>) -> Self {
        self.bound_name = Some(name.into());
        self
    }

    pub fn negate(mut self) -> Self {
        self.negated = true;
        self
    }

    pub fn with_constraint(mut self, constraint: impl Into<FieldConstraint>) -> Self {
        self.constraints.push(constraint.into());
        self
    }
}

/// Conditional element of a composite pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompositeType {
    Exists,
    Not,
    Or,
}

impl CompositeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompositeType::Exists => "exists",
            CompositeType::Not => "not",
            CompositeType::Or => "or",
        }
    }
}

impl fmt::Display for CompositeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompositeType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exists" => Ok(CompositeType::Exists),
            "not" => Ok(CompositeType::Not),
            "or" => Ok(CompositeType::Or),
            other => Err(CoreError::InvalidValue(format!(
                "unknown composite type '{}'",
                other
            ))),
        }
    }
}

/// `exists`, `not` or `or` over several patterns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeFactPattern {
    pub composite_type: CompositeType,
    #[serde(default)]
    pub patterns: Vec<Pattern>,
}

impl CompositeFactPattern {
    pub fn new(composite_type: CompositeType) -> Self {
        CompositeFactPattern {
            composite_type,
            patterns: Vec::new(),
        }
    }

    pub fn with_pattern(mut self, pattern: impl Into<Pattern>) -> Self {
        self.patterns.push(pattern.into());
        self
    }
}

/// `Type( ... ) from <expression>`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FromCompositeFactPattern {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fact_pattern: Option<FactPattern>,
    #[serde(default)]
    pub expression: String,
}

impl FromCompositeFactPattern {
    pub fn new(fact_pattern: FactPattern, expression: impl Into<String>) -> Self {
        FromCompositeFactPattern {
            fact_pattern: Some(fact_pattern),
            expression: expression.into(),
        }
    }
}

/// `Type( ... ) from collect ( <pattern> )`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FromCollectCompositeFactPattern {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fact_pattern: Option<FactPattern>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_pattern: Option<Box<Pattern>>,
}

impl FromCollectCompositeFactPattern {
    pub fn new(fact_pattern: FactPattern, right_pattern: impl Into<Pattern>) -> Self {
        FromCollectCompositeFactPattern {
            fact_pattern: Some(fact_pattern),
            right_pattern: Some(Box::new(right_pattern.into())),
        }
    }
}

/// Body of an accumulate: a named function or inline init/action/reverse/result code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum AccumulateExpression {
    Function {
        function: String,
    },
    Code {
        init: String,
        action: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reverse: Option<String>,
        result: String,
    },
}

impl AccumulateExpression {
    /// Accumulate with a named function call such as `sum( $amount )`
    pub fn function(function: impl Into<String>) -> Self {
        AccumulateExpression::Function {
            function: function.into(),
        }
    }
}

impl Default for AccumulateExpression {
    fn default() -> Self {
        Self::function("")
    }
}

/// `Type( ... ) from accumulate ( <pattern>, <function or code> )`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FromAccumulateCompositeFactPattern {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fact_pattern: Option<FactPattern>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_pattern: Option<Box<Pattern>>,
    #[serde(default)]
    pub expression: AccumulateExpression,
}

impl FromAccumulateCompositeFactPattern {
    pub fn new(
        fact_pattern: FactPattern,
        source_pattern: impl Into<Pattern>,
        expression: AccumulateExpression,
    ) -> Self {
        FromAccumulateCompositeFactPattern {
            fact_pattern: Some(fact_pattern),
            source_pattern: Some(Box::new(source_pattern.into())),
            expression,
        }
    }
}
