//! Rule model definitions

use super::action::Action;
use super::pattern::Pattern;
use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A guided rule: header, attributes, metadata, conditions and consequences
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RuleModel {
    /// Rule name, rendered as `rule "<name>"`
    pub name: String,

    /// Optional parent rule this rule extends
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,

    /// Rule attributes in declaration order
    #[serde(default)]
    pub attributes: Vec<RuleAttribute>,

    /// Rule metadata in declaration order
    #[serde(default)]
    pub metadata: Vec<RuleMetadata>,

    /// Left-hand side patterns
    #[serde(default)]
    pub lhs: Vec<Pattern>,

    /// Right-hand side actions
    #[serde(default)]
    pub rhs: Vec<Action>,

    /// Whether the whole LHS is wrapped in `not ( ... )`
    #[serde(default)]
    pub negated: bool,
}

impl RuleModel {
    /// Create an empty rule model
    pub fn new(name: impl Into<String>) -> Self {
        RuleModel {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the parent rule name
    pub fn extends(mut self, parent_name: impl Into<String>) -> Self {
        self.parent_name = Some(parent_name.into());
        self
    }

    /// Add an attribute
    pub fn with_attribute(mut self, attribute: RuleAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Add a metadata entry
    pub fn with_metadata(mut self, metadata: RuleMetadata) -> Self {
        self.metadata.push(metadata);
        self
    }

    /// Add a pattern to the LHS
    pub fn with_pattern(mut self, pattern: impl Into<Pattern>) -> Self {
        self.lhs.push(pattern.into());
        self
    }

    /// Add an action to the RHS
    pub fn with_action(mut self, action: impl Into<Action>) -> Self {
        self.rhs.push(action.into());
        self
    }

    /// Negate the whole LHS
    pub fn negate(mut self) -> Self {
        self.negated = true;
        self
    }

    /// Whether an attribute with the given name is present
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
    }

    /// Whether either side contains a DSL sentence
    pub fn has_dsl_sentences(&self) -> bool {
        self.lhs.iter().any(|p| matches!(p, Pattern::DslSentence(_)))
            || self.rhs.iter().any(|a| matches!(a, Action::DslSentence(_)))
    }

    /// Decode a rule model from its stored JSON form
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| CoreError::InvalidModel(e.to_string()))
    }

    /// Encode the rule model to its stored JSON form
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| CoreError::InvalidModel(e.to_string()))
    }
}

/// A rule attribute such as `salience 10` or `agenda-group "g"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleAttribute {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl RuleAttribute {
    pub const SALIENCE: &'static str = "salience";
    pub const ENABLED: &'static str = "enabled";
    pub const DATE_EFFECTIVE: &'static str = "date-effective";
    pub const DATE_EXPIRES: &'static str = "date-expires";
    pub const NO_LOOP: &'static str = "no-loop";
    pub const AGENDA_GROUP: &'static str = "agenda-group";
    pub const ACTIVATION_GROUP: &'static str = "activation-group";
    pub const DURATION: &'static str = "duration";
    pub const TIMER: &'static str = "timer";
    pub const CALENDARS: &'static str = "calendars";
    pub const AUTO_FOCUS: &'static str = "auto-focus";
    pub const LOCK_ON_ACTIVE: &'static str = "lock-on-active";
    pub const RULEFLOW_GROUP: &'static str = "ruleflow-group";
    pub const DIALECT: &'static str = "dialect";

    /// Create a new attribute
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        RuleAttribute {
            name: name.into(),
            value: value.into(),
        }
    }

    /// The dialect attribute injected when a rule does not declare one
    pub fn default_dialect() -> Self {
        Self::new(Self::DIALECT, "mvel")
    }
}

impl fmt::Display for RuleAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        match self.name.as_str() {
            Self::NO_LOOP => {
                let value = if self.value.is_empty() { "true" } else { self.value.as_str() };
                write!(f, " {}", value)
            }
            Self::SALIENCE | Self::DURATION => write!(f, " {}", self.value),
            Self::ENABLED | Self::AUTO_FOCUS | Self::LOCK_ON_ACTIVE => {
                let flag = if self.value == "true" { "true" } else { "false" };
                write!(f, " {}", flag)
            }
            Self::TIMER => {
                if self.value.starts_with('(') && self.value.ends_with(')') {
                    write!(f, " {}", self.value)
                } else {
                    write!(f, " ({})", self.value)
                }
            }
            Self::CALENDARS => {
                let calendars = self
                    .value
                    .split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(|c| format!("\"{}\"", c.trim_matches('"')))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, " {}", calendars)
            }
            _ if self.value.is_empty() => Ok(()),
            _ => write!(f, " \"{}\"", self.value),
        }
    }
}

/// Rule metadata, rendered as `@name(value)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleMetadata {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl RuleMetadata {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        RuleMetadata {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for RuleMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}({})", self.name, self.value)
    }
}
