//! RHS action definitions

use super::dsl::{DslSentence, FreeFormLine};
use serde::{Deserialize, Serialize};

/// A node of the rule's right-hand side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    InsertFact(ActionInsertFact),
    InsertLogicalFact(ActionInsertFact),
    SetField(ActionSetField),
    CallMethod(ActionCallMethod),
    UpdateField(ActionSetField),
    RetractFact(ActionRetractFact),
    GlobalCollectionAdd(ActionGlobalCollectionAdd),
    FreeFormLine(FreeFormLine),
    DslSentence(DslSentence),
}

impl Action {
    /// Name of the concrete variant, used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Action::InsertFact(_) => "ActionInsertFact",
            Action::InsertLogicalFact(_) => "ActionInsertLogicalFact",
            Action::SetField(_) => "ActionSetField",
            Action::CallMethod(_) => "ActionCallMethod",
            Action::UpdateField(_) => "ActionUpdateField",
            Action::RetractFact(_) => "ActionRetractFact",
            Action::GlobalCollectionAdd(_) => "ActionGlobalCollectionAdd",
            Action::FreeFormLine(_) => "FreeFormLine",
            Action::DslSentence(_) => "DslSentence",
        }
    }
}

impl From<FreeFormLine> for Action {
    fn from(line: FreeFormLine) -> Self {
        Action::FreeFormLine(line)
    }
}

impl From<DslSentence> for Action {
    fn from(sentence: DslSentence) -> Self {
        Action::DslSentence(sentence)
    }
}

impl From<ActionRetractFact> for Action {
    fn from(action: ActionRetractFact) -> Self {
        Action::RetractFact(action)
    }
}

impl From<ActionGlobalCollectionAdd> for Action {
    fn from(action: ActionGlobalCollectionAdd) -> Self {
        Action::GlobalCollectionAdd(action)
    }
}

impl From<ActionCallMethod> for Action {
    fn from(action: ActionCallMethod) -> Self {
        Action::CallMethod(action)
    }
}

/// How an action field value is entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldNature {
    #[default]
    Undefined,
    Literal,
    Variable,
    Formula,
    Enum,
    Template,
}

/// A value assigned to a field, or passed to a method, by an action
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionFieldValue {
    pub field: String,
    #[serde(default)]
    pub value: String,

    /// Declared type of the field (`String`, `Numeric`, ...)
    #[serde(default)]
    pub field_type: String,

    #[serde(default)]
    pub nature: FieldNature,

    /// Call `var.field( value )` instead of `var.setField( value )`
    #[serde(default)]
    pub function: bool,
}

impl ActionFieldValue {
    pub const TYPE_STRING: &'static str = "String";

    pub fn new(
        field: impl Into<String>,
        value: impl Into<String>,
        field_type: impl Into<String>,
    ) -> Self {
        ActionFieldValue {
            field: field.into(),
            value: value.into(),
            field_type: field_type.into(),
            nature: FieldNature::Literal,
            function: false,
        }
    }

    /// A value passed to a method call rather than a setter
    pub fn function(
        field: impl Into<String>,
        value: impl Into<String>,
        field_type: impl Into<String>,
    ) -> Self {
        ActionFieldValue {
            function: true,
            ..Self::new(field, value, field_type)
        }
    }

    pub fn with_nature(mut self, nature: FieldNature) -> Self {
        self.nature = nature;
        self
    }

    /// A formula value starts with `=` and is emitted without it
    pub fn is_formula(&self) -> bool {
        self.value.trim_start().starts_with('=')
    }
}

/// Insert a new fact, optionally bound to a variable
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionInsertFact {
    pub fact_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bound_name: Option<String>,
    #[serde(default)]
    pub field_values: Vec<ActionFieldValue>,
}

impl ActionInsertFact {
    pub fn new(fact_type: impl Into<String>) -> Self {
        ActionInsertFact {
            fact_type: fact_type.into(),
            ..Default::default()
        }
    }

    pub fn bound_to(mut self, name: impl Into<String>) -> Self {
        self.bound_name = Some(name.into());
        self
    }

    pub fn with_field_value(mut self, value: ActionFieldValue) -> Self {
        self.field_values.push(value);
        self
    }

    /// Wrap as a plain `insert`
    pub fn insert(self) -> Action {
        Action::InsertFact(self)
    }

    /// Wrap as an `insertLogical`
    pub fn insert_logical(self) -> Action {
        Action::InsertLogicalFact(self)
    }
}

/// Assign field values on a bound variable
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionSetField {
    pub variable: String,
    #[serde(default)]
    pub field_values: Vec<ActionFieldValue>,
}

impl ActionSetField {
    pub fn new(variable: impl Into<String>) -> Self {
        ActionSetField {
            variable: variable.into(),
            field_values: Vec::new(),
        }
    }

    pub fn with_field_value(mut self, value: ActionFieldValue) -> Self {
        self.field_values.push(value);
        self
    }

    /// Wrap as a set without notifying the engine
    pub fn set(self) -> Action {
        Action::SetField(self)
    }

    /// Wrap as a set followed by `update( variable )`
    pub fn update(self) -> Action {
        Action::UpdateField(self)
    }
}

/// Call a method on a bound variable
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionCallMethod {
    pub variable: String,
    pub method_name: String,
    #[serde(default)]
    pub arguments: Vec<ActionFieldValue>,
}

impl ActionCallMethod {
    pub fn new(variable: impl Into<String>, method_name: impl Into<String>) -> Self {
        ActionCallMethod {
            variable: variable.into(),
            method_name: method_name.into(),
            arguments: Vec::new(),
        }
    }

    pub fn with_argument(mut self, argument: ActionFieldValue) -> Self {
        self.arguments.push(argument);
        self
    }
}

/// Retract a bound fact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRetractFact {
    pub variable: String,
}

impl ActionRetractFact {
    pub fn new(variable: impl Into<String>) -> Self {
        ActionRetractFact {
            variable: variable.into(),
        }
    }
}

/// Add a bound fact to a global collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionGlobalCollectionAdd {
    pub global_name: String,
    pub fact_name: String,
}

impl ActionGlobalCollectionAdd {
    pub fn new(global_name: impl Into<String>, fact_name: impl Into<String>) -> Self {
        ActionGlobalCollectionAdd {
            global_name: global_name.into(),
            fact_name: fact_name.into(),
        }
    }
}
