//! Computed field definitions
//!
//! A computed field is one of three shapes, decided once when the contract
//! is loaded:
//!
//! - a template string: `"Hello ${state.name}!"`
//! - a conditional: `{"kind": "if", "condition": ..., "thenBranch": ..., "elseBranch": ...}`
//! - any other nested value, resolved structurally

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Discriminator key of a conditional node.
pub const KIND_KEY: &str = "kind";

/// Discriminator value of a conditional node.
pub const CONDITIONAL_KIND: &str = "if";

/// Key holding a conditional's condition.
pub const CONDITION_KEY: &str = "condition";

/// Key holding the branch taken when the condition is truthy.
pub const THEN_KEY: &str = "thenBranch";

/// Key holding the branch taken when the condition is falsy.
pub const ELSE_KEY: &str = "elseBranch";

static NULL: Value = Value::Null;

/// A computed field definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum ComputedDefinition {
    /// A string, possibly containing placeholders.
    Template(String),
    /// A conditional node.
    Conditional(Conditional),
    /// Any other value; placeholders may appear at any depth.
    Nested(Value),
}

impl ComputedDefinition {
    /// Returns the definition as the raw value it was loaded from.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::from(self.clone())
    }
}

impl From<Value> for ComputedDefinition {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => Self::Template(text),
            Value::Object(map) => match Conditional::from_map(&map) {
                Some(conditional) => Self::Conditional(conditional),
                None => Self::Nested(Value::Object(map)),
            },
            other => Self::Nested(other),
        }
    }
}

impl From<ComputedDefinition> for Value {
    fn from(definition: ComputedDefinition) -> Self {
        match definition {
            ComputedDefinition::Template(text) => Self::String(text),
            ComputedDefinition::Conditional(conditional) => conditional.into_value(),
            ComputedDefinition::Nested(value) => value,
        }
    }
}

/// An owned conditional node.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    /// Value whose truthiness picks the branch.
    pub condition: Value,
    /// Branch used when the condition is truthy.
    pub then_branch: Value,
    /// Branch used when the condition is falsy.
    pub else_branch: Value,
}

impl Conditional {
    /// Reads a conditional from a mapping tagged `"kind": "if"`.
    ///
    /// Missing branches become `null`.
    #[must_use]
    pub fn from_map(map: &Map<String, Value>) -> Option<Self> {
        ConditionalRef::from_map(map).map(|node| Self {
            condition: node.condition.clone(),
            then_branch: node.then_branch.clone(),
            else_branch: node.else_branch.clone(),
        })
    }

    /// Borrows this conditional.
    #[must_use]
    pub const fn view(&self) -> ConditionalRef<'_> {
        ConditionalRef {
            condition: &self.condition,
            then_branch: &self.then_branch,
            else_branch: &self.else_branch,
        }
    }

    fn into_value(self) -> Value {
        let mut map = Map::new();
        map.insert(KIND_KEY.to_string(), Value::String(CONDITIONAL_KIND.to_string()));
        map.insert(CONDITION_KEY.to_string(), self.condition);
        map.insert(THEN_KEY.to_string(), self.then_branch);
        map.insert(ELSE_KEY.to_string(), self.else_branch);
        Value::Object(map)
    }
}

/// A borrowed conditional node, recognised anywhere in a value tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditionalRef<'a> {
    /// Value whose truthiness picks the branch.
    pub condition: &'a Value,
    /// Branch used when the condition is truthy.
    pub then_branch: &'a Value,
    /// Branch used when the condition is falsy.
    pub else_branch: &'a Value,
}

impl<'a> ConditionalRef<'a> {
    /// Borrows a conditional from a mapping tagged `"kind": "if"`.
    #[must_use]
    pub fn from_map(map: &'a Map<String, Value>) -> Option<Self> {
        if map.get(KIND_KEY).and_then(Value::as_str) != Some(CONDITIONAL_KIND) {
            return None;
        }
        Some(Self {
            condition: map.get(CONDITION_KEY).unwrap_or(&NULL),
            then_branch: map.get(THEN_KEY).unwrap_or(&NULL),
            else_branch: map.get(ELSE_KEY).unwrap_or(&NULL),
        })
    }
}
