//! Contract documents
//!
//! The input contract and the resolved output document.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::computed::ComputedDefinition;
use crate::error::{DomainError, DomainResult};

/// Top-level key of the UI tree in both input and output documents.
pub const ROOT_ELEMENT_KEY: &str = "rootElement";

/// An input contract.
///
/// Every section is optional. `computed` keeps declaration order, which is
/// also the order roots are visited when the evaluation order is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    /// Read-only input values.
    #[serde(default)]
    pub data: Map<String, Value>,

    /// Mutable input values, merged with an external override.
    #[serde(default)]
    pub state: Map<String, Value>,

    /// Named derived values.
    #[serde(default)]
    pub computed: IndexMap<String, ComputedDefinition>,

    /// The UI node tree.
    #[serde(default)]
    pub root_element: Value,
}

impl Contract {
    /// Reads a contract from a JSON-like value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidContract` if the value is not a mapping or
    /// one of its sections has the wrong type.
    pub fn from_value(value: Value) -> DomainResult<Self> {
        if !value.is_object() {
            return Err(DomainError::InvalidContract(format!(
                "expected a mapping at the top level, found {}",
                value_kind(&value)
            )));
        }
        serde_json::from_value(value).map_err(|e| DomainError::InvalidContract(e.to_string()))
    }
}

/// Reads an external state override.
///
/// `null` is treated as "no override".
///
/// # Errors
///
/// Returns `DomainError::InvalidStateOverride` if the value is not a mapping.
pub fn state_override_from_value(value: Value) -> DomainResult<Option<Map<String, Value>>> {
    match value {
        Value::Null => Ok(None),
        Value::Object(map) => Ok(Some(map)),
        other => Err(DomainError::InvalidStateOverride(format!(
            "expected a mapping, found {}",
            value_kind(&other)
        ))),
    }
}

/// The resolved document handed to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedContract {
    /// The placeholder-free UI tree.
    pub root_element: Value,
}

/// Human-readable name of a value's kind.
#[must_use]
pub const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
