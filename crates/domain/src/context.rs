//! Resolution context for placeholder lookup
//!
//! Holds the three lookup scopes a placeholder can start in.

use serde_json::{Map, Value};

use crate::contract::Contract;
use crate::options::StatePrecedence;

/// Scope name for read-only contract data.
pub const DATA_SCOPE: &str = "data";

/// Scope name for mutable state.
pub const STATE_SCOPE: &str = "state";

/// Scope name for derived values.
pub const COMPUTED_SCOPE: &str = "computed";

/// All scope names, in lookup-root order.
pub const SCOPES: [&str; 3] = [DATA_SCOPE, STATE_SCOPE, COMPUTED_SCOPE];

/// The values placeholders are resolved against.
///
/// `data` and `state` are fixed once the context is built. `computed` only
/// grows: each evaluated field is recorded before the next one runs, so later
/// fields can read earlier ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    data: Map<String, Value>,
    state: Map<String, Value>,
    computed: Map<String, Value>,
}

impl Context {
    /// Creates a context with empty `computed` values.
    #[must_use]
    pub fn new(data: Map<String, Value>, state: Map<String, Value>) -> Self {
        Self {
            data,
            state,
            computed: Map::new(),
        }
    }

    /// Builds the context for a contract, merging an optional state override.
    ///
    /// The merge is shallow over top-level state keys. `precedence` decides
    /// which side wins when both define the same key.
    #[must_use]
    pub fn from_contract(
        contract: &Contract,
        state_override: Option<&Map<String, Value>>,
        precedence: StatePrecedence,
    ) -> Self {
        let mut state = contract.state.clone();

        if let Some(overrides) = state_override {
            for (key, value) in overrides {
                match precedence {
                    StatePrecedence::OverrideWins => {
                        state.insert(key.clone(), value.clone());
                    }
                    StatePrecedence::ContractWins => {
                        if !state.contains_key(key) {
                            state.insert(key.clone(), value.clone());
                        }
                    }
                }
            }
        }

        Self::new(contract.data.clone(), state)
    }

    /// Returns the named scope, if it exists.
    #[must_use]
    pub fn scope(&self, name: &str) -> Option<&Map<String, Value>> {
        match name {
            DATA_SCOPE => Some(&self.data),
            STATE_SCOPE => Some(&self.state),
            COMPUTED_SCOPE => Some(&self.computed),
            _ => None,
        }
    }

    /// Read-only contract data.
    #[must_use]
    pub const fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Merged state.
    #[must_use]
    pub const fn state(&self) -> &Map<String, Value> {
        &self.state
    }

    /// Computed values evaluated so far.
    #[must_use]
    pub const fn computed(&self) -> &Map<String, Value> {
        &self.computed
    }

    /// Records an evaluated computed field.
    ///
    /// Returns `false` and leaves the existing value in place if the field
    /// was already recorded.
    pub fn record_computed(&mut self, name: impl Into<String>, value: Value) -> bool {
        let name = name.into();
        if self.computed.contains_key(&name) {
            return false;
        }
        self.computed.insert(name, value);
        true
    }

    /// Consumes the context, returning the computed values.
    #[must_use]
    pub fn into_computed(self) -> Map<String, Value> {
        self.computed
    }
}
