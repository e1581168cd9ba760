//! Resolution options
//!
//! Policy choices the engine leaves to the caller.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Default limit on nested resolution depth.
pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// Which side wins when the contract's `state` and an external override
/// define the same key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatePrecedence {
    /// The override replaces the contract's value.
    #[default]
    OverrideWins,
    /// The contract's value is kept; the override only adds new keys.
    ContractWins,
}

impl StatePrecedence {
    /// Returns the configuration name of this policy.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OverrideWins => "override-wins",
            Self::ContractWins => "contract-wins",
        }
    }
}

impl fmt::Display for StatePrecedence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatePrecedence {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "override-wins" | "override" => Ok(Self::OverrideWins),
            "contract-wins" | "contract" => Ok(Self::ContractWins),
            other => Err(DomainError::InvalidOption {
                name: "state_precedence".to_string(),
                reason: format!("unknown policy `{other}`"),
            }),
        }
    }
}

/// How non-string values are turned into text when a placeholder is
/// embedded in a longer string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterpolationCoercion {
    /// Scalars use their literal form, null becomes empty, sequences and
    /// mappings become compact JSON.
    #[default]
    Structural,
    /// Sequences and mappings are rejected.
    Strict,
}

impl InterpolationCoercion {
    /// Returns the configuration name of this policy.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Structural => "structural",
            Self::Strict => "strict",
        }
    }
}

impl fmt::Display for InterpolationCoercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterpolationCoercion {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "structural" => Ok(Self::Structural),
            "strict" => Ok(Self::Strict),
            other => Err(DomainError::InvalidOption {
                name: "coercion".to_string(),
                reason: format!("unknown policy `{other}`"),
            }),
        }
    }
}

/// Options for a resolution run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    /// State/override precedence.
    pub state_precedence: StatePrecedence,
    /// Partial interpolation coercion policy.
    pub coercion: InterpolationCoercion,
    /// Maximum nesting depth before resolution fails.
    pub max_depth: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            state_precedence: StatePrecedence::default(),
            coercion: InterpolationCoercion::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ResolveOptions {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the state/override precedence.
    #[must_use]
    pub const fn with_state_precedence(mut self, precedence: StatePrecedence) -> Self {
        self.state_precedence = precedence;
        self
    }

    /// Sets the interpolation coercion policy.
    #[must_use]
    pub const fn with_coercion(mut self, coercion: InterpolationCoercion) -> Self {
        self.coercion = coercion;
        self
    }

    /// Sets the maximum nesting depth.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ResolveOptions::default();
        assert_eq!(options.state_precedence, StatePrecedence::OverrideWins);
        assert_eq!(options.coercion, InterpolationCoercion::Structural);
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_builder() {
        let options = ResolveOptions::new()
            .with_state_precedence(StatePrecedence::ContractWins)
            .with_coercion(InterpolationCoercion::Strict)
            .with_max_depth(16);
        assert_eq!(options.state_precedence, StatePrecedence::ContractWins);
        assert_eq!(options.coercion, InterpolationCoercion::Strict);
        assert_eq!(options.max_depth, 16);
    }

    #[test]
    fn test_parse_policies() {
        assert_eq!(
            "Contract-Wins".parse::<StatePrecedence>().unwrap(),
            StatePrecedence::ContractWins
        );
        assert_eq!(
            "strict".parse::<InterpolationCoercion>().unwrap(),
            InterpolationCoercion::Strict
        );
        assert!("sometimes".parse::<StatePrecedence>().is_err());
    }

    #[test]
    fn test_deserialize_partial_options() {
        let options: ResolveOptions =
            serde_json::from_str(r#"{"coercion": "strict"}"#).unwrap();
        assert_eq!(options.coercion, InterpolationCoercion::Strict);
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
    }
}
