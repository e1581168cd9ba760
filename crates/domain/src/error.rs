//! Domain error types

use thiserror::Error;

/// Errors raised while loading a contract document into domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The contract document does not have the expected shape.
    #[error("invalid contract: {0}")]
    InvalidContract(String),

    /// The external state override is not a mapping.
    #[error("invalid state override: {0}")]
    InvalidStateOverride(String),

    /// A configuration value could not be parsed.
    #[error("invalid option `{name}`: {reason}")]
    InvalidOption {
        /// Option name.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// Errors raised while resolving a contract.
///
/// Leaf variants describe what went wrong; `InField` and `AtLocation` wrap a
/// leaf with the computed field or tree position it happened at. Use
/// [`ResolveError::root_cause`] to match on the leaf regardless of wrapping.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// A `${...}` token could not be parsed.
    #[error("malformed placeholder `{placeholder}`: {reason}")]
    MalformedPlaceholder {
        /// The offending placeholder text.
        placeholder: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// A path could not be walked to the end.
    #[error("cannot resolve `{path}`: cannot descend through `{segment}`{}", available_hint(.available))]
    UnresolvablePath {
        /// Dotted form of the path.
        path: String,
        /// The segment the walk could not descend through: missing, or
        /// holding a scalar or `null`.
        segment: String,
        /// Keys present where the segment was looked up.
        available: Vec<String>,
    },

    /// A placeholder chain resolved back to a placeholder still in flight.
    #[error("circular reference: {} -> {reference}", .chain.join(" -> "))]
    CircularReference {
        /// Placeholders in flight, outermost first.
        chain: Vec<String>,
        /// The placeholder that closed the loop.
        reference: String,
    },

    /// Computed fields depend on each other in a cycle.
    #[error("circular dependency between computed fields: {}", .cycle.join(" -> "))]
    CircularDependency {
        /// Field names from the first repetition to closure.
        cycle: Vec<String>,
    },

    /// Nesting went deeper than the configured limit.
    #[error("maximum resolution depth of {limit} exceeded at {location}")]
    DepthExceeded {
        /// Configured limit.
        limit: usize,
        /// Tree position where the limit was hit.
        location: String,
    },

    /// A sequence or mapping was interpolated into text under strict coercion.
    #[error("cannot interpolate {kind} value of `{placeholder}` into text")]
    NonScalarInterpolation {
        /// The placeholder whose value was rejected.
        placeholder: String,
        /// Value kind, e.g. `mapping`.
        kind: &'static str,
    },

    /// Error raised while evaluating a computed field.
    #[error("in computed field `{field}`: {source}")]
    InField {
        /// Computed field name.
        field: String,
        /// Underlying error.
        source: Box<ResolveError>,
    },

    /// Error raised at a position in the resolved tree.
    #[error("at {location}: {source}")]
    AtLocation {
        /// Tree position, e.g. `rootElement.content.children[2]`.
        location: String,
        /// Underlying error.
        source: Box<ResolveError>,
    },
}

fn available_hint(available: &[String]) -> String {
    if available.is_empty() {
        String::new()
    } else {
        format!(" (available: {})", available.join(", "))
    }
}

impl ResolveError {
    /// Creates a `MalformedPlaceholder` error.
    pub fn malformed(placeholder: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedPlaceholder {
            placeholder: placeholder.into(),
            reason: reason.into(),
        }
    }

    /// Wraps this error with the computed field it was raised in.
    #[must_use]
    pub fn in_field(self, field: impl Into<String>) -> Self {
        Self::InField {
            field: field.into(),
            source: Box::new(self),
        }
    }

    /// Wraps this error with a tree location. Already located errors are
    /// returned unchanged so the innermost location wins.
    #[must_use]
    pub fn at(self, location: impl ToString) -> Self {
        match self {
            Self::AtLocation { .. } | Self::DepthExceeded { .. } => self,
            other => Self::AtLocation {
                location: location.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// Returns the innermost error, skipping field and location wrappers.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        let mut current = self;
        while let Self::InField { source, .. } | Self::AtLocation { source, .. } = current {
            current = &**source;
        }
        current
    }

    /// Returns the outermost computed field this error was raised in.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        let mut current = self;
        loop {
            match current {
                Self::InField { field, .. } => return Some(field),
                Self::AtLocation { source, .. } => current = &**source,
                _ => return None,
            }
        }
    }

    /// Returns the innermost tree location attached to this error.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        let mut found = None;
        let mut current = self;
        loop {
            match current {
                Self::AtLocation { location, source } => {
                    found = Some(location.as_str());
                    current = &**source;
                }
                Self::InField { source, .. } => current = &**source,
                Self::DepthExceeded { location, .. } => return Some(location),
                _ => return found,
            }
        }
    }
}

/// Result type alias for resolution operations.
pub type ResolveResult<T> = Result<T, ResolveError>;
