//! Non-fatal resolution diagnostics

use std::fmt;

use serde::{Deserialize, Serialize};

/// A problem found while scanning computed definitions that does not stop
/// resolution, such as a malformed placeholder in a field that may never be
/// evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveWarning {
    /// Computed field the problem was found in.
    pub field: String,
    /// The placeholder text involved.
    pub placeholder: String,
    /// Human-readable description.
    pub message: String,
}

impl ResolveWarning {
    /// Creates a new warning.
    pub fn new(
        field: impl Into<String>,
        placeholder: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            placeholder: placeholder.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ResolveWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "computed.{}: {} ({})",
            self.field, self.message, self.placeholder
        )
    }
}
