//! Document formats selected by file extension.

use std::fmt;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use super::json::{SerializationError, from_json_bytes, to_json_stable_bytes};

/// A supported document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// `.json`
    Json,
    /// `.yaml` or `.yml`
    Yaml,
}

impl DocumentFormat {
    /// Picks the format from a path's extension, case-insensitively.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// Parses a document into a JSON-like value.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a valid document in this format.
    pub fn parse(self, bytes: &[u8]) -> Result<Value, SerializationError> {
        match self {
            Self::Json => from_json_bytes(bytes),
            Self::Yaml => Ok(serde_yaml::from_slice(bytes)?),
        }
    }

    /// Renders a value in this format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render<T: Serialize>(self, value: &T) -> Result<Vec<u8>, SerializationError> {
        match self {
            Self::Json => to_json_stable_bytes(value),
            Self::Yaml => Ok(serde_yaml::to_string(value)?.into_bytes()),
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}
