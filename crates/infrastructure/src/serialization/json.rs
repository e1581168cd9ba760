//! Stable JSON rendering for resolved documents.
//!
//! Two runs over the same contract must produce byte-identical files, so
//! output always uses 2-space indentation, keeps mapping keys in document
//! order, and ends with a single newline.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Failure to read or write a document.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// The value could not be rendered as JSON.
    #[error("cannot render JSON: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The bytes are not a valid JSON document.
    #[error("invalid JSON document: {0}")]
    Deserialize(serde_json::Error),

    /// The bytes are not a valid YAML document, or rendering YAML failed.
    #[error("invalid YAML document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Rendered output was not UTF-8.
    #[error("rendered output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Renders `value` as stable JSON bytes.
///
/// # Errors
///
/// Returns [`SerializationError::Serialize`] if `value` cannot be represented.
pub fn to_json_stable_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, SerializationError> {
    let mut out = Vec::with_capacity(128);
    value.serialize(&mut Serializer::with_formatter(
        &mut out,
        PrettyFormatter::with_indent(b"  "),
    ))?;
    out.push(b'\n');
    Ok(out)
}

/// Renders `value` as a stable JSON string.
///
/// # Errors
///
/// See [`to_json_stable_bytes`].
pub fn to_json_stable<T: Serialize>(value: &T) -> Result<String, SerializationError> {
    Ok(String::from_utf8(to_json_stable_bytes(value)?)?)
}

/// Parses a JSON document from text.
///
/// # Errors
///
/// Returns [`SerializationError::Deserialize`] on malformed input.
pub fn from_json<T: DeserializeOwned>(text: &str) -> Result<T, SerializationError> {
    serde_json::from_str(text).map_err(SerializationError::Deserialize)
}

/// Parses a JSON document from raw file contents.
///
/// # Errors
///
/// Returns [`SerializationError::Deserialize`] on malformed input.
pub fn from_json_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SerializationError> {
    serde_json::from_slice(bytes).map_err(SerializationError::Deserialize)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use trellis_domain::ResolvedContract;

    #[test]
    fn test_resolved_document_layout() {
        let document = ResolvedContract {
            root_element: json!({"type": "List", "children": [1, 2]}),
        };

        assert_eq!(
            to_json_stable(&document).unwrap(),
            "{\n  \"rootElement\": {\n    \"type\": \"List\",\n    \"children\": [\n      1,\n      2\n    ]\n  }\n}\n"
        );
    }

    #[test]
    fn test_document_order_survives_round_trip() {
        let source = r#"{"zebra": 1, "apple": {"mango": 3, "kiwi": 4}}"#;
        let value: Value = from_json(source).unwrap();

        let rendered = to_json_stable(&value).unwrap();
        let reparsed: Value = from_json_bytes(rendered.as_bytes()).unwrap();

        assert!(rendered.find("zebra") < rendered.find("apple"));
        assert!(rendered.find("mango") < rendered.find("kiwi"));
        assert_eq!(reparsed, value);
    }

    #[test]
    fn test_empty_containers_stay_compact() {
        assert_eq!(
            to_json_stable(&json!({"a": {}, "b": []})).unwrap(),
            "{\n  \"a\": {},\n  \"b\": []\n}\n"
        );
    }

    #[test]
    fn test_malformed_input() {
        let result: Result<Value, _> = from_json_bytes(b"{\"rootElement\": ");
        assert!(matches!(result, Err(SerializationError::Deserialize(_))));
    }
}
