//! Value helpers shared by evaluation and substitution

use serde_json::{Number, Value};
use trellis_domain::InterpolationCoercion;
use trellis_domain::contract::value_kind;

/// Truthiness used by conditionals.
///
/// `null`, `false`, `0` and `""` are falsy. Everything else is truthy,
/// including empty sequences and mappings.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Returns true for values dropped from resolved sequences: `null` and
/// empty mappings.
#[must_use]
pub fn is_artifact(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Appends the text form of an interpolated value.
///
/// `null` contributes nothing. Sequences and mappings are written as compact
/// JSON under [`InterpolationCoercion::Structural`].
///
/// # Errors
///
/// Returns the value kind when strict coercion rejects a sequence or mapping.
pub fn push_text(
    out: &mut String,
    value: &Value,
    coercion: InterpolationCoercion,
) -> Result<(), &'static str> {
    match value {
        Value::Null => {}
        Value::Bool(flag) => out.push_str(if *flag { "true" } else { "false" }),
        Value::Number(number) => out.push_str(&number_text(number)),
        Value::String(text) => out.push_str(text),
        Value::Array(_) | Value::Object(_) => match coercion {
            InterpolationCoercion::Structural => out.push_str(&value.to_string()),
            InterpolationCoercion::Strict => return Err(value_kind(value)),
        },
    }
    Ok(())
}

// Integral floats print without a fractional part (`2.0` -> `2`).
fn number_text(number: &Number) -> String {
    match number.as_f64() {
        Some(float) if number.is_f64() => float.to_string(),
        _ => number.to_string(),
    }
}
