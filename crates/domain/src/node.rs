//! UI node keys
//!
//! Keys starting with [`CONTROL_PREFIX`] are authoring directives and never
//! reach the output. `type` is the exception and is always kept verbatim.

/// Node type key, copied through untouched.
pub const TYPE_KEY: &str = "type";

/// Marker that starts a control key.
pub const CONTROL_PREFIX: char = '$';

/// Directive listing child references.
pub const CHILDREN_DIRECTIVE: &str = "$children";

/// Output key the resolved children are stored under.
pub const CHILDREN_KEY: &str = "children";

/// Returns true for `$`-prefixed keys.
#[must_use]
pub fn is_control_key(key: &str) -> bool {
    key.starts_with(CONTROL_PREFIX)
}
