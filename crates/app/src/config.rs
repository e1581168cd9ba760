//! Resolution options read from the environment.

use trellis_domain::{DomainError, DomainResult, ResolveOptions};

/// Selects state/override precedence.
pub const STATE_PRECEDENCE_VAR: &str = "TRELLIS_STATE_PRECEDENCE";
/// Selects the interpolation coercion policy.
pub const COERCION_VAR: &str = "TRELLIS_COERCION";
/// Sets the maximum nesting depth.
pub const MAX_DEPTH_VAR: &str = "TRELLIS_MAX_DEPTH";

/// Reads options from the process environment.
pub fn options_from_env() -> DomainResult<ResolveOptions> {
    options_from_lookup(|name| std::env::var(name).ok())
}

/// Builds options from a variable lookup. Unset variables keep defaults.
pub fn options_from_lookup<F>(lookup: F) -> DomainResult<ResolveOptions>
where
    F: Fn(&str) -> Option<String>,
{
    let mut options = ResolveOptions::default();

    if let Some(value) = lookup(STATE_PRECEDENCE_VAR) {
        options = options.with_state_precedence(value.parse()?);
    }
    if let Some(value) = lookup(COERCION_VAR) {
        options = options.with_coercion(value.parse()?);
    }
    if let Some(value) = lookup(MAX_DEPTH_VAR) {
        options = options.with_max_depth(parse_max_depth(&value)?);
    }

    Ok(options)
}

fn parse_max_depth(value: &str) -> DomainResult<usize> {
    match value.trim().parse::<usize>() {
        Ok(depth) if depth > 0 => Ok(depth),
        _ => Err(DomainError::InvalidOption {
            name: "max_depth".to_string(),
            reason: format!("expected a positive integer, got `{value}`"),
        }),
    }
}
