//! Computed field evaluation

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, trace};
use trellis_domain::context::COMPUTED_SCOPE;
use trellis_domain::{ComputedDefinition, Context, Location, ResolveOptions, ResolveResult};

use super::cache::ComputedCache;
use super::substitute::TreeSubstitutor;

/// Evaluates computed fields in a given order against a growing context.
#[derive(Debug, Clone, Copy)]
pub struct ExpressionEvaluator<'a> {
    definitions: &'a IndexMap<String, ComputedDefinition>,
    options: ResolveOptions,
}

impl<'a> ExpressionEvaluator<'a> {
    /// Creates an evaluator over the raw computed definitions.
    #[must_use]
    pub const fn new(
        definitions: &'a IndexMap<String, ComputedDefinition>,
        options: ResolveOptions,
    ) -> Self {
        Self {
            definitions,
            options,
        }
    }

    /// Evaluates every field in `order`.
    ///
    /// Each value is stored in `cache` and recorded in `context` before the
    /// next field runs, so a field sees exactly the fields ordered before it.
    /// Values already memoized in `cache` are reused without evaluation.
    ///
    /// # Errors
    ///
    /// Returns the first failure, wrapped with the name of the field.
    pub fn evaluate_all(
        &self,
        order: &[String],
        context: &mut Context,
        cache: &mut ComputedCache,
    ) -> ResolveResult<()> {
        for name in order {
            let Some(definition) = self.definitions.get(name) else {
                continue;
            };

            let value = if let Some(memoized) = cache.get(name) {
                trace!(field = %name, "reusing memoized computed value");
                memoized.clone()
            } else {
                let value = self
                    .evaluate(name, definition, context)
                    .map_err(|err| err.in_field(name.as_str()))?;
                cache.insert(name.as_str(), value.clone());
                value
            };

            debug!(field = %name, "evaluated computed field");
            context.record_computed(name.as_str(), value);
        }
        Ok(())
    }

    /// Evaluates one definition against the current context.
    ///
    /// # Errors
    ///
    /// Returns the resolution error, located under `computed.<name>`.
    pub fn evaluate(
        &self,
        name: &str,
        definition: &ComputedDefinition,
        context: &Context,
    ) -> ResolveResult<Value> {
        let substitutor = TreeSubstitutor::new(context, self.options);
        let mut location = Location::root(COMPUTED_SCOPE);
        location.push_key(name);

        match definition {
            ComputedDefinition::Template(text) => substitutor.substitute_text(text, location),
            ComputedDefinition::Conditional(conditional) => {
                substitutor.substitute_conditional(conditional.view(), location)
            }
            ComputedDefinition::Nested(value) => substitutor.substitute(value, location),
        }
    }
}
