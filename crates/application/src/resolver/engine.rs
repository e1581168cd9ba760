//! Contract resolution engine
//!
//! Runs the full pipeline: build the context, order computed fields,
//! evaluate them, then substitute the `rootElement` tree.

use serde_json::{Map, Value};
use tracing::{debug, info_span};
use trellis_domain::{
    Context, Contract, Location, ROOT_ELEMENT_KEY, ResolveOptions, ResolveResult,
    ResolveWarning, ResolvedContract, state_override_from_value,
};

use super::cache::{ComputedCache, fingerprint};
use super::evaluator::ExpressionEvaluator;
use super::graph::DependencyGraph;
use super::order::evaluation_order;
use super::substitute::TreeSubstitutor;
use crate::error::ApplicationResult;

/// Result of resolving a contract.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The placeholder-free output document.
    pub output: ResolvedContract,

    /// Every computed value, in evaluation order.
    pub computed: Map<String, Value>,

    /// The order computed fields were evaluated in.
    pub order: Vec<String>,

    /// Non-fatal problems found while scanning computed definitions.
    pub warnings: Vec<ResolveWarning>,
}

impl Resolution {
    /// Returns true if resolution produced no warnings.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Resolves UI contracts.
///
/// The resolver holds no state between runs; pass a [`ComputedCache`] to
/// [`ContractResolver::resolve_with_cache`] to memoize computed values.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContractResolver {
    options: ResolveOptions,
}

impl ContractResolver {
    /// Creates a resolver with the given options.
    #[must_use]
    pub const fn new(options: ResolveOptions) -> Self {
        Self { options }
    }

    /// The options this resolver runs with.
    #[must_use]
    pub const fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Resolves a contract with a fresh cache.
    ///
    /// # Errors
    ///
    /// Returns the first fatal resolution error.
    pub fn resolve(
        &self,
        contract: &Contract,
        state_override: Option<&Map<String, Value>>,
    ) -> ResolveResult<Resolution> {
        self.resolve_with_cache(contract, state_override, &mut ComputedCache::new())
    }

    /// Resolves a contract, memoizing computed values in `cache`.
    ///
    /// The cache is rebound to this contract and these options first; values
    /// left over from a different contract or options are discarded.
    ///
    /// # Errors
    ///
    /// Returns the first fatal resolution error.
    pub fn resolve_with_cache(
        &self,
        contract: &Contract,
        state_override: Option<&Map<String, Value>>,
        cache: &mut ComputedCache,
    ) -> ResolveResult<Resolution> {
        let span = info_span!("resolve_contract", computed = contract.computed.len());
        let _guard = span.enter();

        let mut context =
            Context::from_contract(contract, state_override, self.options.state_precedence);
        let reused = cache.bind(fingerprint(&context, &contract.computed, &self.options));

        let mut warnings = Vec::new();
        let graph = DependencyGraph::build(&contract.computed, &mut warnings);
        let order = evaluation_order(&graph)?;
        debug!(order = ?order, reused_cache = reused, "computed evaluation order");

        ExpressionEvaluator::new(&contract.computed, self.options).evaluate_all(
            &order,
            &mut context,
            cache,
        )?;

        let root_element = TreeSubstitutor::new(&context, self.options)
            .substitute(&contract.root_element, Location::root(ROOT_ELEMENT_KEY))?;

        Ok(Resolution {
            output: ResolvedContract { root_element },
            computed: context.into_computed(),
            order,
            warnings,
        })
    }

    /// Resolves raw documents: a contract and an optional state override.
    ///
    /// A `null` override is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns a domain error if either document has the wrong shape, or the
    /// resolution error.
    pub fn resolve_document(
        &self,
        contract: Value,
        state_override: Option<Value>,
    ) -> ApplicationResult<Resolution> {
        let contract = Contract::from_value(contract)?;
        let state_override = match state_override {
            Some(value) => state_override_from_value(value)?,
            None => None,
        };
        Ok(self.resolve(&contract, state_override.as_ref())?)
    }
}
