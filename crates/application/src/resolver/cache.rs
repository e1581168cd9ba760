//! Memoization of computed values across resolution runs

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::debug;
use trellis_domain::{ComputedDefinition, Context, ResolveOptions};

/// Computed values memoized for one contract.
///
/// The cache is bound to a fingerprint of the contract inputs before each
/// run. Binding to a different fingerprint discards everything recorded so
/// far, so a cache can be reused freely between runs without leaking values
/// from one contract into another.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputedCache {
    fingerprint: Option<u64>,
    values: IndexMap<String, Value>,
}

impl ComputedCache {
    /// Creates an empty, unbound cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the cache to a contract fingerprint.
    ///
    /// Returns `true` if previously recorded values were kept.
    pub fn bind(&mut self, fingerprint: u64) -> bool {
        if self.fingerprint == Some(fingerprint) {
            return true;
        }
        if !self.values.is_empty() {
            debug!(
                discarded = self.values.len(),
                "computed cache bound to a different contract"
            );
        }
        self.values.clear();
        self.fingerprint = Some(fingerprint);
        false
    }

    /// The fingerprint the cache is bound to.
    #[must_use]
    pub const fn fingerprint(&self) -> Option<u64> {
        self.fingerprint
    }

    /// Returns a memoized value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Records an evaluated value.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    /// Returns true if a value is memoized for `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of memoized values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing is memoized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Drops all values and the binding.
    pub fn clear(&mut self) {
        self.values.clear();
        self.fingerprint = None;
    }
}

/// Hashes the inputs computed values depend on: data, merged state, the
/// computed definitions and the options they were evaluated under.
#[must_use]
pub fn fingerprint(
    context: &Context,
    definitions: &IndexMap<String, ComputedDefinition>,
    options: &ResolveOptions,
) -> u64 {
    let mut hasher = DefaultHasher::new();
    options.hash(&mut hasher);
    hash_map(&mut hasher, context.data());
    hash_map(&mut hasher, context.state());
    definitions.len().hash(&mut hasher);
    for (name, definition) in definitions {
        name.hash(&mut hasher);
        definition.to_value().to_string().hash(&mut hasher);
    }
    hasher.finish()
}

fn hash_map(hasher: &mut DefaultHasher, map: &Map<String, Value>) {
    map.len().hash(hasher);
    for (key, value) in map {
        key.hash(hasher);
        value.to_string().hash(hasher);
    }
}
