//! Dependency graph over computed fields

use std::sync::LazyLock;

use indexmap::{IndexMap, IndexSet};
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};
use trellis_domain::placeholder::PLACEHOLDER_OPEN;
use trellis_domain::{ComputedDefinition, ResolveError, ResolveWarning};

use super::parser::parse_placeholder;

static PLACEHOLDER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{[^}]*\}").expect("placeholder pattern is valid"));

/// Adjacency mapping from each computed field to the fields it reads.
///
/// Keys follow declaration order; each dependency set follows the order
/// references first appear in the definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    edges: IndexMap<String, IndexSet<String>>,
}

impl DependencyGraph {
    /// Scans computed definitions for `${computed.<name>}` references.
    ///
    /// Malformed placeholders and references to undeclared fields do not
    /// fail the build; they are appended to `warnings`.
    pub fn build(
        definitions: &IndexMap<String, ComputedDefinition>,
        warnings: &mut Vec<ResolveWarning>,
    ) -> Self {
        let mut edges = IndexMap::with_capacity(definitions.len());

        for (name, definition) in definitions {
            let mut scan = Scan {
                field: name,
                declared: definitions,
                dependencies: IndexSet::new(),
                warnings: &mut *warnings,
            };

            let mut pending: Vec<&Value> = Vec::new();
            match definition {
                ComputedDefinition::Template(text) => scan.text(text),
                ComputedDefinition::Conditional(conditional) => pending.extend([
                    &conditional.else_branch,
                    &conditional.then_branch,
                    &conditional.condition,
                ]),
                ComputedDefinition::Nested(value) => pending.push(value),
            }

            // Children are pushed in reverse so they pop in document order.
            while let Some(value) = pending.pop() {
                match value {
                    Value::String(text) => scan.text(text),
                    Value::Array(items) => pending.extend(items.iter().rev()),
                    Value::Object(map) => pending.extend(map.values().rev()),
                    _ => {}
                }
            }

            debug!(field = %name, dependencies = ?scan.dependencies, "scanned computed field");
            edges.insert(name.clone(), scan.dependencies);
        }

        Self { edges }
    }

    /// Field names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.edges.keys().map(String::as_str)
    }

    /// The fields `name` reads, if `name` is in the graph.
    #[must_use]
    pub fn dependencies(&self, name: &str) -> Option<&IndexSet<String>> {
        self.edges.get(name)
    }

    /// Returns true if `name` is a node of the graph.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.edges.contains_key(name)
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns true if there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Iterates `(field, dependencies)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexSet<String>)> {
        self.edges.iter().map(|(name, deps)| (name.as_str(), deps))
    }
}

impl<N, D> FromIterator<(N, D)> for DependencyGraph
where
    N: Into<String>,
    D: IntoIterator,
    D::Item: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (N, D)>>(iter: T) -> Self {
        let edges = iter
            .into_iter()
            .map(|(name, deps)| (name.into(), deps.into_iter().map(Into::into).collect()))
            .collect();
        Self { edges }
    }
}

struct Scan<'a> {
    field: &'a str,
    declared: &'a IndexMap<String, ComputedDefinition>,
    dependencies: IndexSet<String>,
    warnings: &'a mut Vec<ResolveWarning>,
}

impl Scan<'_> {
    fn text(&mut self, text: &str) {
        let mut tail = 0;

        for found in PLACEHOLDER_PATTERN.find_iter(text) {
            tail = found.end();
            match parse_placeholder(found.as_str()) {
                Ok(path) => {
                    let Some(dependency) = path.computed_dependency() else {
                        continue;
                    };
                    if !self.declared.contains_key(dependency) {
                        self.warn(
                            found.as_str(),
                            format!("reference to undeclared computed field `{dependency}`"),
                        );
                    }
                    self.dependencies.insert(dependency.to_string());
                }
                Err(ResolveError::MalformedPlaceholder { reason, .. }) => {
                    self.warn(found.as_str(), reason);
                }
                Err(other) => self.warn(found.as_str(), other.to_string()),
            }
        }

        if let Some(offset) = text[tail..].find(PLACEHOLDER_OPEN) {
            self.warn(&text[tail + offset..], "missing closing `}`".to_string());
        }
    }

    fn warn(&mut self, placeholder: &str, message: String) {
        warn!(
            field = %self.field,
            placeholder = %placeholder,
            "{message}"
        );
        self.warnings
            .push(ResolveWarning::new(self.field, placeholder, message));
    }
}
