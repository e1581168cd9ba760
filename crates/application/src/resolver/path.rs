//! Path resolution against the lookup context
//!
//! Walks a parsed [`PlaceholderPath`] through the `data`, `state` and
//! `computed` scopes of a [`Context`].

use serde_json::{Map, Value};
use trellis_domain::context::SCOPES;
use trellis_domain::{Context, PlaceholderPath, ResolveError, ResolveResult, Segment};

/// Placeholders currently being resolved, outermost first.
///
/// Threaded through every recursive substitution so that a placeholder
/// whose value leads back to itself is reported instead of looping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionStack {
    entries: Vec<String>,
}

impl ResolutionStack {
    /// Creates an empty stack.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Marks a placeholder as in flight.
    pub fn push(&mut self, raw: &str) {
        self.entries.push(raw.to_string());
    }

    /// Removes the innermost placeholder.
    pub fn pop(&mut self) -> Option<String> {
        self.entries.pop()
    }

    /// Returns true if the placeholder is already in flight.
    #[must_use]
    pub fn contains(&self, raw: &str) -> bool {
        self.entries.iter().any(|entry| entry == raw)
    }

    /// In-flight placeholders, outermost first.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Number of placeholders in flight.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolves a parsed path against the context.
///
/// A member missing at the last segment resolves to `null`. Anything that
/// stops the walk earlier is an error naming the segment the walk could not
/// descend through: a missing member, or a member holding a scalar or
/// `null`, along with the keys available beside it.
///
/// # Errors
///
/// - `CircularReference` if the placeholder is already on `stack`
/// - `UnresolvablePath` if the scope is unknown or the walk cannot continue
pub fn resolve_path(
    context: &Context,
    path: &PlaceholderPath,
    stack: &ResolutionStack,
) -> ResolveResult<Value> {
    if stack.contains(path.raw()) {
        return Err(ResolveError::CircularReference {
            chain: stack.entries().to_vec(),
            reference: path.raw().to_string(),
        });
    }

    let Some((first, rest)) = path.segments().split_first() else {
        return Err(ResolveError::malformed(path.raw(), "empty path"));
    };

    let scope = first.as_key().and_then(|name| context.scope(name));
    let Some(scope) = scope else {
        let scopes = SCOPES.iter().map(|s| (*s).to_string()).collect();
        return Err(unresolvable(path, first, scopes));
    };

    // The container the current level was found in, and the segment used.
    let mut parent = (Level::Scope(scope), first);
    let mut current = Level::Scope(scope);
    for (position, segment) in rest.iter().enumerate() {
        let is_last = position + 1 == rest.len();
        match current.child(segment) {
            Lookup::Found(value) => {
                parent = (current, segment);
                current = Level::Value(value);
            }
            Lookup::Missing if is_last => return Ok(Value::Null),
            Lookup::Missing => return Err(unresolvable(path, segment, current.available())),
            Lookup::NotContainer => {
                let (level, through) = parent;
                return Err(unresolvable(path, through, level.available()));
            }
        }
    }

    Ok(current.to_value())
}

#[derive(Clone, Copy)]
enum Level<'a> {
    Scope(&'a Map<String, Value>),
    Value(&'a Value),
}

enum Lookup<'a> {
    Found(&'a Value),
    Missing,
    NotContainer,
}

impl<'a> Level<'a> {
    fn child(self, segment: &Segment) -> Lookup<'a> {
        match self {
            Self::Scope(map) | Self::Value(Value::Object(map)) => member(map, segment),
            Self::Value(Value::Array(items)) => {
                let index = match segment {
                    Segment::Index(index) => Some(*index),
                    Segment::Key(key) => key.parse::<usize>().ok(),
                };
                index
                    .and_then(|i| items.get(i))
                    .map_or(Lookup::Missing, Lookup::Found)
            }
            Self::Value(_) => Lookup::NotContainer,
        }
    }

    fn available(self) -> Vec<String> {
        match self {
            Self::Scope(map) | Self::Value(Value::Object(map)) => map.keys().cloned().collect(),
            Self::Value(Value::Array(items)) if !items.is_empty() => {
                vec![format!("[0]..[{}]", items.len() - 1)]
            }
            Self::Value(_) => Vec::new(),
        }
    }

    fn to_value(self) -> Value {
        match self {
            Self::Scope(map) => Value::Object(map.clone()),
            Self::Value(value) => value.clone(),
        }
    }
}

fn member<'a>(map: &'a Map<String, Value>, segment: &Segment) -> Lookup<'a> {
    let found = match segment {
        Segment::Key(key) => map.get(key),
        Segment::Index(index) => map.get(&index.to_string()),
    };
    found.map_or(Lookup::Missing, Lookup::Found)
}

fn unresolvable(path: &PlaceholderPath, segment: &Segment, available: Vec<String>) -> ResolveError {
    ResolveError::UnresolvablePath {
        path: path.dotted(),
        segment: segment.to_string(),
        available,
    }
}
