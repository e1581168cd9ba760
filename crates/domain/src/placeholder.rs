//! Parsed placeholder paths
//!
//! A placeholder `${data.items[0]['display name']}` parses into an ordered
//! list of [`Segment`]s. Parsing lives in the application layer; this module
//! only holds the parsed form.

use std::fmt;

use crate::context::COMPUTED_SCOPE;

/// Opening marker of a placeholder.
pub const PLACEHOLDER_OPEN: &str = "${";

/// Closing marker of a placeholder.
pub const PLACEHOLDER_CLOSE: char = '}';

/// One accessor in a placeholder path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Property access: `.name` or `['name']`.
    Key(String),
    /// Sequence index: `[0]`.
    Index(usize),
}

impl Segment {
    /// Returns the key if this is a property segment.
    #[must_use]
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Self::Key(key) => Some(key),
            Self::Index(_) => None,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(f, "{key}"),
            Self::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// A parsed `${...}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlaceholderPath {
    raw: String,
    segments: Vec<Segment>,
}

impl PlaceholderPath {
    /// Creates a path from its raw placeholder text and parsed segments.
    pub fn new(raw: impl Into<String>, segments: Vec<Segment>) -> Self {
        Self {
            raw: raw.into(),
            segments,
        }
    }

    /// The placeholder exactly as written, including `${` and `}`.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The parsed segments.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The scope the path starts in (`data`, `state` or `computed`).
    #[must_use]
    pub fn scope(&self) -> Option<&str> {
        self.segments.first().and_then(Segment::as_key)
    }

    /// Returns the computed field name when the path reads `computed.<name>`.
    #[must_use]
    pub fn computed_dependency(&self) -> Option<&str> {
        match self.segments.as_slice() {
            [Segment::Key(scope), Segment::Key(name), ..] if scope == COMPUTED_SCOPE => Some(name),
            _ => None,
        }
    }

    /// Dotted rendering used in diagnostics, e.g. `data.items[0].title`.
    #[must_use]
    pub fn dotted(&self) -> String {
        let mut out = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 && matches!(segment, Segment::Key(_)) {
                out.push('.');
            }
            out.push_str(&segment.to_string());
        }
        out
    }
}

impl fmt::Display for PlaceholderPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
