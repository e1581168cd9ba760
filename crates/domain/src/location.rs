//! Logical positions inside a contract, used to annotate errors.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Key(String),
    Index(usize),
}

/// A path into the contract such as `rootElement.content.children[2]`.
///
/// Used as a push/pop stack while walking a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    steps: Vec<Step>,
}

impl Location {
    /// Creates a location rooted at the given top-level key.
    pub fn root(key: impl Into<String>) -> Self {
        Self {
            steps: vec![Step::Key(key.into())],
        }
    }

    /// Descends into a mapping key.
    pub fn push_key(&mut self, key: impl Into<String>) {
        self.steps.push(Step::Key(key.into()));
    }

    /// Descends into a sequence index.
    pub fn push_index(&mut self, index: usize) {
        self.steps.push(Step::Index(index));
    }

    /// Returns to the parent position. The root is never popped.
    pub fn pop(&mut self) {
        if self.steps.len() > 1 {
            self.steps.pop();
        }
    }

    /// Number of steps below the root.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.steps.len() - 1
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                Step::Key(key) if i == 0 => write!(f, "{key}")?,
                Step::Key(key) => write!(f, ".{key}")?,
                Step::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}
