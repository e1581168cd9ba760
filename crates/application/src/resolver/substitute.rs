//! Tree-wide placeholder substitution
//!
//! [`TreeSubstitutor`] turns a value containing placeholders into a
//! placeholder-free copy, borrowing the context immutably. The same walk is
//! used for computed definitions and for the `rootElement` tree.
//!
//! The walk keeps its pending work on an explicit frame stack instead of the
//! call stack, so only `max_depth` bounds how deep a placeholder chain or a
//! nested tree may go.

use std::ops::Range;

use serde_json::{Map, Value, map};
use tracing::trace;
use trellis_domain::computed::{CONDITION_KEY, ELSE_KEY, THEN_KEY};
use trellis_domain::node::{CHILDREN_DIRECTIVE, CHILDREN_KEY, TYPE_KEY, is_control_key};
use trellis_domain::{
    ConditionalRef, Context, Location, ResolveError, ResolveOptions, ResolveResult,
};

use super::parser::{has_placeholders, parse_placeholder, scan_placeholders};
use super::path::{ResolutionStack, resolve_path};
use super::value::{is_artifact, is_truthy, push_text};

/// Substitutes placeholders against a fixed context.
#[derive(Debug, Clone, Copy)]
pub struct TreeSubstitutor<'a> {
    context: &'a Context,
    options: ResolveOptions,
}

impl<'a> TreeSubstitutor<'a> {
    /// Creates a substitutor over `context`.
    #[must_use]
    pub const fn new(context: &'a Context, options: ResolveOptions) -> Self {
        Self { context, options }
    }

    /// Resolves any value, starting at `location`.
    ///
    /// # Errors
    ///
    /// Returns the first resolution error, annotated with the tree location
    /// it was raised at.
    pub fn substitute(&self, value: &Value, location: Location) -> ResolveResult<Value> {
        self.walk(location).run(|walk| walk.enter(value.clone()))
    }

    /// Resolves a string: a lone placeholder yields the referenced value,
    /// embedded placeholders are interpolated into text.
    ///
    /// # Errors
    ///
    /// See [`TreeSubstitutor::substitute`].
    pub fn substitute_text(&self, text: &str, location: Location) -> ResolveResult<Value> {
        self.walk(location)
            .run(|walk| walk.enter(Value::String(text.to_string())))
    }

    /// Resolves a conditional node to its chosen branch.
    ///
    /// # Errors
    ///
    /// See [`TreeSubstitutor::substitute`].
    pub fn substitute_conditional(
        &self,
        node: ConditionalRef<'_>,
        location: Location,
    ) -> ResolveResult<Value> {
        self.walk(location).run(|walk| {
            walk.descend()?;
            walk.conditional(
                node.condition.clone(),
                node.then_branch.clone(),
                node.else_branch.clone(),
            )
        })
    }

    fn walk(&self, location: Location) -> Walk<'a> {
        Walk {
            context: self.context,
            options: self.options,
            stack: ResolutionStack::new(),
            location,
            depth: 0,
            frames: Vec::new(),
        }
    }
}

/// What the walk does next.
enum Step {
    /// Resolve a value on top of the current frames.
    Enter(Value),
    /// Hand a resolved value to the innermost frame.
    Return(Value),
}

/// A placeholder found in an interpolated string.
struct Token {
    raw: String,
    span: Range<usize>,
}

/// Work suspended while a nested value resolves.
enum Frame {
    /// Leaves one level of depth.
    Leave,
    /// Takes a placeholder off the resolution stack.
    Placeholder,
    /// Interpolates `tokens[next]` into `out`.
    Interpolate {
        text: String,
        tokens: Vec<Token>,
        next: usize,
        out: String,
    },
    Sequence {
        items: std::vec::IntoIter<Value>,
        index: usize,
        out: Vec<Value>,
    },
    /// Stores the pending value under `key`.
    Mapping {
        entries: map::IntoIter,
        has_children: bool,
        out: Map<String, Value>,
        key: String,
    },
    Children {
        references: std::vec::IntoIter<Value>,
        index: usize,
        out: Vec<Value>,
    },
    /// Picks a branch once the condition resolves.
    Condition { then_branch: Value, else_branch: Value },
    Branch,
}

/// State of one substitution.
struct Walk<'a> {
    context: &'a Context,
    options: ResolveOptions,
    stack: ResolutionStack,
    location: Location,
    depth: usize,
    frames: Vec<Frame>,
}

impl Walk<'_> {
    fn run(
        mut self,
        start: impl FnOnce(&mut Self) -> ResolveResult<Step>,
    ) -> ResolveResult<Value> {
        let mut step = start(&mut self)?;
        loop {
            step = match step {
                Step::Enter(value) => self.enter(value)?,
                Step::Return(value) => match self.frames.pop() {
                    Some(frame) => self.resume(frame, value)?,
                    None => return Ok(value),
                },
            };
        }
    }

    /// Counts one level of depth, failing once the limit is reached.
    fn descend(&mut self) -> ResolveResult<()> {
        if self.depth >= self.options.max_depth {
            return Err(ResolveError::DepthExceeded {
                limit: self.options.max_depth,
                location: self.location.to_string(),
            });
        }
        self.depth += 1;
        self.frames.push(Frame::Leave);
        Ok(())
    }

    fn enter(&mut self, value: Value) -> ResolveResult<Step> {
        self.descend()?;
        match value {
            Value::String(text) => self.text(text),
            Value::Array(items) => self.sequence(items.into_iter(), 0, Vec::new()),
            Value::Object(mut map) => {
                if ConditionalRef::from_map(&map).is_none() {
                    let has_children = map.contains_key(CHILDREN_DIRECTIVE);
                    return self.mapping(map.into_iter(), has_children, Map::new());
                }
                let condition = map.remove(CONDITION_KEY).unwrap_or(Value::Null);
                let then_branch = map.remove(THEN_KEY).unwrap_or(Value::Null);
                let else_branch = map.remove(ELSE_KEY).unwrap_or(Value::Null);
                self.conditional(condition, then_branch, else_branch)
            }
            scalar => Ok(Step::Return(scalar)),
        }
    }

    fn resume(&mut self, frame: Frame, value: Value) -> ResolveResult<Step> {
        match frame {
            Frame::Leave => {
                self.depth -= 1;
                Ok(Step::Return(value))
            }
            Frame::Placeholder => {
                self.stack.pop();
                Ok(Step::Return(value))
            }
            Frame::Interpolate {
                text,
                tokens,
                next,
                mut out,
            } => {
                let token = &tokens[next];
                push_text(&mut out, &value, self.options.coercion).map_err(|kind| {
                    ResolveError::NonScalarInterpolation {
                        placeholder: token.raw.clone(),
                        kind,
                    }
                    .at(&self.location)
                })?;
                let last_end = token.span.end;

                let Some(upcoming) = tokens.get(next + 1) else {
                    out.push_str(&text[last_end..]);
                    return Ok(Step::Return(Value::String(out)));
                };
                out.push_str(&text[last_end..upcoming.span.start]);
                let raw = upcoming.raw.clone();
                self.frames.push(Frame::Interpolate {
                    text,
                    tokens,
                    next: next + 1,
                    out,
                });
                self.placeholder(&raw)
            }
            Frame::Sequence {
                items,
                index,
                mut out,
            } => {
                self.location.pop();
                if !is_artifact(&value) {
                    out.push(value);
                }
                self.sequence(items, index + 1, out)
            }
            Frame::Mapping {
                entries,
                has_children,
                mut out,
                key,
            } => {
                self.location.pop();
                out.insert(key, value);
                self.mapping(entries, has_children, out)
            }
            Frame::Children {
                references,
                index,
                mut out,
            } => {
                self.location.pop();
                match value {
                    Value::Array(items) => {
                        out.extend(items.into_iter().filter(|child| !is_artifact(child)));
                    }
                    child if is_artifact(&child) => {}
                    child => out.push(child),
                }
                self.children(references, index + 1, out)
            }
            Frame::Condition {
                then_branch,
                else_branch,
            } => {
                self.location.pop();
                let (key, branch) = if is_truthy(&value) {
                    (THEN_KEY, then_branch)
                } else {
                    (ELSE_KEY, else_branch)
                };
                self.location.push_key(key);
                self.frames.push(Frame::Branch);
                Ok(Step::Enter(branch))
            }
            Frame::Branch => {
                self.location.pop();
                Ok(Step::Return(value))
            }
        }
    }

    fn text(&mut self, text: String) -> ResolveResult<Step> {
        if !has_placeholders(&text) {
            return Ok(Step::Return(Value::String(text)));
        }

        let found = scan_placeholders(&text).map_err(|err| err.at(&self.location))?;
        if let [token] = found.as_slice()
            && token.covers(&text)
        {
            return self.placeholder(token.raw);
        }

        let tokens: Vec<Token> = found
            .iter()
            .map(|token| Token {
                raw: token.raw.to_string(),
                span: token.span.clone(),
            })
            .collect();
        let Some(first) = tokens.first() else {
            return Ok(Step::Return(Value::String(text)));
        };

        let mut out = String::with_capacity(text.len());
        out.push_str(&text[..first.span.start]);
        let raw = first.raw.clone();
        self.frames.push(Frame::Interpolate {
            text,
            tokens,
            next: 0,
            out,
        });
        self.placeholder(&raw)
    }

    /// Resolves one placeholder and substitutes the value it points at.
    fn placeholder(&mut self, raw: &str) -> ResolveResult<Step> {
        let path = parse_placeholder(raw).map_err(|err| err.at(&self.location))?;
        let resolved = resolve_path(self.context, &path, &self.stack)
            .map_err(|err| err.at(&self.location))?;
        trace!(placeholder = raw, location = %self.location, "resolved placeholder");

        self.stack.push(raw);
        self.frames.push(Frame::Placeholder);
        Ok(Step::Enter(resolved))
    }

    fn sequence(
        &mut self,
        mut items: std::vec::IntoIter<Value>,
        index: usize,
        out: Vec<Value>,
    ) -> ResolveResult<Step> {
        let Some(item) = items.next() else {
            return Ok(Step::Return(Value::Array(out)));
        };
        self.location.push_index(index);
        self.frames.push(Frame::Sequence { items, index, out });
        Ok(Step::Enter(item))
    }

    fn mapping(
        &mut self,
        mut entries: map::IntoIter,
        has_children: bool,
        mut out: Map<String, Value>,
    ) -> ResolveResult<Step> {
        while let Some((key, value)) = entries.next() {
            if key == CHILDREN_DIRECTIVE {
                let references = match value {
                    Value::Array(items) => items,
                    single => vec![single],
                };
                self.location.push_key(CHILDREN_KEY);
                self.frames.push(Frame::Mapping {
                    entries,
                    has_children,
                    out,
                    key: CHILDREN_KEY.to_string(),
                });
                return self.children(references.into_iter(), 0, Vec::new());
            } else if key == TYPE_KEY {
                out.insert(key, value);
            } else if is_control_key(&key) || (has_children && key == CHILDREN_KEY) {
                trace!(key = %key, location = %self.location, "dropped key");
            } else {
                self.location.push_key(key.as_str());
                self.frames.push(Frame::Mapping {
                    entries,
                    has_children,
                    out,
                    key,
                });
                return Ok(Step::Enter(value));
            }
        }

        Ok(Step::Return(Value::Object(out)))
    }

    /// Resolves a `$children` list, flattening entries that resolve to
    /// sequences and dropping artifacts.
    fn children(
        &mut self,
        mut references: std::vec::IntoIter<Value>,
        index: usize,
        out: Vec<Value>,
    ) -> ResolveResult<Step> {
        let Some(reference) = references.next() else {
            return Ok(Step::Return(Value::Array(out)));
        };
        self.location.push_index(index);
        self.frames.push(Frame::Children {
            references,
            index,
            out,
        });
        Ok(Step::Enter(reference))
    }

    fn conditional(
        &mut self,
        condition: Value,
        then_branch: Value,
        else_branch: Value,
    ) -> ResolveResult<Step> {
        self.location.push_key(CONDITION_KEY);
        self.frames.push(Frame::Condition {
            then_branch,
            else_branch,
        });
        Ok(Step::Enter(condition))
    }
}
