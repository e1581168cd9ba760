//! Placeholder parser for `${path}` syntax
//!
//! Finds placeholders in strings and parses each one into a
//! [`PlaceholderPath`].

use std::iter::Peekable;
use std::ops::Range;
use std::str::Chars;

use trellis_domain::placeholder::{PLACEHOLDER_CLOSE, PLACEHOLDER_OPEN};
use trellis_domain::{PlaceholderPath, ResolveError, ResolveResult, Segment};

/// A placeholder occurrence inside a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderToken<'a> {
    /// The placeholder text, including `${` and `}`.
    pub raw: &'a str,

    /// Byte range in the scanned string.
    pub span: Range<usize>,
}

impl PlaceholderToken<'_> {
    /// Returns true if this token covers all of `input`.
    #[must_use]
    pub fn covers(&self, input: &str) -> bool {
        self.span.start == 0 && self.span.end == input.len()
    }
}

/// Returns true if the input contains placeholder syntax at all.
#[must_use]
pub fn has_placeholders(input: &str) -> bool {
    input.contains(PLACEHOLDER_OPEN)
}

/// Finds every `${...}` occurrence in the input, in order.
///
/// # Examples
///
/// ```
/// use trellis_application::resolver::parser::scan_placeholders;
///
/// let tokens = scan_placeholders("Hello ${state.name}, you have ${data.count} items").unwrap();
/// assert_eq!(tokens.len(), 2);
/// assert_eq!(tokens[0].raw, "${state.name}");
/// assert_eq!(tokens[1].raw, "${data.count}");
/// ```
///
/// # Errors
///
/// Returns `MalformedPlaceholder` for a `${` without a closing `}` or with
/// another `${` before its closing `}`.
pub fn scan_placeholders(input: &str) -> ResolveResult<Vec<PlaceholderToken<'_>>> {
    let mut tokens = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = input[cursor..].find(PLACEHOLDER_OPEN) {
        let start = cursor + offset;
        let body = start + PLACEHOLDER_OPEN.len();

        let Some(close) = input[body..].find(PLACEHOLDER_CLOSE) else {
            return Err(ResolveError::malformed(
                &input[start..],
                "missing closing `}`",
            ));
        };
        let end = body + close + PLACEHOLDER_CLOSE.len_utf8();

        if input[body..body + close].contains(PLACEHOLDER_OPEN) {
            return Err(ResolveError::malformed(
                &input[start..end],
                "nested `${` before closing `}`",
            ));
        }

        tokens.push(PlaceholderToken {
            raw: &input[start..end],
            span: start..end,
        });
        cursor = end;
    }

    Ok(tokens)
}

/// Parses a placeholder of the exact form `${path}`.
///
/// Paths are dot-separated identifiers with optional bracket segments:
/// `[0]` is an index, `['key']` and `["key"]` are keys.
///
/// # Examples
///
/// ```
/// use trellis_application::resolver::parser::parse_placeholder;
/// use trellis_domain::Segment;
///
/// let path = parse_placeholder("${data.items[0]['display name']}").unwrap();
/// assert_eq!(
///     path.segments(),
///     &[
///         Segment::Key("data".into()),
///         Segment::Key("items".into()),
///         Segment::Index(0),
///         Segment::Key("display name".into()),
///     ]
/// );
/// ```
///
/// # Errors
///
/// Returns `MalformedPlaceholder` if the text is not a single well-formed
/// placeholder.
pub fn parse_placeholder(raw: &str) -> ResolveResult<PlaceholderPath> {
    let inner = raw
        .strip_prefix(PLACEHOLDER_OPEN)
        .and_then(|rest| rest.strip_suffix(PLACEHOLDER_CLOSE))
        .ok_or_else(|| ResolveError::malformed(raw, "expected the form `${path}`"))?;

    if inner.contains(PLACEHOLDER_OPEN) {
        return Err(ResolveError::malformed(
            raw,
            "nested `${` before closing `}`",
        ));
    }
    if inner.contains(['{', '}']) {
        return Err(ResolveError::malformed(raw, "unbalanced braces"));
    }

    let inner = inner.trim();
    if inner.is_empty() {
        return Err(ResolveError::malformed(raw, "empty path"));
    }

    let segments = parse_segments(inner).map_err(|reason| ResolveError::malformed(raw, reason))?;
    Ok(PlaceholderPath::new(raw, segments))
}

fn parse_segments(path: &str) -> Result<Vec<Segment>, String> {
    let mut chars = path.chars().peekable();
    let first = read_identifier(&mut chars).ok_or("path must start with an identifier")?;
    let mut segments = vec![Segment::Key(first)];

    while let Some(ch) = chars.next() {
        match ch {
            '.' => {
                let key = read_identifier(&mut chars).ok_or("expected an identifier after `.`")?;
                segments.push(Segment::Key(key));
            }
            '[' => segments.push(read_bracket(&mut chars)?),
            other => return Err(format!("unexpected character `{other}`")),
        }
    }

    Ok(segments)
}

fn read_identifier(chars: &mut Peekable<Chars<'_>>) -> Option<String> {
    let mut ident = String::new();
    while let Some(&ch) = chars.peek() {
        if matches!(ch, '.' | '[' | ']') {
            break;
        }
        ident.push(ch);
        chars.next();
    }
    (!ident.is_empty()).then_some(ident)
}

fn read_bracket(chars: &mut Peekable<Chars<'_>>) -> Result<Segment, String> {
    if let Some(quote @ ('\'' | '"')) = chars.peek().copied() {
        chars.next(); // consume opening quote
        let mut key = String::new();
        loop {
            match chars.next() {
                Some(ch) if ch == quote => break,
                Some(ch) => key.push(ch),
                None => return Err("unterminated quoted key".to_string()),
            }
        }
        return match chars.next() {
            Some(']') => Ok(Segment::Key(key)),
            _ => Err("expected `]` after quoted key".to_string()),
        };
    }

    let mut digits = String::new();
    loop {
        match chars.next() {
            Some(']') => break,
            Some(ch) => digits.push(ch),
            None => return Err("unclosed `[`".to_string()),
        }
    }

    let digits = digits.trim();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("invalid index `{digits}`"));
    }
    digits
        .parse::<usize>()
        .map(Segment::Index)
        .map_err(|_| format!("index `{digits}` is out of range"))
}
