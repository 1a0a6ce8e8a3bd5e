//! Dotted / quoted key path grammar.
//!
//! A key such as `database.ports.value` addresses nested trees. Segments
//! are separated by `.`; a span delimited by a matching pair of `'` or `"`
//! is taken verbatim, so `host."1.0.0.1".name` has three segments. A quote
//! character without a partner later in the key is an ordinary character.
//! Empty segments are real keys and are never collapsed.

use std::fmt;

use crate::error::ConfigError;

/// Parse a key into its path segments.
///
/// ```
/// use conftree::tree::key::parse_key;
///
/// assert_eq!(parse_key("host.\"1.0.0.1\".name"), vec!["host", "1.0.0.1", "name"]);
/// assert_eq!(parse_key(".there."), vec!["", "there", ""]);
/// assert_eq!(parse_key(""), vec![""]);
/// ```
pub fn parse_key(key: &str) -> Vec<String> {
    let chars: Vec<char> = key.chars().collect();
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '.' => segments.push(std::mem::take(&mut current)),
            '"' | '\'' => match chars[i + 1..].iter().position(|&q| q == c) {
                Some(offset) => {
                    let close = i + 1 + offset;
                    current.extend(&chars[i + 1..close]);
                    i = close;
                }
                None => current.push(c),
            },
            _ => current.push(c),
        }
        i += 1;
    }

    segments.push(current);
    segments
}

/// Parse a key supplied as an untyped JSON value.
///
/// Only strings are keys; null, booleans, numbers, arrays, and objects are
/// rejected with [`ConfigError::KeyType`].
pub fn parse_key_value(key: &serde_json::Value) -> Result<Vec<String>, ConfigError> {
    match key {
        serde_json::Value::String(s) => Ok(parse_key(s)),
        other => Err(ConfigError::KeyType {
            found: json_kind(other),
        }),
    }
}

pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Whether `key` is entirely one quoted span, e.g. `"pass.word"`.
pub(crate) fn is_quoted(key: &str) -> bool {
    let bytes = key.as_bytes();
    bytes.len() >= 2
        && matches!(bytes[0], b'"' | b'\'')
        && bytes[bytes.len() - 1] == bytes[0]
        && !key[1..key.len() - 1].contains(bytes[0] as char)
}

/// Whether `key` parses back to itself as a single segment.
pub(crate) fn is_literal(key: &str) -> bool {
    matches!(parse_key(key).as_slice(), [only] if only == key)
}

/// Wrap `segment` in quotes, using `'` when it already contains `"`.
pub(crate) fn quote(segment: &str) -> String {
    let q = if segment.contains('"') { '\'' } else { '"' };
    format!("{q}{segment}{q}")
}

/// Storage form of a literal map key: keys that would not survive
/// [`parse_key`] (dots, paired quotes) are quoted so later lookups reach
/// them.
pub(crate) fn storage_key(key: String) -> String {
    if is_literal(&key) || is_quoted(&key) {
        key
    } else {
        quote(&key)
    }
}

/// A parsed key path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    pub fn parse(key: &str) -> Self {
        Self(parse_key(key))
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn into_segments(self) -> Vec<String> {
        self.0
    }
}

impl From<&str> for KeyPath {
    fn from(key: &str) -> Self {
        Self::parse(key)
    }
}

impl TryFrom<&serde_json::Value> for KeyPath {
    type Error = ConfigError;

    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        parse_key_value(value).map(Self)
    }
}

/// Renders the path back into key syntax, quoting segments that need it.
impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            if !is_literal(segment) {
                f.write_str(&quote(segment))?;
            } else {
                f.write_str(segment)?;
            }
        }
        Ok(())
    }
}
