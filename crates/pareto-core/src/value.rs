//! Typed parameter values.
//!
//! A [`Value`] is what a raw parameter text becomes after coercion. Its
//! [`Display`](fmt::Display) implementation writes the canonical directive
//! text for the value, which coerces back to an equal value.

use std::fmt;

use serde::Serialize;

/// Words that coerce to something other than a plain string when written bare.
const RESERVED_WORDS: [&str; 4] = ["true", "false", "null", "none"];

/// The distinguished depth value meaning "unbounded".
pub const COMPLETE: &str = "complete";

/// A typed directive parameter value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
}

impl Value {
    /// Create a string value.
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    /// Returns the string content if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the numeric value of an integer or float.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Returns `true` for the distinguished `"complete"` string.
    pub fn is_complete(&self) -> bool {
        self.as_str() == Some(COMPLETE)
    }

    /// Short human-readable name of the value's kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            // Debug keeps a fractional part or exponent, so `1.0` never reads back as an integer
            Value::Float(x) => write!(f, "{x:?}"),
            Value::String(s) => write_string(f, s),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Write a string bare when that reads back as the same string, quoted otherwise.
///
/// A quoted span ends at the first matching quote, and the text after it is
/// read as ordinary value text. A quote character therefore works as long as
/// no delimiter follows its first occurrence inside the string. Quoted text
/// has no escape processing, so a string where neither quote works cannot be
/// written losslessly.
fn write_string(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    if is_bare(s) {
        return f.write_str(s);
    }
    let last_delimiter = s.rfind([',', '}', '[', ']']);
    let quote = ['"', '\'']
        .into_iter()
        .find(|&q| match (s.find(q), last_delimiter) {
            (None, _) | (Some(_), None) => true,
            (Some(first), Some(last)) => first > last,
        })
        .unwrap_or('"');
    write!(f, "{quote}{s}{quote}")
}

/// Whether bare text `s` coerces back to exactly the string `s`.
fn is_bare(s: &str) -> bool {
    !s.is_empty()
        && s.trim() == s
        && !s.starts_with(['"', '\''])
        && !s.contains([',', '{', '}', '[', ']'])
        && !RESERVED_WORDS.iter().any(|w| s.eq_ignore_ascii_case(w))
        && !(s.eq_ignore_ascii_case(COMPLETE) && s != COMPLETE)
        && s.parse::<f64>().is_err()
}
