//! Parameter value coercion.
//!
//! Raw value text becomes a typed [`Value`] by the first rule that matches:
//!
//! 1. quoted (`"..."` or `'...'` around the whole text): string, quotes stripped
//! 2. `true` / `false`, any case: boolean
//! 3. `null` / `none`, any case: null
//! 4. `complete`, any case: the string `"complete"`
//! 5. optional `-` followed by digits only: integer
//! 6. anything `f64` parses: float
//! 7. `[` ... `]`: list of recursively coerced elements
//! 8. otherwise: the text itself
//!
//! Coercion never fails.

use pareto_core::value::{COMPLETE, Value};

use crate::lexer::MAX_LIST_DEPTH;

/// Coerce raw parameter text to a typed value.
pub fn coerce(raw: &str) -> Value {
    coerce_at_depth(raw, 0)
}

fn coerce_at_depth(raw: &str, depth: usize) -> Value {
    let text = raw.trim();

    if let Some(inner) = unquote(text) {
        return Value::string(inner);
    }
    if text.eq_ignore_ascii_case("true") {
        return Value::Boolean(true);
    }
    if text.eq_ignore_ascii_case("false") {
        return Value::Boolean(false);
    }
    if text.eq_ignore_ascii_case("null") || text.eq_ignore_ascii_case("none") {
        return Value::Null;
    }
    if text.eq_ignore_ascii_case(COMPLETE) {
        return Value::string(COMPLETE);
    }
    if is_integer_text(text) {
        // Out of i64 range falls through to the float rule
        if let Ok(i) = text.parse::<i64>() {
            return Value::Integer(i);
        }
    }
    if let Ok(x) = text.parse::<f64>() {
        return Value::Float(x);
    }
    if depth < MAX_LIST_DEPTH {
        if let Some(inner) = text.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
            if inner.trim().is_empty() {
                return Value::List(Vec::new());
            }
            return Value::List(
                split_elements(inner)
                    .into_iter()
                    .map(|element| coerce_at_depth(element, depth + 1))
                    .collect(),
            );
        }
    }
    Value::string(text)
}

/// The text between matching quotes around the whole of `text`.
fn unquote(text: &str) -> Option<&str> {
    ['"', '\''].into_iter().find_map(|quote| {
        if text.len() >= 2 {
            text.strip_prefix(quote)?.strip_suffix(quote)
        } else {
            None
        }
    })
}

fn is_integer_text(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Split list contents at top-level commas.
///
/// Commas inside nested brackets, or inside a quoted span that starts an
/// element, do not split. Elements are returned untrimmed.
fn split_elements(inner: &str) -> Vec<&str> {
    let mut elements = Vec::new();
    let mut element_begin = 0;
    let mut depth = 0usize;
    let mut at_element_start = true;
    let mut chars = inner.char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '"' | '\'' if at_element_start => {
                // An unterminated quote leaves the rest of the text as is
                if let Some(close) = inner[i + 1..].find(c) {
                    let resume = i + 1 + close;
                    while chars.next().is_some_and(|(j, _)| j < resume) {}
                }
                at_element_start = false;
            }
            '[' => {
                depth += 1;
                at_element_start = true;
            }
            ']' => {
                depth = depth.saturating_sub(1);
                at_element_start = false;
            }
            ',' if depth == 0 => {
                elements.push(&inner[element_begin..i]);
                element_begin = i + 1;
                at_element_start = true;
            }
            ',' => at_element_start = true,
            c if c.is_whitespace() => {}
            _ => at_element_start = false,
        }
    }
    elements.push(&inner[element_begin..]);
    elements
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_scalars() {
        assert_eq!(coerce("3"), Value::Integer(3));
        assert_eq!(coerce("-12"), Value::Integer(-12));
        assert_eq!(coerce("0.7"), Value::Float(0.7));
        assert_eq!(coerce("1e3"), Value::Float(1000.0));
        assert_eq!(coerce("TRUE"), Value::Boolean(true));
        assert_eq!(coerce("false"), Value::Boolean(false));
        assert_eq!(coerce("None"), Value::Null);
        assert_eq!(coerce("null"), Value::Null);
        assert_eq!(coerce("reasoning"), Value::string("reasoning"));
    }

    #[test]
    fn test_precedence() {
        assert_eq!(coerce("\"42\""), Value::string("42"));
        assert_eq!(coerce("'true'"), Value::string("true"));
        assert_eq!(coerce("Complete"), Value::string("complete"));
        assert_eq!(coerce("42"), Value::Integer(42));
        assert_eq!(coerce("-"), Value::string("-"));
        assert_eq!(coerce("\""), Value::string("\""));
    }

    #[test]
    fn test_integer_overflow_becomes_float() {
        assert_eq!(coerce("99999999999999999999"), Value::Float(1e20));
    }

    #[test]
    fn test_lists() {
        assert_eq!(coerce("[a, b, c]"), Value::from(vec!["a", "b", "c"]));
        assert_eq!(coerce("[ ]"), Value::List(vec![]));
        assert_eq!(
            coerce("[1, 'x, y', [true, none]]"),
            Value::List(vec![
                Value::Integer(1),
                Value::string("x, y"),
                Value::List(vec![Value::Boolean(true), Value::Null]),
            ])
        );
        assert_eq!(
            coerce("[a,]"),
            Value::List(vec![Value::string("a"), Value::string("")])
        );
    }

    #[test]
    fn test_quote_inside_element_is_ordinary() {
        assert_eq!(coerce("[it's, fine]"), Value::from(vec!["it's", "fine"]));
    }

    #[test]
    fn test_unbalanced_brackets_stay_strings() {
        assert_eq!(coerce("[a] b"), Value::string("[a] b"));
        assert_eq!(coerce("a]"), Value::string("a]"));
    }

    #[test]
    fn test_nesting_beyond_limit_stays_text() {
        let levels = MAX_LIST_DEPTH + 1;
        let deep = format!("{}{}", "[".repeat(levels), "]".repeat(levels));
        let mut value = coerce(&deep);
        for _ in 0..MAX_LIST_DEPTH {
            value = match value {
                Value::List(mut items) => items.remove(0),
                other => panic!("expected list, got {other:?}"),
            };
        }
        assert_eq!(value, Value::string("[]"));
    }

    fn raw_text() -> impl Strategy<Value = String> {
        let scalar = prop_oneof![
            "-?[0-9]{1,6}",
            "-?[0-9]{1,4}\\.[0-9]{1,4}",
            prop::sample::select(vec!["true", "False", "NULL", "none", "Complete"])
                .prop_map(String::from),
            "[a-z_]{1,8}".prop_filter("bare words that read as floats", |s| {
                s.parse::<f64>().is_err()
            }),
            "\"[a-z ,\\[\\]]{0,8}\"",
            "'[a-z ,\\]]{0,8}'",
            "\"[a-z ,\\[\\]']{0,6}\"[a-z'\"]{1,3}\"",
            "'[a-z ,\\[\\]\"]{0,6}'[a-z'\"]{1,3}'",
        ];
        scalar.prop_recursive(3, 16, 4, |inner| {
            prop::collection::vec(inner, 0..4).prop_map(|items| format!("[{}]", items.join(", ")))
        })
    }

    proptest! {
        #[test]
        fn coercion_is_idempotent(raw in raw_text()) {
            let value = coerce(&raw);
            prop_assert_eq!(coerce(&value.to_string()), value);
        }
    }
}
