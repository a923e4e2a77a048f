//! Value predicates used by type tags and custom validators.

use std::{fmt, str::FromStr};

use crate::{error::RegistryError, value::Value};

/// A validity check over a typed value.
pub type Validator = fn(&Value) -> bool;

pub(super) fn is_string(value: &Value) -> bool {
    matches!(value, Value::String(_))
}

pub(super) fn is_integer(value: &Value) -> bool {
    matches!(value, Value::Integer(_))
}

/// Integers are accepted wherever a float is.
pub(super) fn is_float(value: &Value) -> bool {
    matches!(value, Value::Float(_) | Value::Integer(_))
}

pub(super) fn is_boolean(value: &Value) -> bool {
    matches!(value, Value::Boolean(_))
}

pub(super) fn is_list(value: &Value) -> bool {
    matches!(value, Value::List(_))
}

pub(super) fn is_string_or_int(value: &Value) -> bool {
    is_string(value) || is_integer(value)
}

pub(super) fn is_any(_: &Value) -> bool {
    true
}

pub(super) fn is_null(value: &Value) -> bool {
    matches!(value, Value::Null)
}

pub(super) fn is_string_or_list(value: &Value) -> bool {
    is_string(value) || is_list(value)
}

/// A number within `[0, 1]`.
pub(super) fn is_unit_interval(value: &Value) -> bool {
    value.as_number().is_some_and(|x| (0.0..=1.0).contains(&x))
}

pub(super) fn is_positive_number(value: &Value) -> bool {
    value.as_number().is_some_and(|x| x > 0.0)
}

/// A positive integer or the distinguished `"complete"`.
pub(super) fn is_recursion_depth(value: &Value) -> bool {
    match value {
        Value::Integer(i) => *i > 0,
        _ => value.is_complete(),
    }
}

/// Named semantic checks that can be attached to a single parameter.
///
/// These run after the type check and the allowed-value check, and express
/// constraints a type tag alone cannot, such as a threshold bounded to
/// `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomValidator {
    /// Positive integer or `"complete"`.
    RecursionDepth,
    /// Number within `[0, 1]`.
    UnitInterval,
    /// Number greater than zero.
    PositiveNumber,
    /// Any string.
    String,
    /// A string or a list.
    StringOrList,
}

impl CustomValidator {
    /// The name used in registry definitions.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RecursionDepth => "recursion_depth",
            Self::UnitInterval => "unit_interval",
            Self::PositiveNumber => "positive_number",
            Self::String => "string",
            Self::StringOrList => "string_or_list",
        }
    }

    /// The predicate implementing this validator.
    pub fn predicate(self) -> Validator {
        match self {
            Self::RecursionDepth => is_recursion_depth,
            Self::UnitInterval => is_unit_interval,
            Self::PositiveNumber => is_positive_number,
            Self::String => is_string,
            Self::StringOrList => is_string_or_list,
        }
    }

    /// Short description of what the validator accepts, for error messages.
    pub fn expectation(self) -> &'static str {
        match self {
            Self::RecursionDepth => "a positive integer or `complete`",
            Self::UnitInterval => "a number between 0 and 1",
            Self::PositiveNumber => "a number greater than 0",
            Self::String => "a string",
            Self::StringOrList => "a string or a list",
        }
    }
}

impl FromStr for CustomValidator {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recursion_depth" => Ok(Self::RecursionDepth),
            "unit_interval" => Ok(Self::UnitInterval),
            "positive_number" => Ok(Self::PositiveNumber),
            "string" => Ok(Self::String),
            "string_or_list" => Ok(Self::StringOrList),
            _ => Err(RegistryError::UnknownValidator {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for CustomValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
