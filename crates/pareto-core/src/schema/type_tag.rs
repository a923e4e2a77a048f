//! Parameter type tags.

use std::{fmt, str::FromStr};

use crate::{error::RegistryError, schema::validators, value::Value};

/// The declared type of a parameter.
///
/// The set of tags is fixed; naming any other tag in a registry definition
/// is a [`RegistryError::UnknownTypeTag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    String,
    Integer,
    /// Any number; integers are accepted.
    Float,
    Boolean,
    List,
    StringOrInt,
    Any,
    Null,
    /// A number within `[0, 1]`.
    ProbabilityThreshold,
    /// A positive integer or the string `"complete"`.
    RecursionDepth,
}

impl TypeTag {
    /// Canonical tag name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::List => "list",
            Self::StringOrInt => "string_or_int",
            Self::Any => "any",
            Self::Null => "null",
            Self::ProbabilityThreshold => "probability_threshold",
            Self::RecursionDepth => "recursion_depth",
        }
    }

    /// The predicate deciding whether a value has this type.
    pub fn validator(self) -> validators::Validator {
        match self {
            Self::String => validators::is_string,
            Self::Integer => validators::is_integer,
            Self::Float => validators::is_float,
            Self::Boolean => validators::is_boolean,
            Self::List => validators::is_list,
            Self::StringOrInt => validators::is_string_or_int,
            Self::Any => validators::is_any,
            Self::Null => validators::is_null,
            Self::ProbabilityThreshold => validators::is_unit_interval,
            Self::RecursionDepth => validators::is_recursion_depth,
        }
    }

    /// Whether `value` has this type.
    pub fn accepts(self, value: &Value) -> bool {
        (self.validator())(value)
    }
}

impl FromStr for TypeTag {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" | "str" => Ok(Self::String),
            "integer" | "int" => Ok(Self::Integer),
            "float" | "number" => Ok(Self::Float),
            "boolean" | "bool" => Ok(Self::Boolean),
            "list" | "sequence" => Ok(Self::List),
            "string_or_int" => Ok(Self::StringOrInt),
            "any" => Ok(Self::Any),
            "null" => Ok(Self::Null),
            "probability_threshold" => Ok(Self::ProbabilityThreshold),
            "recursion_depth" => Ok(Self::RecursionDepth),
            _ => Err(RegistryError::UnknownTypeTag { tag: s.to_string() }),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases() {
        assert_eq!("int".parse(), Ok(TypeTag::Integer));
        assert_eq!("bool".parse(), Ok(TypeTag::Boolean));
        assert_eq!("sequence".parse(), Ok(TypeTag::List));
        assert_eq!("recursion_depth".parse(), Ok(TypeTag::RecursionDepth));
    }

    #[test]
    fn test_unknown_tag() {
        assert_eq!(
            "matrix".parse::<TypeTag>(),
            Err(RegistryError::UnknownTypeTag {
                tag: "matrix".to_string()
            })
        );
    }

    #[test]
    fn test_accepts() {
        assert!(TypeTag::StringOrInt.accepts(&Value::Integer(3)));
        assert!(TypeTag::StringOrInt.accepts(&Value::string("all")));
        assert!(!TypeTag::StringOrInt.accepts(&Value::Boolean(true)));
        assert!(TypeTag::ProbabilityThreshold.accepts(&Value::Float(0.25)));
        assert!(!TypeTag::ProbabilityThreshold.accepts(&Value::Float(1.25)));
        assert!(TypeTag::Any.accepts(&Value::Null));
        assert!(TypeTag::Null.accepts(&Value::Null));
        assert!(!TypeTag::List.accepts(&Value::string("[a]")));
    }

    #[test]
    fn test_display_round_trips() {
        for tag in [
            TypeTag::String,
            TypeTag::Integer,
            TypeTag::Float,
            TypeTag::Boolean,
            TypeTag::List,
            TypeTag::StringOrInt,
            TypeTag::Any,
            TypeTag::Null,
            TypeTag::ProbabilityThreshold,
            TypeTag::RecursionDepth,
        ] {
            assert_eq!(tag.to_string().parse(), Ok(tag));
        }
    }
}
