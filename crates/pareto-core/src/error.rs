//! Registry configuration errors.
//!
//! A [`RegistryError`] means a registry definition is malformed. These errors
//! are raised while a registry is being built, never while a directive is
//! parsed, so a registry that fails to build never becomes available.

use thiserror::Error;

/// Error raised when building a schema registry from a malformed definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("unknown type tag `{tag}`")]
    UnknownTypeTag { tag: String },

    #[error("unknown validator `{name}`")]
    UnknownValidator { name: String },

    #[error("invalid {what} name `{name}`: expected lowercase letters and underscores")]
    InvalidName { what: &'static str, name: String },

    #[error("family `{family}` is defined more than once")]
    DuplicateFamily { family: String },

    #[error("function `{family}.{function}` is defined more than once")]
    DuplicateFunction { family: String, function: String },

    #[error("function `{family}.{function}` belongs to undeclared family `{family}`")]
    UndeclaredFamily { family: String, function: String },

    #[error("required parameter `{parameter}` of `{function}` is not declared")]
    UndeclaredRequired { function: String, parameter: String },

    #[error("handler of `{function}` maps more than one parameter to `{target}`")]
    ConflictingMapping { function: String, target: String },

    #[error("default of parameter `{parameter}` of `{function}` does not match type `{tag}`")]
    InvalidDefault {
        function: String,
        parameter: String,
        tag: &'static str,
    },

    #[error("allowed value `{value}` of parameter `{parameter}` of `{function}` does not match type `{tag}`")]
    InvalidAllowedValue {
        function: String,
        parameter: String,
        value: String,
        tag: &'static str,
    },
}

/// A type alias for `Result<T, RegistryError>`.
pub type Result<T> = std::result::Result<T, RegistryError>;
