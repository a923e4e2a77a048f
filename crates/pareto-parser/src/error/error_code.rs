//! Error codes for the pareto diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Lexical errors
//! - `E1xx` - Structural (grammar) errors
//! - `E2xx` - Schema errors
//! - `E3xx` - Value errors

use std::fmt;

/// The error taxonomy a code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A character sequence matches no token in the current scanner state.
    Lexical,
    /// The token stream does not match the grammar.
    Structural,
    /// Unknown family or function, missing required or unknown parameter.
    Schema,
    /// A supplied value fails its type, allowed-set or custom check.
    Value,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Lexical => "lexical error",
            ErrorKind::Structural => "structural error",
            ErrorKind::Schema => "schema error",
            ErrorKind::Value => "value error",
        };
        f.write_str(name)
    }
}

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexical Errors (E0xx)
    // =========================================================================
    /// Unterminated quoted string.
    ///
    /// A parameter value opened a quote that is never closed.
    E001,

    /// Unexpected character.
    ///
    /// A character does not fit the scanner's current state, e.g. an
    /// uppercase letter in a family name or a missing `=`.
    E002,

    /// List nesting too deep.
    ///
    /// Bracketed lists may nest at most eight levels.
    E003,

    /// Unclosed list bracket.
    ///
    /// The input ended inside a bracketed list.
    E004,

    // =========================================================================
    // Structural Errors (E1xx)
    // =========================================================================
    /// Unexpected token.
    ///
    /// The parser encountered a token it did not expect at this position.
    E100,

    /// Incomplete input.
    ///
    /// The input ended before the directive was complete.
    E101,

    // =========================================================================
    // Schema Errors (E2xx)
    // =========================================================================
    /// Unknown family.
    E200,

    /// Unknown function.
    ///
    /// The family exists but has no function of this name.
    E201,

    /// Missing required parameter.
    E202,

    /// Unknown parameter.
    E203,

    // =========================================================================
    // Value Errors (E3xx)
    // =========================================================================
    /// Type mismatch.
    ///
    /// The value does not have the parameter's declared type.
    E300,

    /// Value not allowed.
    ///
    /// The parameter is restricted to an enumerated set that does not
    /// contain the value.
    E301,

    /// Value rejected by validator.
    ///
    /// The parameter's custom validator rejected the value.
    E302,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E004 => "E004",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E300 => "E300",
            ErrorCode::E301 => "E301",
            ErrorCode::E302 => "E302",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unterminated quoted string",
            ErrorCode::E002 => "unexpected character",
            ErrorCode::E003 => "list nesting too deep",
            ErrorCode::E004 => "unclosed list bracket",
            ErrorCode::E100 => "unexpected token",
            ErrorCode::E101 => "incomplete input",
            ErrorCode::E200 => "unknown family",
            ErrorCode::E201 => "unknown function",
            ErrorCode::E202 => "missing required parameter",
            ErrorCode::E203 => "unknown parameter",
            ErrorCode::E300 => "type mismatch",
            ErrorCode::E301 => "value not allowed",
            ErrorCode::E302 => "value rejected by validator",
        }
    }

    /// The taxonomy this code belongs to.
    pub fn kind(self) -> ErrorKind {
        match self {
            ErrorCode::E001 | ErrorCode::E002 | ErrorCode::E003 | ErrorCode::E004 => {
                ErrorKind::Lexical
            }
            ErrorCode::E100 | ErrorCode::E101 => ErrorKind::Structural,
            ErrorCode::E200 | ErrorCode::E201 | ErrorCode::E202 | ErrorCode::E203 => {
                ErrorKind::Schema
            }
            ErrorCode::E300 | ErrorCode::E301 | ErrorCode::E302 => ErrorKind::Value,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
