//! Parsed directive commands.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::value::Value;

/// Directive prefix marker.
pub const PREFIX: &str = ".p/";

/// Parameter mapping of a command, in the order parameters were supplied.
pub type Parameters = IndexMap<String, Value>;

/// A parsed directive: `.p/<family>.<function>{<name>=<value>, ...}`.
///
/// `family` and `function` are never empty. The original directive text is
/// kept for error messages; the [`Display`](fmt::Display) implementation
/// writes the canonical form, which parses back to an equivalent command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandObject {
    family: String,
    function: String,
    parameters: Parameters,
    original_text: String,
}

impl CommandObject {
    /// Create a new command object.
    pub fn new(
        family: impl Into<String>,
        function: impl Into<String>,
        parameters: Parameters,
        original_text: impl Into<String>,
    ) -> Self {
        Self {
            family: family.into(),
            function: function.into(),
            parameters,
            original_text: original_text.into(),
        }
    }

    /// The command family, e.g. `reflect`.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// The function within the family, e.g. `trace`.
    pub fn function(&self) -> &str {
        &self.function
    }

    /// The `family.function` key.
    pub fn key(&self) -> String {
        format!("{}.{}", self.family, self.function)
    }

    /// All supplied parameters.
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// A single parameter value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.parameters.get(name)
    }

    /// The directive text this command was parsed from.
    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    /// Same family, function and parameters, regardless of source text.
    pub fn equivalent(&self, other: &CommandObject) -> bool {
        self.family == other.family
            && self.function == other.function
            && self.parameters == other.parameters
    }
}

impl fmt::Display for CommandObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PREFIX}{}.{}", self.family, self.function)?;
        if self.parameters.is_empty() {
            return Ok(());
        }

        f.write_str("{")?;
        for (i, (name, value)) in self.parameters.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str("}")
    }
}
