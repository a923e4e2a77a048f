//! Token definitions for directive text.

use std::fmt;

use crate::span::Span;

/// The kind of a lexical unit of a directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// The `.p/` marker.
    Prefix,
    FamilyName,
    /// The `.` between family and function.
    Separator,
    FunctionName,
    /// `{`
    ParamOpen,
    /// `}`
    ParamClose,
    ParamName,
    /// `=`
    ParamEquals,
    /// Raw, whitespace-trimmed parameter value text.
    ParamValue,
    /// `,`
    ParamSeparator,
    EndOfInput,
    /// Unscannable remainder of the input.
    Invalid,
}

impl TokenKind {
    /// Human-readable description, used in error messages.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Prefix => "directive prefix `.p/`",
            TokenKind::FamilyName => "family name",
            TokenKind::Separator => "`.`",
            TokenKind::FunctionName => "function name",
            TokenKind::ParamOpen => "`{`",
            TokenKind::ParamClose => "`}`",
            TokenKind::ParamName => "parameter name",
            TokenKind::ParamEquals => "`=`",
            TokenKind::ParamValue => "parameter value",
            TokenKind::ParamSeparator => "`,`",
            TokenKind::EndOfInput => "end of input",
            TokenKind::Invalid => "invalid input",
        }
    }

    /// Stable snake-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Prefix => "prefix",
            TokenKind::FamilyName => "family_name",
            TokenKind::Separator => "separator",
            TokenKind::FunctionName => "function_name",
            TokenKind::ParamOpen => "param_open",
            TokenKind::ParamClose => "param_close",
            TokenKind::ParamName => "param_name",
            TokenKind::ParamEquals => "param_equals",
            TokenKind::ParamValue => "param_value",
            TokenKind::ParamSeparator => "param_separator",
            TokenKind::EndOfInput => "end_of_input",
            TokenKind::Invalid => "invalid",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A token with its raw text and location in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionedToken<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    pub span: Span,
}

impl<'src> PositionedToken<'src> {
    pub fn new(kind: TokenKind, text: &'src str, span: Span) -> Self {
        Self { kind, text, span }
    }

    /// Byte offset of the token in the source.
    pub fn position(&self) -> usize {
        self.span.start()
    }
}

impl fmt::Display for PositionedToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>4}  {:<16} {:?}", self.position(), self.kind, self.text)
    }
}
