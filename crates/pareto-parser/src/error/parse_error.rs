//! The ParseError type returned by every parsing entry point.
//!
//! [`ParseError`] pairs the [`Diagnostic`] that stopped a parse with the
//! directive text, so it can be rendered as message, text and caret.

use std::fmt;

use crate::error::{Diagnostic, ErrorKind};

/// A type alias for `Result<T, Diagnostic>`.
pub type Result<T> = std::result::Result<T, Diagnostic>;

/// Error type for the parsing lifecycle.
#[derive(Debug, Clone)]
pub struct ParseError {
    diagnostic: Diagnostic,
    source_text: String,
}

impl ParseError {
    /// Create a new parse error for `source_text`.
    pub fn new(diagnostic: Diagnostic, source_text: impl Into<String>) -> Self {
        Self {
            diagnostic,
            source_text: source_text.into(),
        }
    }

    /// The diagnostic describing the failure.
    pub fn diagnostic(&self) -> &Diagnostic {
        &self.diagnostic
    }

    /// The failure message.
    pub fn message(&self) -> &str {
        self.diagnostic.message()
    }

    /// Byte offset in the source text where the failure was detected.
    ///
    /// For lexical and structural errors this is the first character the
    /// grammar could not consume (or the end of the text); for schema and
    /// value errors it is the name or value involved.
    pub fn position(&self) -> usize {
        self.diagnostic
            .primary_span()
            .map_or(0, |span| span.start())
            .min(self.source_text.len())
    }

    pub fn kind(&self) -> ErrorKind {
        self.diagnostic.kind()
    }

    /// The directive text that failed to parse.
    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    /// Message, the offending source line, and a caret under the error position.
    ///
    /// ```text
    /// expected `.` after family name
    /// .p/bad!!syntax
    ///       ^
    /// ```
    pub fn pointer(&self) -> String {
        let position = self.position();
        let line_start = self.source_text[..position]
            .rfind('\n')
            .map_or(0, |i| i + 1);
        let line_end = self.source_text[position..]
            .find('\n')
            .map_or(self.source_text.len(), |i| position + i);
        let column = self.source_text[line_start..position].chars().count();

        format!(
            "{}\n{}\n{}^",
            self.message(),
            &self.source_text[line_start..line_end],
            " ".repeat(column)
        )
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diagnostic)
    }
}

impl std::error::Error for ParseError {}
