//! The single-error report produced by a failed parse.

use std::fmt;

use crate::{
    error::{ErrorCode, ErrorKind, Label},
    span::Span,
};

/// An error code, a message, labelled spans of the directive text and an
/// optional hint.
///
/// # Rendering
///
/// ```text
/// error[E002]: expected `=` after parameter name
///   ╭────
/// 1 │ .p/reflect.trace{depth:3}
///   ·                       ┬
///   ·                       ╰── unexpected character
///   ╰────
///   help: write parameters as `name=value`
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Start a diagnostic with only a message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// The taxonomy of this diagnostic.
    ///
    /// Diagnostics without a code are treated as structural.
    pub fn kind(&self) -> ErrorKind {
        self.code.map_or(ErrorKind::Structural, ErrorCode::kind)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Labels in the order they were added.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// The span of the first primary label.
    pub fn primary_span(&self) -> Option<Span> {
        self.labels
            .iter()
            .find(|label| label.is_primary())
            .map(Label::span)
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Mark where the problem was detected.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Point at related text, such as where a list was opened.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    /// Suggest a fix.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "error[{code}]: {}", self.message),
            None => write!(f, "error: {}", self.message),
        }
    }
}

impl std::error::Error for Diagnostic {}
