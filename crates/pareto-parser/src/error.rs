//! Error and diagnostic system for the pareto parser.
//!
//! Every failure of a parse call is a single [`Diagnostic`]: an error code, a
//! message, labelled spans and optional help text. Parsing stops at the first
//! problem, so a [`ParseError`] wraps exactly one diagnostic together with the
//! directive text it refers to.
//!
//! # Example
//!
//! ```
//! # use pareto_parser::error::{Diagnostic, ErrorCode, ErrorKind};
//! # use pareto_parser::Span;
//!
//! let diag = Diagnostic::error("unknown parameter `colour`")
//!     .with_code(ErrorCode::E203)
//!     .with_label(Span::new(17..23), "not a parameter of `reflect.trace`")
//!     .with_help("expected one of: target, depth, detailed, visualize");
//!
//! assert_eq!(diag.code().map(ErrorCode::kind), Some(ErrorKind::Schema));
//! ```

mod diagnostic;
mod error_code;
mod label;
mod parse_error;

pub(crate) use parse_error::Result;

pub use diagnostic::Diagnostic;
pub use error_code::{ErrorCode, ErrorKind};
pub use label::{Label, LabelStyle};
pub use parse_error::ParseError;
