//! # Pareto Parser
//!
//! Parser for `.p/family.function{name=value, ...}` directives. This crate
//! provides the pipeline from directive text to a validated
//! [`CommandObject`].
//!
//! ## Usage
//!
//! ```
//! # use pareto_core::{schema::builtin_registry, value::Value};
//! # use pareto_parser::parse;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = builtin_registry()?;
//! let command = parse(".p/reflect.trace{depth=3, target=reasoning}", &registry)?;
//!
//! assert_eq!(command.family(), "reflect");
//! assert_eq!(command.get("depth"), Some(&Value::Integer(3)));
//! # Ok(())
//! # }
//! ```

mod coerce;
pub mod error;
mod extract;
mod lexer;
mod parser;
mod parser_types;
mod span;
mod tokens;
mod validate;

pub use coerce::coerce;
pub use error::ParseError;
pub use extract::{Extractor, extract};
pub use lexer::{MAX_LIST_DEPTH, scan, tokenize};
pub use span::Span;
pub use tokens::{PositionedToken, TokenKind};

use log::debug;

use pareto_core::{command::CommandObject, schema::SchemaRegistry};

use lexer::Mode;
use parser_types::DirectiveSpans;

/// Tokenize, parse and coerce the directive at the start of `source`.
///
/// Returns the provisional command, the spans of its parts and how many
/// bytes of `source` the directive spans.
fn parse_provisional(
    source: &str,
    mode: Mode,
) -> error::Result<(CommandObject, DirectiveSpans, usize)> {
    // Step 1: Tokenize
    let (tokens, consumed) = lexer::tokenize_mode(source, mode)?;

    // Step 2: Parse
    let raw = parser::build_directive(&tokens)?;

    // Step 3: Coerce
    let (command, spans) = raw.coerce(&source[..consumed]);

    debug!(
        family = command.family(),
        function = command.function(),
        parameters = command.parameters().len();
        "Directive parsed"
    );
    Ok((command, spans, consumed))
}

/// [`parse_provisional`] followed by schema validation.
pub(crate) fn parse_validated(
    source: &str,
    registry: &SchemaRegistry,
    mode: Mode,
) -> error::Result<(CommandObject, usize)> {
    let (command, spans, consumed) = parse_provisional(source, mode)?;

    // Step 4: Validate
    validate::validate_command(registry, &command, &spans)?;
    Ok((command, consumed))
}

/// Parse directive text into a validated command.
///
/// The whole of `text` must be one directive; surrounding whitespace after
/// it is allowed. The command is checked against `registry` before it is
/// returned.
///
/// # Errors
///
/// Returns a [`ParseError`] for the first lexical, structural, schema or
/// value problem found.
pub fn parse(text: &str, registry: &SchemaRegistry) -> Result<CommandObject, ParseError> {
    parse_validated(text, registry, Mode::Whole)
        .map(|(command, _)| command)
        .map_err(|diagnostic| ParseError::new(diagnostic, text))
}

/// Parse directive text without consulting a schema.
///
/// Values are coerced but no family, function or parameter is checked.
///
/// # Errors
///
/// Returns a lexical or structural [`ParseError`].
pub fn parse_syntax(text: &str) -> Result<CommandObject, ParseError> {
    parse_provisional(text, Mode::Whole)
        .map(|(command, _, _)| command)
        .map_err(|diagnostic| ParseError::new(diagnostic, text))
}
