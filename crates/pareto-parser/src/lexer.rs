//! Lexical analyzer for directive text.
//!
//! The lexer is a single-pass state machine over the directive: prefix,
//! family name, separator, function name and an optional parameter block.
//! Inside the block, parameter values are scanned as raw text up to the next
//! top-level `,` or `}`; a bracketed list is kept as one value even though
//! it contains commas, and a quote at the start of a value or list element
//! protects commas and brackets until the matching quote.
//!
//! The public entry points are [`tokenize`], which stops at the first
//! unscannable character, and [`scan`], which never fails and ends the
//! stream with an [`Invalid`](TokenKind::Invalid) token instead.

use log::trace;
use winnow::{
    Parser as _,
    error::{ContextError, ErrMode},
    stream::{LocatingSlice, Location, Stream},
    token::{literal, one_of, take_while},
};

use pareto_core::command::PREFIX;

use crate::{
    error::{Diagnostic, ErrorCode, ParseError, Result},
    span::Span,
    tokens::{PositionedToken, TokenKind},
};

/// Deepest list nesting accepted in a parameter value.
pub const MAX_LIST_DEPTH: usize = 8;

/// Rich diagnostic information for lexer errors.
///
/// Attached to winnow errors as context and converted to a [`Diagnostic`]
/// once scanning stops.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LexerDiagnostic {
    code: ErrorCode,
    message: &'static str,
    help: Option<&'static str>,
    /// Span of an unterminated construct; `None` marks the character at the
    /// error position.
    span: Option<Span>,
    /// Where the unterminated construct was opened.
    opened: Option<Span>,
}

impl LexerDiagnostic {
    const fn unexpected(message: &'static str, help: Option<&'static str>) -> Self {
        Self {
            code: ErrorCode::E002,
            message,
            help,
            span: None,
            opened: None,
        }
    }
}

const EXPECTED_PREFIX: LexerDiagnostic = LexerDiagnostic::unexpected(
    "expected directive prefix `.p/`",
    Some("directives start with `.p/`, e.g. `.p/reflect.trace`"),
);
const EXPECTED_FAMILY: LexerDiagnostic = LexerDiagnostic::unexpected(
    "expected family name",
    Some("family names use lowercase letters and underscores"),
);
const EXPECTED_SEPARATOR: LexerDiagnostic = LexerDiagnostic::unexpected(
    "expected `.` after family name",
    Some("write the function as `family.function`"),
);
const EXPECTED_FUNCTION: LexerDiagnostic = LexerDiagnostic::unexpected(
    "expected function name",
    Some("function names use lowercase letters and underscores"),
);
const EXPECTED_BLOCK_OR_END: LexerDiagnostic =
    LexerDiagnostic::unexpected("expected `{` or end of input", None);
const EXPECTED_NAME_OR_CLOSE: LexerDiagnostic = LexerDiagnostic::unexpected(
    "expected parameter name or closing brace",
    Some("parameter names use lowercase letters and underscores"),
);
const EXPECTED_NAME: LexerDiagnostic = LexerDiagnostic::unexpected(
    "expected parameter name",
    Some("remove the trailing `,` or add another `name=value`"),
);
const EXPECTED_EQUALS: LexerDiagnostic = LexerDiagnostic::unexpected(
    "expected `=` after parameter name",
    Some("write parameters as `name=value`"),
);
const EXPECTED_VALUE: LexerDiagnostic = LexerDiagnostic::unexpected(
    "expected parameter value",
    Some("quote the value to pass an empty string: `name=\"\"`"),
);
const EXPECTED_SEPARATOR_OR_CLOSE: LexerDiagnostic =
    LexerDiagnostic::unexpected("expected `,` or closing brace", None);
const EXPECTED_END: LexerDiagnostic = LexerDiagnostic::unexpected(
    "expected end of input after closing brace",
    Some("a directive ends at its closing `}`"),
);

type Input<'src> = LocatingSlice<&'src str>;
type IResult<O> = std::result::Result<O, ErrMode<ContextError<LexerDiagnostic>>>;

fn cut(diagnostic: LexerDiagnostic) -> ErrMode<ContextError<LexerDiagnostic>> {
    let mut e = ContextError::new();
    e.push(diagnostic);
    ErrMode::Cut(e)
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_lowercase() || c == '_'
}

fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}

/// Skip whitespace between tokens.
fn whitespace(input: &mut Input<'_>) -> IResult<()> {
    take_while(0.., char::is_whitespace)
        .void()
        .parse_next(input)
}

/// Skip a quoted span starting at the opening quote.
fn quoted(input: &mut Input<'_>, quote: char) -> IResult<()> {
    let start = input.current_token_start();
    let Some(close) = input[quote.len_utf8()..].find(quote) else {
        let end = start + input.len();
        return Err(cut(LexerDiagnostic {
            code: ErrorCode::E001,
            message: "unterminated quoted string",
            help: if quote == '"' {
                Some("add closing `\"`")
            } else {
                Some("add closing `'`")
            },
            span: Some(Span::new(start..end)),
            opened: None,
        }));
    };
    input.next_slice(close + 2 * quote.len_utf8());
    Ok(())
}

/// Scan a raw parameter value up to the next top-level `,` or `}`.
///
/// Returns the span of the whitespace-trimmed value text; an empty value is
/// an error.
fn param_value(input: &mut Input<'_>) -> IResult<Span> {
    let start = input.current_token_start();
    let mut content_end = start;
    let mut open_brackets: Vec<usize> = Vec::new();
    let mut element_start = true;

    while let Some(c) = input.chars().next() {
        let pos = input.current_token_start();
        match c {
            ',' | '}' if open_brackets.is_empty() => break,
            c if element_start && is_quote(c) => {
                quoted(input, c)?;
                element_start = false;
                content_end = input.current_token_start();
                continue;
            }
            '[' => {
                if open_brackets.len() == MAX_LIST_DEPTH {
                    return Err(cut(LexerDiagnostic {
                        code: ErrorCode::E003,
                        message: "list nesting too deep",
                        help: Some("lists may nest at most 8 levels"),
                        span: None,
                        opened: None,
                    }));
                }
                open_brackets.push(pos);
                element_start = true;
            }
            ']' if !open_brackets.is_empty() => {
                open_brackets.pop();
                element_start = false;
            }
            ',' => element_start = true,
            c if c.is_whitespace() => {}
            _ => element_start = false,
        }
        input.next_token();
        if !c.is_whitespace() {
            content_end = input.current_token_start();
        }
    }

    if let Some(&opened) = open_brackets.first() {
        let end = input.current_token_start();
        return Err(cut(LexerDiagnostic {
            code: ErrorCode::E004,
            message: "unclosed list bracket",
            help: Some("add closing `]`"),
            span: Some(Span::at(end)),
            opened: Some(Span::new(opened..opened + 1)),
        }));
    }
    if content_end == start {
        return Err(cut(EXPECTED_VALUE));
    }
    Ok(Span::new(start..content_end))
}

/// Whether the lexer consumes a whole string or stops at the end of the
/// first directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    /// The input is exactly one directive; trailing text is an error.
    Whole,
    /// The input starts with a directive followed by arbitrary text.
    Prefix,
}

/// Lexer that accumulates tokens while walking the directive states.
struct Lexer<'src> {
    source: &'src str,
    input: Input<'src>,
    tokens: Vec<PositionedToken<'src>>,
    mode: Mode,
}

impl<'src> Lexer<'src> {
    fn new(source: &'src str, mode: Mode) -> Self {
        Self {
            source,
            input: LocatingSlice::new(source),
            tokens: Vec::new(),
            mode,
        }
    }

    fn at_end(&self) -> bool {
        self.input.is_empty()
    }

    fn offset(&self) -> usize {
        self.input.current_token_start()
    }

    fn push(&mut self, kind: TokenKind, span: Span) {
        self.tokens
            .push(PositionedToken::new(kind, &self.source[span.to_range()], span));
    }

    /// Run `parser` and record what it consumed as a `kind` token.
    fn token<F>(&mut self, kind: TokenKind, parser: F) -> IResult<()>
    where
        F: FnOnce(&mut Input<'src>) -> IResult<()>,
    {
        let start = self.offset();
        parser(&mut self.input)?;
        let span = Span::new(start..self.offset());
        self.push(kind, span);
        Ok(())
    }

    fn name(&mut self, kind: TokenKind, expected: LexerDiagnostic) -> IResult<()> {
        self.token(kind, |input| {
            take_while(1.., is_name_char)
                .void()
                .context(expected)
                .parse_next(input)
        })
    }

    fn punct(&mut self, kind: TokenKind, c: char, expected: LexerDiagnostic) -> IResult<()> {
        self.token(kind, |input| one_of(c).void().context(expected).parse_next(input))
    }

    fn skip_whitespace(&mut self) -> IResult<()> {
        whitespace(&mut self.input)
    }

    /// Scan the directive. Running out of input in any state simply ends the
    /// stream; incompleteness is reported by the parser.
    fn run(&mut self) -> IResult<()> {
        self.token(TokenKind::Prefix, |input| {
            literal(PREFIX)
                .void()
                .context(EXPECTED_PREFIX)
                .parse_next(input)
        })?;
        if self.at_end() {
            return Ok(());
        }
        self.name(TokenKind::FamilyName, EXPECTED_FAMILY)?;
        if self.at_end() {
            return Ok(());
        }
        self.punct(TokenKind::Separator, '.', EXPECTED_SEPARATOR)?;
        if self.at_end() {
            return Ok(());
        }
        self.name(TokenKind::FunctionName, EXPECTED_FUNCTION)?;

        let checkpoint = self.input.checkpoint();
        self.skip_whitespace()?;
        if self.input.starts_with('{') {
            self.param_block()?;
        } else if self.mode == Mode::Prefix {
            self.input.reset(&checkpoint);
            return Ok(());
        } else if !self.at_end() {
            return Err(cut(EXPECTED_BLOCK_OR_END));
        }

        if self.mode == Mode::Whole {
            self.skip_whitespace()?;
            if !self.at_end() {
                return Err(cut(EXPECTED_END));
            }
        }
        Ok(())
    }

    fn param_block(&mut self) -> IResult<()> {
        self.punct(TokenKind::ParamOpen, '{', EXPECTED_NAME_OR_CLOSE)?;
        self.skip_whitespace()?;
        if self.at_end() {
            return Ok(());
        }
        if self.input.starts_with('}') {
            return self.punct(TokenKind::ParamClose, '}', EXPECTED_NAME_OR_CLOSE);
        }

        let mut expected_name = EXPECTED_NAME_OR_CLOSE;
        loop {
            self.name(TokenKind::ParamName, expected_name)?;
            self.skip_whitespace()?;
            if self.at_end() {
                return Ok(());
            }
            self.punct(TokenKind::ParamEquals, '=', EXPECTED_EQUALS)?;
            self.skip_whitespace()?;
            if self.at_end() {
                return Ok(());
            }
            let span = param_value(&mut self.input)?;
            self.push(TokenKind::ParamValue, span);
            if self.at_end() {
                return Ok(());
            }

            if self.input.starts_with(',') {
                self.punct(TokenKind::ParamSeparator, ',', EXPECTED_SEPARATOR_OR_CLOSE)?;
                self.skip_whitespace()?;
                if self.at_end() {
                    return Ok(());
                }
                expected_name = EXPECTED_NAME;
            } else {
                return self.punct(TokenKind::ParamClose, '}', EXPECTED_SEPARATOR_OR_CLOSE);
            }
        }
    }

    /// Append the end-of-input token at the current position.
    fn finish(mut self) -> Vec<PositionedToken<'src>> {
        let end = self.offset();
        self.push(TokenKind::EndOfInput, Span::at(end));
        trace!(tokens = self.tokens.len(); "Scanned directive");
        self.tokens
    }

    /// Convert a lexer failure to a diagnostic.
    ///
    /// Falls back to E002 (unexpected character) if no context is attached.
    fn convert_err_mode(&self, err: ErrMode<ContextError<LexerDiagnostic>>) -> Diagnostic {
        let error_pos = self.offset();
        let context_error = match err {
            ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
            ErrMode::Incomplete(_) => ContextError::new(),
        };
        let at_char = || {
            let len = self.input.chars().next().map_or(0, char::len_utf8);
            Span::new(error_pos..error_pos + len)
        };

        let Some(diagnostic) = context_error.context().next() else {
            return Diagnostic::error("unexpected character")
                .with_code(ErrorCode::E002)
                .with_label(at_char(), ErrorCode::E002.description());
        };

        let span = diagnostic.span.unwrap_or_else(at_char);
        let mut diag = Diagnostic::error(diagnostic.message)
            .with_code(diagnostic.code)
            .with_label(span, diagnostic.code.description());
        if let Some(opened) = diagnostic.opened {
            diag = diag.with_secondary_label(opened, "list opened here");
        }
        if let Some(help) = diagnostic.help {
            diag = diag.with_help(help);
        }
        diag
    }
}

/// Tokenize `source` as the directive starting at its first byte.
///
/// In [`Mode::Prefix`] the stream ends where the directive ends and the rest
/// of the text is left alone; the returned length is how many bytes the
/// directive spans.
pub(crate) fn tokenize_mode(
    source: &str,
    mode: Mode,
) -> Result<(Vec<PositionedToken<'_>>, usize)> {
    let mut lexer = Lexer::new(source, mode);
    match lexer.run() {
        Ok(()) => {
            let consumed = lexer.offset();
            Ok((lexer.finish(), consumed))
        }
        Err(e) => Err(lexer.convert_err_mode(e)),
    }
}

/// Convert directive text into tokens, ending with an end-of-input token.
///
/// # Errors
///
/// Returns a lexical [`ParseError`] positioned at the first character that
/// does not fit the scanner's current state.
pub fn tokenize(source: &str) -> std::result::Result<Vec<PositionedToken<'_>>, ParseError> {
    tokenize_mode(source, Mode::Whole)
        .map(|(tokens, _)| tokens)
        .map_err(|diag| ParseError::new(diag, source))
}

/// Like [`tokenize`], but never fails.
///
/// When scanning stops at an unscannable character, the rest of the text
/// becomes a single [`Invalid`](TokenKind::Invalid) token before the
/// end-of-input token.
pub fn scan(source: &str) -> Vec<PositionedToken<'_>> {
    let mut lexer = Lexer::new(source, Mode::Whole);
    if let Err(e) = lexer.run() {
        // Start at the earliest label so an unclosed list is marked from its `[`
        let start = lexer
            .convert_err_mode(e)
            .labels()
            .iter()
            .map(|label| label.span().start())
            .min()
            .unwrap_or(lexer.offset())
            .min(source.len());
        lexer.push(TokenKind::Invalid, Span::new(start..source.len()));
        lexer.input.next_slice(lexer.input.len());
    }
    lexer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap_or_else(|e| panic!("failed to tokenize {source:?}: {e}"))
            .iter()
            .map(|t| t.kind)
            .collect()
    }

    fn lex_error(source: &str) -> ParseError {
        match tokenize(source) {
            Ok(tokens) => panic!("expected {source:?} to fail, got {tokens:?}"),
            Err(e) => e,
        }
    }

    #[test]
    fn test_directive_without_parameters() {
        use TokenKind::*;
        assert_eq!(
            kinds(".p/reflect.trace"),
            [Prefix, FamilyName, Separator, FunctionName, EndOfInput]
        );
    }

    #[test]
    fn test_directive_with_parameters() {
        use TokenKind::*;
        let tokens = tokenize(".p/reflect.trace{depth=3, target=reasoning}").unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            [
                Prefix,
                FamilyName,
                Separator,
                FunctionName,
                ParamOpen,
                ParamName,
                ParamEquals,
                ParamValue,
                ParamSeparator,
                ParamName,
                ParamEquals,
                ParamValue,
                ParamClose,
                EndOfInput
            ]
        );
        assert_eq!(tokens[7].text, "3");
        assert_eq!(tokens[8].position(), 24);
        assert_eq!(tokens[9].position(), 26);
        assert_eq!(tokens[11].text, "reasoning");
        assert_eq!(tokens[13].position(), 43);
    }

    #[test]
    fn test_value_is_trimmed() {
        let tokens = tokenize(".p/a.b{ x =  hello world  }").unwrap();
        let value = tokens.iter().find(|t| t.kind == TokenKind::ParamValue).unwrap();
        assert_eq!(value.text, "hello world");
        assert_eq!(value.position(), 13);
    }

    #[test]
    fn test_list_value_is_one_token() {
        let tokens =
            tokenize(".p/fork.context{branches=[a, [b, c], 'd, e'], assess=true}").unwrap();
        let values: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::ParamValue)
            .map(|t| t.text)
            .collect();
        assert_eq!(values, ["[a, [b, c], 'd, e']", "true"]);
    }

    #[test]
    fn test_quoted_value_protects_delimiters() {
        let tokens = tokenize(r#".p/a.b{x="a,b}c", y='[z'}"#).unwrap();
        let values: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::ParamValue)
            .map(|t| t.text)
            .collect();
        assert_eq!(values, [r#""a,b}c""#, "'[z'"]);
    }

    #[test]
    fn test_quote_inside_value_is_ordinary() {
        let tokens = tokenize(".p/a.b{x=it's, y=2}").unwrap();
        assert_eq!(tokens[7].text, "it's");
    }

    #[test]
    fn test_empty_block() {
        use TokenKind::*;
        assert_eq!(
            kinds(".p/a.b{ }"),
            [
                Prefix,
                FamilyName,
                Separator,
                FunctionName,
                ParamOpen,
                ParamClose,
                EndOfInput
            ]
        );
    }

    #[test]
    fn test_trailing_whitespace_is_skipped() {
        assert_eq!(kinds(".p/a.b{x=1}  ").last(), Some(&TokenKind::EndOfInput));
        assert_eq!(kinds(".p/a.b  ").len(), 5);
    }

    #[test]
    fn test_missing_prefix() {
        let err = lex_error("p/reflect.trace");
        assert_eq!(err.position(), 0);
        assert_eq!(err.diagnostic().code(), Some(ErrorCode::E002));
    }

    #[test]
    fn test_bad_family_character() {
        let err = lex_error(".p/bad!!syntax");
        assert_eq!(err.position(), 6);
        assert_eq!(err.message(), "expected `.` after family name");
    }

    #[test]
    fn test_uppercase_family() {
        let err = lex_error(".p/Reflect.trace");
        assert_eq!(err.position(), 3);
        assert_eq!(err.message(), "expected family name");
    }

    #[test]
    fn test_missing_equals() {
        let err = lex_error(".p/reflect.trace{depth:3}");
        assert_eq!(err.position(), 22);
        assert_eq!(err.message(), "expected `=` after parameter name");
    }

    #[test]
    fn test_empty_value() {
        let err = lex_error(".p/a.b{x=, y=1}");
        assert_eq!(err.position(), 9);
        assert_eq!(err.message(), "expected parameter value");
    }

    #[test]
    fn test_trailing_comma() {
        let err = lex_error(".p/a.b{x=1,}");
        assert_eq!(err.position(), 11);
        assert_eq!(err.message(), "expected parameter name");
    }

    #[test]
    fn test_trailing_characters() {
        let err = lex_error(".p/a.b{x=1} extra");
        assert_eq!(err.position(), 12);

        let err = lex_error(".p/a.b!");
        assert_eq!(err.position(), 6);
        assert_eq!(err.message(), "expected `{` or end of input");
    }

    #[test]
    fn test_unterminated_quote() {
        let err = lex_error(".p/a.b{x=\"open}");
        assert_eq!(err.diagnostic().code(), Some(ErrorCode::E001));
        assert_eq!(err.position(), 9);
    }

    #[test]
    fn test_unclosed_bracket() {
        let err = lex_error(".p/a.b{x=[1, 2}");
        assert_eq!(err.diagnostic().code(), Some(ErrorCode::E004));
        assert_eq!(err.position(), 15);
        assert_eq!(err.diagnostic().labels()[1].span(), Span::new(9..10));
    }

    #[test]
    fn test_nesting_limit() {
        let ok = format!(".p/a.b{{x={}{}}}", "[".repeat(8), "]".repeat(8));
        assert!(tokenize(&ok).is_ok());

        let deep = format!(".p/a.b{{x={}{}}}", "[".repeat(9), "]".repeat(9));
        let err = lex_error(&deep);
        assert_eq!(err.diagnostic().code(), Some(ErrorCode::E003));
        assert_eq!(err.position(), 17);
    }

    #[test]
    fn test_premature_end_is_not_lexical() {
        use TokenKind::*;
        assert_eq!(kinds(".p/"), [Prefix, EndOfInput]);
        assert_eq!(
            kinds(".p/a.b{x="),
            [
                Prefix,
                FamilyName,
                Separator,
                FunctionName,
                ParamOpen,
                ParamName,
                ParamEquals,
                EndOfInput
            ]
        );
        assert_eq!(kinds(".p/a.b{x=1").last(), Some(&EndOfInput));
    }

    #[test]
    fn test_scan_marks_invalid_rest() {
        let tokens = scan(".p/reflect.trace{depth:3}");
        let invalid = &tokens[tokens.len() - 2];
        assert_eq!(invalid.kind, TokenKind::Invalid);
        assert_eq!(invalid.text, ":3}");
        assert_eq!(invalid.position(), 22);
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::EndOfInput));
    }

    #[test]
    fn test_scan_matches_tokenize_on_valid_input() {
        let source = ".p/collapse.detect{threshold=0.7, alert=true}";
        assert_eq!(scan(source), tokenize(source).unwrap());
    }

    #[test]
    fn test_prefix_mode_stops_at_directive_end() {
        let (tokens, consumed) =
            tokenize_mode(".p/reflect.trace{depth=1} now and then", Mode::Prefix).unwrap();
        assert_eq!(consumed, 25);
        assert_eq!(tokens.last().map(|t| t.position()), Some(25));

        let (tokens, consumed) = tokenize_mode(".p/reflect.trace. Next", Mode::Prefix).unwrap();
        assert_eq!(consumed, 16);
        assert_eq!(tokens.len(), 5);
    }
}
