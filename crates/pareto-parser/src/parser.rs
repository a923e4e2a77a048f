//! Parser for directive tokens.
//!
//! This module checks a token stream from the [`lexer`](super::lexer)
//! against the directive grammar and builds a [`RawDirective`] defined in
//! [`parser_types`](super::parser_types):
//!
//! ```text
//! directive   := PREFIX FAMILY SEPARATOR FUNCTION [ param_block ] EOF
//! param_block := PARAM_OPEN [ param_list ] PARAM_CLOSE
//! param_list  := param ( PARAM_SEPARATOR param )*
//! param       := PARAM_NAME PARAM_EQUALS PARAM_VALUE
//! ```
//!
//! The public entry point is [`build_directive`].

use winnow::{
    Parser as _,
    combinator::{alt, opt, terminated},
    error::{ContextError, ErrMode},
    stream::{Stream, TokenSlice},
    token::any,
};

use crate::{
    error::{Diagnostic, ErrorCode, Result},
    parser_types::{RawDirective, RawParam},
    span::{Span, Spanned},
    tokens::{PositionedToken, TokenKind},
};

/// Context type for parser errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Context {
    /// Description of what the grammar expected.
    Label(&'static str),
    /// The token found instead.
    Found(TokenKind, Span),
}

type Input<'src> = DirectiveTokenSlice<'src>;
type IResult<O> = std::result::Result<O, ErrMode<ContextError<Context>>>;
/// Type alias for winnow TokenSlice with our positioned tokens
type DirectiveTokenSlice<'src> = TokenSlice<'src, PositionedToken<'src>>;

/// Commit to the current branch: a backtrack inside `f` becomes a cut.
fn cut_err<'src, O, F>(input: &mut Input<'src>, f: F) -> IResult<O>
where
    F: FnOnce(&mut Input<'src>) -> IResult<O>,
{
    match f(input) {
        Err(ErrMode::Backtrack(e)) => Err(ErrMode::Cut(e)),
        result => result,
    }
}

fn backtrack_error(
    expected: &'static str,
    found: Option<&PositionedToken<'_>>,
) -> ErrMode<ContextError<Context>> {
    let mut e = ContextError::new();
    e.push(Context::Label(expected));
    if let Some(token) = found {
        e.push(Context::Found(token.kind, token.span));
    }
    ErrMode::Backtrack(e)
}

/// Match one token of `kind`, recording what was found on failure.
fn expect<'src>(
    kind: TokenKind,
    expected: &'static str,
) -> impl FnMut(&mut Input<'src>) -> IResult<Spanned<&'src str>> {
    move |input: &mut Input<'src>| {
        let start = input.checkpoint();
        match any::<_, ErrMode<ContextError<Context>>>.parse_next(input) {
            Ok(token) if token.kind == kind => Ok(Spanned::new(token.text, token.span)),
            Ok(token) => {
                input.reset(&start);
                Err(backtrack_error(expected, Some(token)))
            }
            Err(_) => {
                input.reset(&start);
                Err(backtrack_error(expected, None))
            }
        }
    }
}

/// Parse `name=value`
fn param<'src>(input: &mut Input<'src>) -> IResult<RawParam<'src>> {
    (
        expect(TokenKind::ParamName, "parameter name"),
        expect(TokenKind::ParamEquals, "`=` after parameter name"),
        expect(TokenKind::ParamValue, "parameter value"),
    )
        .map(|(name, _, value)| RawParam { name, value })
        .parse_next(input)
}

/// Parse one or more comma-separated parameters
///
/// A `,` commits to another parameter.
fn param_list<'src>(input: &mut Input<'src>) -> IResult<Vec<RawParam<'src>>> {
    let mut params = vec![param.parse_next(input)?];
    while opt(expect(TokenKind::ParamSeparator, "`,`"))
        .parse_next(input)?
        .is_some()
    {
        params.push(cut_err(input, |input| param.parse_next(input))?);
    }
    Ok(params)
}

/// Parse `{` followed by an empty or comma-separated parameter list and `}`
///
/// Once `{` is seen the block is committed; later failures are not
/// backtracked into "no parameter block".
fn param_block<'src>(input: &mut Input<'src>) -> IResult<Vec<RawParam<'src>>> {
    expect(TokenKind::ParamOpen, "`{`").parse_next(input)?;
    cut_err(input, |input| {
        alt((
            expect(TokenKind::ParamClose, "parameter name or `}`").map(|_| Vec::new()),
            terminated(param_list, expect(TokenKind::ParamClose, "`,` or `}`")),
        ))
        .parse_next(input)
    })
}

/// Parse a complete directive
fn directive<'src>(input: &mut Input<'src>) -> IResult<RawDirective<'src>> {
    let (_, family, _, function) = (
        expect(TokenKind::Prefix, "directive prefix `.p/`"),
        expect(TokenKind::FamilyName, "family name"),
        expect(TokenKind::Separator, "`.` after family name"),
        expect(TokenKind::FunctionName, "function name"),
    )
        .parse_next(input)?;

    let (params, end) = match opt(param_block).parse_next(input)? {
        Some(params) => (
            params,
            expect(TokenKind::EndOfInput, "end of input").parse_next(input)?,
        ),
        None => (
            Vec::new(),
            expect(TokenKind::EndOfInput, "`{` or end of input").parse_next(input)?,
        ),
    };

    Ok(RawDirective {
        family,
        function,
        params,
        end: end.span(),
    })
}

/// Convert a winnow parse error into a diagnostic.
///
/// The label points at the offending token; running into the end-of-input
/// token is reported as incomplete input.
fn convert_error(
    error: ErrMode<ContextError<Context>>,
    tokens: &[PositionedToken<'_>],
) -> Diagnostic {
    let end = tokens.last().map_or(Span::default(), |t| Span::at(t.span.end()));

    let context = match error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => e,
        ErrMode::Incomplete(_) => {
            // This should not happen as we are not supporting streaming input.
            return Diagnostic::error("incomplete input, more tokens expected")
                .with_code(ErrorCode::E101)
                .with_label(end, "incomplete")
                .with_help("ensure input is complete");
        }
    };

    let expected = context.context().find_map(|ctx| match ctx {
        Context::Label(label) => Some(*label),
        Context::Found(..) => None,
    });
    let found = context.context().find_map(|ctx| match ctx {
        Context::Found(kind, span) => Some((*kind, *span)),
        Context::Label(_) => None,
    });

    let message = match expected {
        Some(expected) => format!("expected {expected}"),
        None => "unexpected token or end of input".to_string(),
    };

    let incomplete = |span: Span| {
        Diagnostic::error(format!("{message}, found end of input"))
            .with_code(ErrorCode::E101)
            .with_label(span, "directive ends here")
            .with_help("the directive is incomplete")
    };

    match found {
        None => incomplete(end),
        Some((TokenKind::EndOfInput, span)) => incomplete(span),
        Some((kind, span)) => Diagnostic::error(format!("{message}, found {}", kind.describe()))
            .with_code(ErrorCode::E100)
            .with_label(span, "unexpected token")
            .with_help("check syntax and token positioning"),
    }
}

/// Build a directive from tokens
pub(crate) fn build_directive<'src>(
    tokens: &'src [PositionedToken<'src>],
) -> Result<RawDirective<'src>> {
    let mut token_slice = TokenSlice::new(tokens);
    directive
        .parse_next(&mut token_slice)
        .map_err(|e| convert_error(e, tokens))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{scan, tokenize};

    fn parse_tokens(input: &str) -> Vec<PositionedToken<'_>> {
        tokenize(input).expect("Failed to tokenize input")
    }

    /// Helper to create a token at a specific position
    fn make_token(kind: TokenKind, text: &str, offset: usize) -> PositionedToken<'_> {
        PositionedToken::new(kind, text, Span::new(offset..offset + text.len()))
    }

    #[test]
    fn test_param() {
        let tokens = parse_tokens(".p/a.b{depth=3}");
        let mut slice = TokenSlice::new(&tokens[5..]);
        let parsed = param.parse_next(&mut slice).expect("param should parse");
        assert_eq!(*parsed.name.inner(), "depth");
        assert_eq!(*parsed.value.inner(), "3");
        assert_eq!(parsed.value.span(), Span::new(13..14));
    }

    #[test]
    fn test_build_directive() {
        let tokens = parse_tokens(".p/reflect.trace{depth=3, target=reasoning}");
        let directive = build_directive(&tokens).expect("directive should parse");

        assert_eq!(*directive.family.inner(), "reflect");
        assert_eq!(directive.family.span(), Span::new(3..10));
        assert_eq!(*directive.function.inner(), "trace");
        assert_eq!(directive.params.len(), 2);
        assert_eq!(*directive.params[1].value.inner(), "reasoning");
        assert_eq!(directive.end, Span::at(43));
    }

    #[test]
    fn test_empty_and_missing_block() {
        let tokens = parse_tokens(".p/reflect.trace{}");
        assert!(build_directive(&tokens).unwrap().params.is_empty());

        let tokens = parse_tokens(".p/reflect.trace");
        assert!(build_directive(&tokens).unwrap().params.is_empty());
    }

    #[test]
    fn test_incomplete_directive() {
        let tokens = parse_tokens(".p/reflect.trace{depth=3,");
        let err = build_directive(&tokens).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E101));
        assert_eq!(err.message(), "expected parameter name, found end of input");
        assert_eq!(err.primary_span(), Some(Span::at(25)));
    }

    #[test]
    fn test_invalid_token_is_structural() {
        let tokens = scan(".p/reflect.trace{depth:3}");
        let err = build_directive(&tokens).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E100));
        assert_eq!(err.primary_span().map(|s| s.start()), Some(22));
        assert_eq!(err.message(), "expected `=` after parameter name, found invalid input");
    }

    #[test]
    fn test_unexpected_token_kind() {
        // Token streams the lexer would never produce still fail cleanly.
        let tokens = [
            make_token(TokenKind::Prefix, ".p/", 0),
            make_token(TokenKind::FunctionName, "trace", 3),
            make_token(TokenKind::EndOfInput, "", 8),
        ];
        let err = build_directive(&tokens).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E100));
        assert_eq!(err.message(), "expected family name, found function name");
        assert_eq!(err.primary_span(), Some(Span::new(3..8)));
    }

    #[test]
    fn test_missing_end_of_input() {
        let tokens = [
            make_token(TokenKind::Prefix, ".p/", 0),
            make_token(TokenKind::FamilyName, "a", 3),
            make_token(TokenKind::Separator, ".", 4),
            make_token(TokenKind::FunctionName, "b", 5),
        ];
        let err = build_directive(&tokens).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E101));
        assert_eq!(err.primary_span(), Some(Span::at(6)));
    }
}
