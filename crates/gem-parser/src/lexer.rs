//! Lexical analyzer for GemXML source text.
//!
//! GemXML needs two lexing modes. Between tags (content mode) the lexer
//! only distinguishes character data, comments and the start of a tag.
//! Inside a tag (markup mode) it produces names, `=`, quoted values and the
//! tag terminators. The mode switches on `<`, `</`, `>` and `/>`.
//!
//! The public entry point is [`tokenize`], which performs error-recovering
//! lexical analysis and collects all diagnostics in a single pass.

use winnow::{
    Parser as _,
    combinator::{alt, cut_err, preceded, terminated},
    error::{ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{literal, one_of, take_until, take_while},
};

use crate::{
    error::{CompileError, Diagnostic, DiagnosticCollector, ErrorCode},
    span::Span,
    tokens::{PositionedToken, Token},
};

/// Rich diagnostic information for lexer errors.
///
/// Attached to winnow errors via `.context()`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LexerDiagnostic {
    code: ErrorCode,
    message: &'static str,
    help: Option<&'static str>,
    /// The error span covers from `start` to the error position.
    start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O, ContextError<LexerDiagnostic>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Content,
    Markup,
}

/// Parse a `<!-- ... -->` comment.
fn comment<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let start = input.current_token_start();
    preceded(
        "<!--",
        cut_err(terminated(take_until(0.., "-->"), "-->")).context(LexerDiagnostic {
            code: ErrorCode::E003,
            message: "unterminated comment",
            help: Some("close the comment with `-->`"),
            start,
        }),
    )
    .map(Token::Comment)
    .parse_next(input)
}

/// Parse the start of an opening or closing tag.
fn tag_open<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt((
        literal("</").value(Token::LeftAngleSlash),
        '<'.value(Token::LeftAngle),
    ))
    .parse_next(input)
}

/// Parse character data up to the next `<`.
fn text<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    take_while(1.., |c: char| c != '<')
        .map(Token::Text)
        .parse_next(input)
}

/// Parse a quoted attribute value. Both `"` and `'` quotes are accepted.
fn string_literal<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let start = input.current_token_start();
    let quote = one_of(['"', '\'']).parse_next(input)?;

    cut_err(terminated(take_while(0.., move |c: char| c != quote), quote))
        .context(LexerDiagnostic {
            code: ErrorCode::E001,
            message: "unterminated string literal",
            help: Some("add the closing quote"),
            start,
        })
        .map(|raw: &str| Token::StringLiteral(decode_entities(raw)))
        .parse_next(input)
}

/// Parse a tag or attribute name.
fn identifier<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    take_while(1.., |c: char| {
        c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':' | '.')
    })
    .verify(|s: &str| {
        s.chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
    })
    .map(Token::Identifier)
    .parse_next(input)
}

fn tag_close<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt((
        literal("/>").value(Token::SelfClose),
        '>'.value(Token::RightAngle),
        '='.value(Token::Equals),
    ))
    .parse_next(input)
}

fn whitespace<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    take_while(1.., char::is_whitespace)
        .value(Token::Whitespace)
        .parse_next(input)
}

/// Parse a single token with position tracking
fn positioned_token<'a>(input: &mut Input<'a>, mode: Mode) -> IResult<PositionedToken<'a>> {
    let start_pos = input.current_token_start();

    let token = match mode {
        Mode::Content => alt((
            comment,  // Must come before tag_open
            tag_open, // `</` before `<`
            text,
        ))
        .parse_next(input)?,
        Mode::Markup => alt((whitespace, string_literal, identifier, tag_close)).parse_next(input)?,
    };

    let end_pos = input.current_token_start();
    Ok(PositionedToken::new(token, Span::new(start_pos..end_pos)))
}

/// Lexer that accumulates tokens and diagnostics during tokenization.
struct Lexer<'a> {
    tokens: Vec<PositionedToken<'a>>,
    diagnostics: DiagnosticCollector,
    mode: Mode,
}

impl<'a> Lexer<'a> {
    fn new() -> Self {
        Self {
            tokens: Vec::new(),
            diagnostics: DiagnosticCollector::new(),
            mode: Mode::Content,
        }
    }

    /// Tokenize the input, collecting tokens and errors.
    fn tokenize(&mut self, mut input: Input<'a>) {
        while !input.is_empty() {
            match positioned_token(&mut input, self.mode) {
                Ok(token) => {
                    self.mode = match token.token {
                        Token::LeftAngle | Token::LeftAngleSlash => Mode::Markup,
                        Token::RightAngle | Token::SelfClose => Mode::Content,
                        _ => self.mode,
                    };
                    self.tokens.push(token);
                }
                Err(e) => {
                    let error_pos = input.current_token_start();
                    self.diagnostics.emit(Self::convert_err_mode(e, error_pos));

                    if !input.is_empty() {
                        input.next_token();
                    }
                }
            }
        }
    }

    fn finish(self) -> Result<Vec<PositionedToken<'a>>, CompileError> {
        self.diagnostics.finish().map(|()| self.tokens)
    }

    /// Convert an ErrMode and error position to a Diagnostic.
    ///
    /// Falls back to E002 (unexpected character) if no diagnostic context is
    /// found.
    fn convert_err_mode(err: ErrMode<ContextError<LexerDiagnostic>>, error_pos: usize) -> Diagnostic {
        let context_error = match err {
            ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
            ErrMode::Incomplete(_) => ContextError::new(),
        };

        if let Some(LexerDiagnostic {
            code,
            message,
            help,
            start,
        }) = context_error.context().next()
        {
            let mut diag = Diagnostic::error(*message)
                .with_code(*code)
                .with_label(Span::new(*start..error_pos), code.description());
            if let Some(h) = help {
                diag = diag.with_help(*h);
            }
            return diag;
        }

        Diagnostic::error("unexpected character")
            .with_code(ErrorCode::E002)
            .with_label(
                Span::new(error_pos..error_pos.saturating_add(1)),
                ErrorCode::E002.description(),
            )
    }
}

/// Decode the five predefined XML entities.
///
/// Unknown entities are kept verbatim.
pub(crate) fn decode_entities(raw: &str) -> String {
    const ENTITIES: [(&str, char); 5] = [
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&amp;", '&'),
        ("&quot;", '"'),
        ("&apos;", '\''),
    ];

    let mut decoded = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find('&') {
        decoded.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match ENTITIES.iter().find(|(entity, _)| rest.starts_with(entity)) {
            Some((entity, ch)) => {
                decoded.push(*ch);
                rest = &rest[entity.len()..];
            }
            None => {
                decoded.push('&');
                rest = &rest[1..];
            }
        }
    }
    decoded.push_str(rest);
    decoded
}

/// Tokenize GemXML source, collecting every lexical error.
///
/// # Returns
///
/// - `Ok(tokens)` - All tokens successfully lexed
/// - `Err(CompileError)` - One or more errors occurred; contains all diagnostics
pub fn tokenize(input: &str) -> Result<Vec<PositionedToken<'_>>, CompileError> {
    let mut lexer = Lexer::new();
    lexer.tokenize(LocatingSlice::new(input));
    lexer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds<'a>(tokens: &'a [PositionedToken<'a>]) -> Vec<&'a Token<'a>> {
        tokens.iter().map(|t| &t.token).collect()
    }

    fn assert_error_codes(input: &str, expected_codes: &[ErrorCode]) {
        let err = tokenize(input).expect_err("expected lexing to fail");
        let codes: Vec<_> = err.diagnostics().iter().filter_map(|d| d.code()).collect();
        assert_eq!(codes, expected_codes, "unexpected codes for {input:?}");
    }

    #[test]
    fn test_full_element() {
        let tokens = tokenize(r#"<window x="1">hi</window>"#).unwrap();
        assert_eq!(
            kinds(&tokens),
            [
                &Token::LeftAngle,
                &Token::Identifier("window"),
                &Token::Whitespace,
                &Token::Identifier("x"),
                &Token::Equals,
                &Token::StringLiteral("1".to_string()),
                &Token::RightAngle,
                &Token::Text("hi"),
                &Token::LeftAngleSlash,
                &Token::Identifier("window"),
                &Token::RightAngle,
            ]
        );
    }

    #[test]
    fn test_self_closing_and_single_quotes() {
        let tokens = tokenize("<rect id='a'/>").unwrap();
        assert_eq!(tokens[5].token, Token::StringLiteral("a".to_string()));
        assert_eq!(tokens[6].token, Token::SelfClose);
    }

    #[test]
    fn test_text_keeps_markup_characters_literal() {
        let tokens = tokenize("<text>a = \"b\" /></text>").unwrap();
        assert_eq!(tokens[3].token, Token::Text("a = \"b\" /"));
        assert_eq!(tokens[4].token, Token::RightAngle);
    }

    #[test]
    fn test_comment() {
        let tokens = tokenize("<!-- note --><div/>").unwrap();
        assert_eq!(tokens[0].token, Token::Comment(" note "));
        assert_eq!(tokens[0].span, Span::new(0..13));
        assert_eq!(tokens[1].token, Token::LeftAngle);
    }

    #[test]
    fn test_entities_in_attribute_values() {
        let tokens = tokenize(r#"<window title="a &lt;b&gt; &amp; &unknown;"/>"#).unwrap();
        assert_eq!(
            tokens[5].token,
            Token::StringLiteral("a <b> & &unknown;".to_string())
        );
    }

    #[test]
    fn test_span_tracking() {
        let tokens = tokenize("<rect  x=\"5\"/>").unwrap();
        assert_eq!(tokens[1].span, Span::new(1..5));
        assert_eq!(tokens[2].span, Span::new(5..7));
        assert_eq!(tokens[5].span, Span::new(9..12));
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("&quot;x&apos;"), "\"x'");
        assert_eq!(decode_entities("a & b"), "a & b");
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_error_unterminated_string() {
        assert_error_codes(r#"<rect x="5/>"#, &[ErrorCode::E001]);
    }

    #[test]
    fn test_error_unterminated_string_span_starts_at_quote() {
        let err = tokenize(r#"<rect x="5"#).unwrap_err();
        let diag = &err.diagnostics()[0];
        assert_eq!(diag.primary_span(), Some(Span::new(8..10)));
    }

    #[test]
    fn test_error_unterminated_comment() {
        assert_error_codes("<!-- never closed", &[ErrorCode::E003]);
    }

    #[test]
    fn test_error_unexpected_character() {
        assert_error_codes("<rect @/>", &[ErrorCode::E002]);
    }

    #[test]
    fn test_errors_with_valid_tokens_between() {
        assert_error_codes("<rect @ x=\"1\" $/>", &[ErrorCode::E002, ErrorCode::E002]);
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn tag_name_strategy() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_-]{0,12}"
    }

    /// Character data without markup or entity references.
    fn text_strategy() -> impl Strategy<Value = String> {
        "[^<&]{1,40}"
    }

    // ===================
    // Property Test Functions
    // ===================

    fn check_text_is_single_token(text: &str) -> Result<(), TestCaseError> {
        let source = format!("<text>{text}</text>");
        let tokens = tokenize(&source).map_err(|e| TestCaseError::fail(e.to_string()))?;

        prop_assert_eq!(tokens.len(), 7);
        prop_assert_eq!(&tokens[3].token, &Token::Text(text));
        Ok(())
    }

    fn check_spans_cover_input(name: &str, text: &str) -> Result<(), TestCaseError> {
        let source = format!("<{name} a=\"1\">{text}</{name}>");
        let tokens = tokenize(&source).map_err(|e| TestCaseError::fail(e.to_string()))?;

        let mut expected_start = 0;
        for token in &tokens {
            prop_assert_eq!(token.span.start(), expected_start);
            expected_start = token.span.end();
        }
        prop_assert_eq!(expected_start, source.len());
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn text_is_single_token(text in text_strategy()) {
            check_text_is_single_token(&text)?;
        }

        #[test]
        fn spans_cover_input(name in tag_name_strategy(), text in text_strategy()) {
            check_spans_cover_input(&name, &text)?;
        }
    }
}
