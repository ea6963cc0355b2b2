//! Character-level GemSheet parser.
//!
//! Unlike GemXML there is no separate token pass: stylesheets are small and
//! the grammar has no modes. Parsing stops at the first error.

use log::debug;
use winnow::{
    Parser as _,
    combinator::{alt, cut_err, not, opt, preceded, repeat, separated, terminated},
    error::{AddContext, ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{take_until, take_while},
};

use gem_core::identifier::Id;

use super::{Declaration, Selector, StyleRule, Stylesheet};
use crate::{
    error::{CompileError, Diagnostic, ErrorCode},
    span::Span,
};

#[derive(Debug, Clone, PartialEq, Eq)]
struct SheetDiagnostic {
    code: ErrorCode,
    message: &'static str,
    help: Option<&'static str>,
    start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O, ContextError<SheetDiagnostic>>;

/// `/* ... */`
fn comment(input: &mut Input<'_>) -> IResult<()> {
    let start = input.current_token_start();
    preceded(
        "/*",
        cut_err(terminated(take_until(0.., "*/"), "*/")).context(SheetDiagnostic {
            code: ErrorCode::E003,
            message: "unterminated comment",
            help: Some("close the comment with `*/`"),
            start,
        }),
    )
    .void()
    .parse_next(input)
}

fn blank(input: &mut Input<'_>) -> IResult<()> {
    take_while(1.., char::is_whitespace).void().parse_next(input)
}

/// Optional whitespace and comments.
fn ws0(input: &mut Input<'_>) -> IResult<()> {
    repeat(0.., alt((blank, comment))).parse_next(input)
}

fn ws1(input: &mut Input<'_>) -> IResult<()> {
    repeat(1.., alt((blank, comment))).parse_next(input)
}

fn name<'a>(input: &mut Input<'a>) -> IResult<&'a str> {
    take_while(1.., |c: char| {
        c.is_ascii_alphanumeric() || matches!(c, '_' | '-')
    })
    .parse_next(input)
}

/// A run of anything but whitespace, `;`, braces and the start of a comment.
fn value_word<'a>(input: &mut Input<'a>) -> IResult<&'a str> {
    let piece = alt((
        take_while(1.., |c: char| {
            !c.is_whitespace() && !matches!(c, ';' | '{' | '}' | '/')
        })
        .void(),
        terminated('/', not('*')).void(),
    ));
    repeat(1.., piece).map(|()| ()).take().parse_next(input)
}

fn open_brace(input: &mut Input<'_>) -> IResult<char> {
    '{'.parse_next(input)
}

fn close_brace(input: &mut Input<'_>) -> IResult<char> {
    '}'.parse_next(input)
}

fn comma(input: &mut Input<'_>) -> IResult<char> {
    ','.parse_next(input)
}

fn selector(input: &mut Input<'_>) -> IResult<Selector> {
    let start = input.current_token_start();
    let missing_name = SheetDiagnostic {
        code: ErrorCode::E110,
        message: "expected a name after the selector prefix",
        help: Some("names use letters, digits, `_` and `-`"),
        start,
    };

    alt((
        preceded('.', cut_err(name).context(missing_name.clone()))
            .map(|class: &str| Selector::Class(Id::new(class))),
        preceded('#', cut_err(name).context(missing_name))
            .map(|id: &str| Selector::Id(Id::new(id))),
        name.map(|element: &str| Selector::Element(Id::new(element))),
    ))
    .parse_next(input)
}

/// One or more selectors separated by commas or whitespace.
fn selector_group(input: &mut Input<'_>) -> IResult<Vec<Selector>> {
    let start = input.current_token_start();
    let first = selector
        .context(SheetDiagnostic {
            code: ErrorCode::E110,
            message: "expected a selector",
            help: Some("selectors are `name`, `.class` or `#id`"),
            start,
        })
        .parse_next(input)?;

    let mut selectors = vec![first];
    loop {
        ws0(input)?;
        if opt(comma).parse_next(input)?.is_some() {
            ws0(input)?;
            let start = input.current_token_start();
            let next = cut_err(selector)
                .context(SheetDiagnostic {
                    code: ErrorCode::E110,
                    message: "expected a selector after `,`",
                    help: None,
                    start,
                })
                .parse_next(input)?;
            selectors.push(next);
            continue;
        }

        match opt(selector).parse_next(input)? {
            Some(next) => selectors.push(next),
            None => break,
        }
    }

    Ok(selectors)
}

fn declaration(input: &mut Input<'_>) -> IResult<Declaration> {
    let start = input.current_token_start();
    let invalid = |message: &'static str, help: Option<&'static str>| SheetDiagnostic {
        code: ErrorCode::E111,
        message,
        help,
        start,
    };

    let property = name
        .context(invalid(
            "expected a property name",
            Some("declarations are written `property: value;`"),
        ))
        .parse_next(input)?;
    cut_err((ws0, ':', ws0))
        .context(invalid("expected `:` after the property name", None))
        .parse_next(input)?;
    let words: Vec<&str> = cut_err(separated(1.., value_word, ws1))
        .context(invalid(
            "expected a value",
            Some("a value is any text up to the closing `;`"),
        ))
        .parse_next(input)?;
    cut_err((ws0, ';'))
        .context(invalid(
            "expected `;` after the value",
            Some("every declaration ends with `;`"),
        ))
        .parse_next(input)?;

    let end = input.current_token_start();
    Ok(Declaration {
        property: property.to_string(),
        value: words.join(" "),
        span: Span::new(start..end),
    })
}

/// `{ declaration* }`
fn rule_block(input: &mut Input<'_>) -> IResult<Vec<Declaration>> {
    let start = input.current_token_start();
    open_brace(input)?;

    let mut declarations = Vec::new();
    loop {
        ws0(input)?;
        if input.is_empty() {
            return Err(ErrMode::Cut(ContextError::new().add_context(
                input,
                &input.checkpoint(),
                SheetDiagnostic {
                    code: ErrorCode::E112,
                    message: "unclosed rule block",
                    help: Some("add `}` to close the rule"),
                    start,
                },
            )));
        }
        if opt(close_brace).parse_next(input)?.is_some() {
            break;
        }
        declarations.push(cut_err(declaration).parse_next(input)?);
    }

    Ok(declarations)
}

fn rule(input: &mut Input<'_>) -> IResult<Vec<StyleRule>> {
    let selectors = selector_group(input)?;
    ws0(input)?;
    let start = input.current_token_start();
    let declarations = cut_err(rule_block)
        .context(SheetDiagnostic {
            code: ErrorCode::E110,
            message: "expected `{` after the selector",
            help: Some("separate grouped selectors with `,`"),
            start,
        })
        .parse_next(input)?;

    Ok(selectors
        .into_iter()
        .map(|selector| StyleRule {
            selector,
            declarations: declarations.clone(),
            origin: None,
        })
        .collect())
}

fn stylesheet(input: &mut Input<'_>) -> IResult<Vec<StyleRule>> {
    let mut rules = Vec::new();
    loop {
        ws0(input)?;
        if input.is_empty() {
            break;
        }
        rules.extend(cut_err(rule).parse_next(input)?);
    }
    Ok(rules)
}

fn convert_error(err: ErrMode<ContextError<SheetDiagnostic>>, error_pos: usize) -> Diagnostic {
    let context_error = match err {
        ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
        ErrMode::Incomplete(_) => ContextError::new(),
    };

    match context_error.context().next() {
        Some(SheetDiagnostic {
            code,
            message,
            help,
            start,
        }) => {
            let end = error_pos.max(*start);
            let mut diag = Diagnostic::error(*message)
                .with_code(*code)
                .with_label(Span::new(*start..end), code.description());
            if let Some(h) = help {
                diag = diag.with_help(*h);
            }
            diag
        }
        None => Diagnostic::error("unexpected character")
            .with_code(ErrorCode::E002)
            .with_label(
                Span::new(error_pos..error_pos.saturating_add(1)),
                ErrorCode::E002.description(),
            ),
    }
}

/// Parse GemSheet source.
///
/// Selector groups are expanded into one rule per selector. The returned
/// rules carry no origin.
pub fn parse_stylesheet(source: &str) -> Result<Stylesheet, CompileError> {
    let mut input = LocatingSlice::new(source);
    match stylesheet(&mut input) {
        Ok(rules) => {
            debug!(rules = rules.len(); "Parsed stylesheet");
            Ok(Stylesheet::new(rules))
        }
        Err(err) => {
            let error_pos = input.current_token_start();
            Err(convert_error(err, error_pos).into())
        }
    }
}
