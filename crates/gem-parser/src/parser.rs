//! Parser for GemXML tokens.
//!
//! This module transforms the token stream from the [`lexer`](super::lexer)
//! into a [`Document`]. The public entry point is [`build_document`].
//!
//! The parser knows the tag vocabulary and the shape of markup, nothing
//! else: window counts, id uniqueness and content rules are checked later.

use std::str::FromStr;

use indexmap::IndexMap;
use winnow::{
    Parser as _,
    combinator::{opt, peek, repeat},
    error::{AddContext, ContextError, ErrMode},
    stream::{Stream, TokenSlice},
    token::any,
};

use gem_core::identifier::Id;

use crate::{
    document::{Attribute, Document, ElementNode, Tag, TextContent},
    error::{Diagnostic, ErrorCode, Result},
    lexer::decode_entities,
    span::{Span, Spanned},
    tokens::{PositionedToken, Token},
};

/// Context type for parser errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Context {
    /// Description of what is currently being parsed
    Label(&'static str),
    /// Remaining token count (`eof_offset()`) at error start position
    StartOffset(usize),
    UnknownTag {
        name: String,
        span: Span,
    },
    DuplicateAttribute {
        name: String,
        first: Span,
        second: Span,
    },
    /// Input ended inside the element opened at `open`
    Unclosed {
        tag: Tag,
        open: Span,
    },
    Mismatched {
        expected: Tag,
        open: Span,
        found: String,
        span: Span,
    },
    /// A closing tag with no open element
    StrayClosing {
        name: String,
        span: Span,
    },
    /// The element opened at `open` is nested past [`MAX_NESTING_DEPTH`]
    TooDeep {
        tag: Tag,
        open: Span,
    },
}

type Input<'src> = GemTokenSlice<'src>;
type IResult<O> = std::result::Result<O, ErrMode<ContextError<Context>>>;
/// Type alias for winnow TokenSlice with our positioned tokens
type GemTokenSlice<'src> = TokenSlice<'src, PositionedToken<'src>>;

type RawAttribute<'src> = (Spanned<&'src str>, Spanned<String>);

/// Deepest element nesting accepted, counting the window as level 1.
pub const MAX_NESTING_DEPTH: usize = 256;

/// A piece of element content before it is attached to its parent.
enum Item {
    Element(ElementNode),
    Text(Spanned<String>),
}

fn cut_err<'src, O, F>(input: &mut Input<'src>, f: F) -> IResult<O>
where
    F: FnOnce(&mut Input<'src>) -> IResult<O>,
{
    let start_remaining = input.eof_offset();

    match f(input) {
        Ok(o) => Ok(o),
        Err(ErrMode::Backtrack(e)) | Err(ErrMode::Cut(e)) => {
            let e = e.add_context(
                input,
                &input.checkpoint(),
                Context::StartOffset(start_remaining),
            );
            Err(ErrMode::Cut(e))
        }
        Err(e) => Err(e),
    }
}

/// Create a Cut error carrying a rich context
fn fail_with(input: &Input<'_>, context: Context) -> ErrMode<ContextError<Context>> {
    ErrMode::Cut(ContextError::new().add_context(input, &input.checkpoint(), context))
}

/// Look at the next token without consuming it
fn lookahead<'src>(input: &mut Input<'src>) -> IResult<Option<&'src PositionedToken<'src>>> {
    opt(peek(any)).parse_next(input)
}

/// Consume one token, whatever it is
fn skip<'src>(input: &mut Input<'src>) -> IResult<()> {
    any.void().parse_next(input)
}

fn whitespace0<'src>(input: &mut Input<'src>) -> IResult<()> {
    repeat(
        0..,
        any.verify(|token: &PositionedToken<'_>| matches!(token.token, Token::Whitespace))
            .void(),
    )
    .parse_next(input)
}

fn left_angle<'src>(input: &mut Input<'src>) -> IResult<Span> {
    any.verify_map(|token: &PositionedToken<'_>| {
        matches!(token.token, Token::LeftAngle).then_some(token.span)
    })
    .context(Context::Label("`<`"))
    .parse_next(input)
}

fn left_angle_slash<'src>(input: &mut Input<'src>) -> IResult<Span> {
    any.verify_map(|token: &PositionedToken<'_>| {
        matches!(token.token, Token::LeftAngleSlash).then_some(token.span)
    })
    .context(Context::Label("`</`"))
    .parse_next(input)
}

fn right_angle<'src>(input: &mut Input<'src>) -> IResult<Span> {
    any.verify_map(|token: &PositionedToken<'_>| {
        matches!(token.token, Token::RightAngle).then_some(token.span)
    })
    .context(Context::Label("`>`"))
    .parse_next(input)
}

fn equals<'src>(input: &mut Input<'src>) -> IResult<()> {
    any.verify(|token: &PositionedToken<'_>| matches!(token.token, Token::Equals))
        .void()
        .context(Context::Label("`=`"))
        .parse_next(input)
}

/// Parse a tag or attribute name with its span
fn name<'src>(input: &mut Input<'src>) -> IResult<Spanned<&'src str>> {
    any.verify_map(|token: &'src PositionedToken<'src>| match token.token {
        Token::Identifier(name) => Some(Spanned::new(name, token.span)),
        _ => None,
    })
    .context(Context::Label("name"))
    .parse_next(input)
}

fn string_value<'src>(input: &mut Input<'src>) -> IResult<Spanned<String>> {
    any.verify_map(|token: &PositionedToken<'_>| match &token.token {
        Token::StringLiteral(value) => Some(Spanned::new(value.clone(), token.span)),
        _ => None,
    })
    .context(Context::Label("quoted attribute value"))
    .parse_next(input)
}

/// Parse `name = "value"`
fn attribute<'src>(input: &mut Input<'src>) -> IResult<RawAttribute<'src>> {
    let name = name.parse_next(input)?;
    let value = cut_err(input, |input| {
        whitespace0(input)?;
        equals(input)?;
        whitespace0(input)?;
        string_value(input)
    })?;
    Ok((name, value))
}

fn attributes<'src>(input: &mut Input<'src>) -> IResult<Vec<RawAttribute<'src>>> {
    let mut attributes = Vec::new();
    loop {
        whitespace0(input)?;
        match lookahead(input)? {
            Some(token) if matches!(token.token, Token::Identifier(_)) => {
                attributes.push(attribute(input)?);
            }
            _ => return Ok(attributes),
        }
    }
}

/// Store raw attributes on the node, splitting out `class` and `id`.
fn apply_attributes(
    node: &mut ElementNode,
    raw: Vec<RawAttribute<'_>>,
) -> std::result::Result<(), Context> {
    let mut seen: IndexMap<&str, Span> = IndexMap::new();

    for (name, value) in raw {
        if let Some(first) = seen.get(name.inner()) {
            return Err(Context::DuplicateAttribute {
                name: name.inner().to_string(),
                first: *first,
                second: name.span(),
            });
        }
        seen.insert(*name.inner(), name.span());

        match *name.inner() {
            "class" => {
                node.classes = value.inner().split_whitespace().map(Id::new).collect();
            }
            "id" => {
                let id = value.inner().trim();
                if !id.is_empty() {
                    node.id = Some(Spanned::new(Id::new(id), value.span()));
                }
            }
            other => {
                node.attributes.insert(other.to_string(), Attribute { value });
            }
        }
    }
    Ok(())
}

/// Collapse whitespace runs and decode entities in character data.
fn normalize_text(pieces: &[&str]) -> String {
    let joined = pieces.concat();
    let collapsed = joined.split_whitespace().collect::<Vec<_>>().join(" ");
    decode_entities(&collapsed)
}

fn flush_text(items: &mut Vec<Item>, pieces: &mut Vec<&str>, text_span: &mut Option<Span>) {
    if let Some(span) = text_span.take() {
        let text = normalize_text(pieces);
        if !text.is_empty() {
            items.push(Item::Text(Spanned::new(text, span)));
        }
    }
    pieces.clear();
}

/// Parse element content up to a closing tag or the end of input.
///
/// Comments are dropped and consecutive text runs are merged. `depth` is the
/// nesting level of the enclosing element, 0 at the top level.
fn content<'src>(input: &mut Input<'src>, depth: usize) -> IResult<Vec<Item>> {
    let mut items = Vec::new();
    let mut pieces: Vec<&'src str> = Vec::new();
    let mut text_span: Option<Span> = None;

    loop {
        let Some(token) = lookahead(input)? else {
            break;
        };
        match &token.token {
            Token::LeftAngleSlash => break,
            Token::LeftAngle => {
                flush_text(&mut items, &mut pieces, &mut text_span);
                items.push(Item::Element(element(input, depth + 1)?));
            }
            Token::Text(raw) => {
                skip(input)?;
                pieces.push(*raw);
                text_span = Some(text_span.map_or(token.span, |span| span.union(token.span)));
            }
            Token::Comment(_) => skip(input)?,
            _ => {
                return Err(ErrMode::Backtrack(ContextError::new().add_context(
                    input,
                    &input.checkpoint(),
                    Context::Label("element or text"),
                )));
            }
        }
    }

    flush_text(&mut items, &mut pieces, &mut text_span);
    Ok(items)
}

/// Attach parsed content to an element.
///
/// Containers wrap text in implicit `text` children; every other element
/// keeps its text as content.
fn attach_content(node: &mut ElementNode, items: Vec<Item>) {
    let mut texts: Vec<Spanned<String>> = Vec::new();

    for item in items {
        match item {
            Item::Element(child) => node.children.push(child),
            Item::Text(text) if node.tag().is_container() => {
                node.children.push(ElementNode::implicit_text(text));
            }
            Item::Text(text) => texts.push(text),
        }
    }

    if let Some(first) = texts.first() {
        let span = texts
            .iter()
            .fold(first.span(), |span, text| span.union(text.span()));
        let joined = texts
            .iter()
            .map(|text| text.inner().as_str())
            .collect::<Vec<_>>()
            .join(" ");
        node.content = Some(TextContent::Raw(Spanned::new(joined, span)));
    }
}

/// Parse one element, either self-closing or with content and closing tag.
fn element<'src>(input: &mut Input<'src>, depth: usize) -> IResult<ElementNode> {
    let open = left_angle(input)?;
    let tag_name = cut_err(input, name)?;
    let tag = Tag::from_str(tag_name.inner()).map_err(|()| {
        fail_with(
            input,
            Context::UnknownTag {
                name: tag_name.inner().to_string(),
                span: tag_name.span(),
            },
        )
    })?;
    let open_tag = open.union(tag_name.span());
    if depth > MAX_NESTING_DEPTH {
        return Err(fail_with(input, Context::TooDeep { tag, open: open_tag }));
    }

    let mut node = ElementNode::new(Spanned::new(tag, tag_name.span()), open_tag);
    let raw_attributes = attributes(input)?;
    apply_attributes(&mut node, raw_attributes).map_err(|ctx| fail_with(input, ctx))?;

    let Some(terminator) = lookahead(input)? else {
        return Err(fail_with(input, Context::Unclosed { tag, open: open_tag }));
    };
    match terminator.token {
        Token::SelfClose => {
            skip(input)?;
            node.span = open.union(terminator.span);
            return Ok(node);
        }
        Token::RightAngle => skip(input)?,
        _ => return Err(fail_with(input, Context::Label("`>` or `/>`"))),
    }

    let items = content(input, depth)?;

    let Some(closing) = lookahead(input)? else {
        return Err(fail_with(input, Context::Unclosed { tag, open: open_tag }));
    };
    let slash = closing.span;
    skip(input)?;

    let close_name = cut_err(input, name)?;
    if *close_name.inner() != tag.as_str() {
        return Err(fail_with(
            input,
            Context::Mismatched {
                expected: tag,
                open: open_tag,
                found: close_name.inner().to_string(),
                span: slash.union(close_name.span()),
            },
        ));
    }
    let end = cut_err(input, |input| {
        whitespace0(input)?;
        right_angle(input)
    })?;

    node.span = open.union(end);
    attach_content(&mut node, items);
    Ok(node)
}

/// Parse a whole document: top-level content until the end of input.
fn document<'src>(input: &mut Input<'src>) -> IResult<Vec<ElementNode>> {
    let items = content(input, 0)?;

    if let Some(token) = lookahead(input)? {
        let slash = token.span;
        left_angle_slash(input)?;
        let stray = opt(name).parse_next(input)?;
        let (name, span) = match stray {
            Some(name) => (name.inner().to_string(), slash.union(name.span())),
            None => (String::new(), slash),
        };
        return Err(fail_with(input, Context::StrayClosing { name, span }));
    }

    Ok(items
        .into_iter()
        .map(|item| match item {
            Item::Element(element) => element,
            Item::Text(text) => ElementNode::implicit_text(text),
        })
        .collect())
}

/// Convert winnow errors to our diagnostic format.
///
/// Rich contexts produce their dedicated error codes. Everything else is an
/// unexpected token, spanned from the StartOffset context to the error
/// position.
fn convert_error(
    error: ErrMode<ContextError<Context>>,
    tokens: &[PositionedToken],
    current_remaining: usize,
) -> Diagnostic {
    let error = match error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => e,
        ErrMode::Incomplete(_) => ContextError::new(),
    };

    for ctx in error.context() {
        match ctx {
            Context::UnknownTag { name, span } => {
                return Diagnostic::error(format!("unknown tag `{name}`"))
                    .with_code(ErrorCode::E103)
                    .with_label(*span, "not a GemXML tag")
                    .with_help(format!(
                        "expected one of {}",
                        Tag::ALL
                            .iter()
                            .map(|tag| format!("`{tag}`"))
                            .collect::<Vec<_>>()
                            .join(", ")
                    ));
            }
            Context::DuplicateAttribute {
                name,
                first,
                second,
            } => {
                return Diagnostic::error(format!("attribute `{name}` is written more than once"))
                    .with_code(ErrorCode::E104)
                    .with_label(*second, "duplicate attribute")
                    .with_secondary_label(*first, "first written here")
                    .with_help("remove one of the attributes");
            }
            Context::Unclosed { tag, open } => {
                return Diagnostic::error(format!("unclosed `<{tag}>`"))
                    .with_code(ErrorCode::E101)
                    .with_label(*open, "opened here and never closed")
                    .with_help(format!("add `</{tag}>` or write the element as `<{tag}/>`"));
            }
            Context::Mismatched {
                expected,
                open,
                found,
                span,
            } => {
                return Diagnostic::error(format!(
                    "mismatched closing tag: expected `</{expected}>`, found `</{found}>`"
                ))
                .with_code(ErrorCode::E102)
                .with_label(*span, format!("expected `</{expected}>`"))
                .with_secondary_label(*open, format!("`{expected}` opened here"));
            }
            Context::StrayClosing { name, span } => {
                return Diagnostic::error(format!("unexpected closing tag `</{name}>`"))
                    .with_code(ErrorCode::E102)
                    .with_label(*span, "no matching opening tag");
            }
            Context::TooDeep { tag, open } => {
                return Diagnostic::error(format!(
                    "`<{tag}>` is nested more than {MAX_NESTING_DEPTH} levels deep"
                ))
                .with_code(ErrorCode::E105)
                .with_label(*open, "nested too deep")
                .with_help("flatten the document by removing wrapper elements");
            }
            Context::Label(_) | Context::StartOffset(_) => {}
        }
    }

    let start_remaining = error.context().find_map(|ctx| match ctx {
        Context::StartOffset(n) => Some(*n),
        _ => None,
    });
    let expected = error.context().find_map(|ctx| match ctx {
        Context::Label(label) => Some(*label),
        _ => None,
    });

    let end_offset = tokens.len() - current_remaining;
    let start_offset = start_remaining.map_or(end_offset, |r| tokens.len() - r);

    let (found, error_span) = match tokens.get(end_offset) {
        Some(token) => {
            let first = tokens[start_offset.min(end_offset)..end_offset]
                .iter()
                .find(|t| !matches!(t.token, Token::Whitespace))
                .map_or(token.span, |t| t.span);
            (token.token.to_string(), first.union(token.span))
        }
        None => {
            let end = tokens.last().map_or(0, |t| t.span.end());
            ("end of input".to_string(), Span::new(end..end))
        }
    };

    let message = match expected {
        Some(label) => format!("unexpected {found}, expected {label}"),
        None => format!("unexpected {found}"),
    };

    Diagnostic::error(message)
        .with_code(ErrorCode::E100)
        .with_label(error_span, "unexpected token")
}

/// Build a document from tokens
pub fn build_document<'src>(tokens: &'src [PositionedToken<'src>]) -> Result<Document> {
    let mut token_slice = TokenSlice::new(tokens);

    match document.parse_next(&mut token_slice) {
        Ok(elements) => {
            let end = tokens.last().map_or(0, |t| t.span.end());
            Ok(Document::new(elements, Span::new(0..end)))
        }
        Err(e) => {
            let current_remaining = token_slice.eof_offset();
            Err(convert_error(e, tokens, current_remaining))
        }
    }
}
