//! Include resolution.
//!
//! `<include as="style">path</include>` pulls a GemSheet file into the
//! global stylesheet and disappears from the tree. `<include as="md">` is
//! replaced in place by a `text` element holding the parsed GemMD spans.
//! File access goes through the [`Loader`] trait so callers decide how paths
//! are resolved.

use std::{fmt, io, str::FromStr};

use log::{debug, warn};
use thiserror::Error;

use crate::{
    document::{Document, ElementNode, Tag, TextContent},
    error::{CompileError, Diagnostic, ErrorCode},
    markdown::parse_markdown,
    span::{Spanned, line_col},
    stylesheet::{Origin, Stylesheet, parse_stylesheet},
};

/// Failure to fetch the contents of an include.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {0}")]
    NotFound(String),

    #[error("failed to read `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("{0}")]
    Other(String),
}

/// Fetches the text of an included file.
pub trait Loader {
    fn load(&self, path: &str) -> Result<String, LoadError>;
}

impl<F> Loader for F
where
    F: Fn(&str) -> Result<String, LoadError>,
{
    fn load(&self, path: &str) -> Result<String, LoadError> {
        self(path)
    }
}

/// The `as` attribute of an include.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncludeKind {
    Style,
    Markdown,
}

impl IncludeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            IncludeKind::Style => "style",
            IncludeKind::Markdown => "md",
        }
    }

    /// File extension expected for this kind.
    pub fn extension(self) -> &'static str {
        match self {
            IncludeKind::Style => "gms",
            IncludeKind::Markdown => "md",
        }
    }
}

impl FromStr for IncludeKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "style" => Ok(IncludeKind::Style),
            "md" => Ok(IncludeKind::Markdown),
            _ => Err(()),
        }
    }
}

impl fmt::Display for IncludeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct IncludeResolver<'a> {
    loader: &'a dyn Loader,
    stylesheet: Stylesheet,
}

impl IncludeResolver<'_> {
    fn resolve_elements(&mut self, elements: Vec<ElementNode>) -> Result<Vec<ElementNode>, CompileError> {
        let mut resolved = Vec::with_capacity(elements.len());
        for mut element in elements {
            if element.tag() == Tag::Include {
                if let Some(replacement) = self.resolve_include(element)? {
                    resolved.push(replacement);
                }
                continue;
            }
            element.children = self.resolve_elements(std::mem::take(&mut element.children))?;
            resolved.push(element);
        }
        Ok(resolved)
    }

    /// Returns the node that replaces the include, if any.
    fn resolve_include(&mut self, include: ElementNode) -> Result<Option<ElementNode>, CompileError> {
        let kind = include_kind(&include)?;
        let path = include_path(&include)?;

        if !has_extension(path.inner(), kind.extension()) {
            warn!(
                path = path.inner().as_str(),
                kind = kind.as_str();
                "Include path does not have the expected `.{}` extension",
                kind.extension()
            );
        }

        debug!(path = path.inner().as_str(), kind = kind.as_str(); "Loading include");
        let source = self.loader.load(path.inner()).map_err(|err| {
            Diagnostic::error(format!("failed to load `{}`: {err}", path.inner()))
                .with_code(ErrorCode::E203)
                .with_label(path.span(), "included here")
        })?;

        match kind {
            IncludeKind::Style => {
                let sheet = parse_stylesheet(&source)
                    .map_err(|err| relocate(err, path.inner(), &source, &include))?;
                debug!(path = path.inner().as_str(), rules = sheet.len(); "Included stylesheet");
                let origin = Origin::new(path.inner().as_str(), source);
                self.stylesheet.extend(sheet.with_origin(origin));
                Ok(None)
            }
            IncludeKind::Markdown => {
                let spans = parse_markdown(&source);
                let mut text = ElementNode::new(Spanned::new(Tag::Text, include.tag.span()), include.span);
                text.classes = include.classes;
                text.id = include.id;
                text.content = Some(TextContent::Rich(spans));
                Ok(Some(text))
            }
        }
    }
}

fn include_kind(include: &ElementNode) -> Result<IncludeKind, Diagnostic> {
    let Some(attribute) = include.attributes.get("as") else {
        return Err(Diagnostic::error("include is missing its `as` attribute")
            .with_code(ErrorCode::E201)
            .with_label(include.tag.span(), "include without kind")
            .with_help("use `as=\"style\"` or `as=\"md\"`"));
    };

    attribute.value.inner().parse().map_err(|()| {
        Diagnostic::error(format!(
            "unsupported include kind `{}`",
            attribute.value.inner()
        ))
        .with_code(ErrorCode::E200)
        .with_label(attribute.value.span(), "unsupported kind")
        .with_help("supported kinds are `style` and `md`")
    })
}

fn include_path(include: &ElementNode) -> Result<Spanned<String>, Diagnostic> {
    if let Some(child) = include.children.first() {
        return Err(Diagnostic::error("include path must be plain text")
            .with_code(ErrorCode::E202)
            .with_label(child.span, "unexpected element"));
    }

    include
        .content
        .as_ref()
        .and_then(TextContent::as_raw)
        .filter(|raw| !raw.inner().trim().is_empty())
        .map(|raw| Spanned::new(raw.inner().trim().to_string(), raw.span()))
        .ok_or_else(|| {
            Diagnostic::error("include path is empty")
                .with_code(ErrorCode::E202)
                .with_label(include.span, "no path given")
                .with_help("write the path between the include tags")
        })
}

fn has_extension(path: &str, extension: &str) -> bool {
    path.rsplit_once('.')
        .is_some_and(|(stem, ext)| !stem.is_empty() && ext.eq_ignore_ascii_case(extension))
}

/// Re-anchor diagnostics from an included file onto the include element.
fn relocate(err: CompileError, path: &str, source: &str, include: &ElementNode) -> CompileError {
    err.diagnostics()
        .iter()
        .map(|diagnostic| {
            let location = diagnostic
                .primary_span()
                .map(|span| {
                    let (line, col) = line_col(source, span.start());
                    format!("{path}:{line}:{col}")
                })
                .unwrap_or_else(|| path.to_string());

            let mut relocated = Diagnostic::error(format!("{location}: {}", diagnostic.message()))
                .with_label(include.span, format!("error in `{path}`"));
            if let Some(code) = diagnostic.code() {
                relocated = relocated.with_code(code);
            }
            if let Some(help) = diagnostic.help() {
                relocated = relocated.with_help(help);
            }
            relocated
        })
        .collect::<Vec<_>>()
        .into()
}

/// Splice every include in `document`.
///
/// Returns the document with includes removed or replaced and the global
/// stylesheet built from the `style` includes in document order.
pub fn resolve_includes(
    document: Document,
    loader: &dyn Loader,
) -> Result<(Document, Stylesheet), CompileError> {
    let Document { elements, span } = document;
    let mut resolver = IncludeResolver {
        loader,
        stylesheet: Stylesheet::default(),
    };
    let elements = resolver.resolve_elements(elements)?;
    Ok((Document::new(elements, span), resolver.stylesheet))
}
