//! Compiler front-end for Gem documents.
//!
//! A compile runs strictly in order:
//!
//! 1. [`parse`]: GemXML source to a [`Document`] (lexer, then token parser)
//! 2. [`resolve_includes`]: splice `<include>` elements through a [`Loader`]
//! 3. [`validate`]: structural checks on the include-free document
//! 4. [`resolve`]: cascade, defaults and paint for every element
//! 5. [`build`]: the immutable [`SceneNode`] tree
//!
//! [`compile`] runs all of them. Every stage reports failures as a
//! [`CompileError`] whose diagnostics carry spans into the GemXML source.

pub mod document;
pub mod error;
pub mod include;
mod lexer;
pub mod markdown;
mod parser;
pub mod resolve;
pub mod scene;
mod span;
pub mod stylesheet;
mod tokens;
pub mod validate;

use log::{debug, info, trace};

use gem_core::scene::SceneNode;

pub use document::{Document, ElementNode, Tag};
pub use error::CompileError;
pub use include::{LoadError, Loader, resolve_includes};
pub use markdown::parse_markdown;
pub use parser::MAX_NESTING_DEPTH;
pub use resolve::{CompileConfig, ResolvedTree, resolve};
pub use scene::build;
pub use span::{Span, Spanned, line_col};
pub use stylesheet::{Stylesheet, parse_stylesheet};
pub use validate::validate;

/// Parse GemXML source into a document.
///
/// Only markup is checked here; see [`compile`] for the full pipeline.
pub fn parse(source: &str) -> Result<Document, CompileError> {
    let tokens = lexer::tokenize(source)?;
    trace!(tokens = tokens.len(); "Tokenized source");
    let document = parser::build_document(&tokens)?;
    Ok(document)
}

/// Compile GemXML source into a scene graph.
///
/// Includes are fetched through `loader`. The first failing stage stops the
/// compile.
pub fn compile(
    source: &str,
    loader: &dyn Loader,
    config: &CompileConfig,
) -> Result<SceneNode, CompileError> {
    info!("Parsing document");
    let document = parse(source)?;
    debug!(elements = document.elements.len(); "Parsed document");

    info!("Resolving includes");
    let (document, stylesheet) = resolve_includes(document, loader)?;
    debug!(rules = stylesheet.len(); "Resolved includes");
    trace!(stylesheet:%; "Global stylesheet");

    info!("Validating document");
    validate(&document, &stylesheet)?;

    info!(inline_markdown = config.inline_markdown(); "Resolving attributes");
    let tree = resolve(&document, &stylesheet, config)?;

    info!("Building scene");
    let scene = build(&tree);
    trace!(scene:%; "Scene");
    Ok(scene)
}
