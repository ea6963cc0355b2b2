//! Semantic validation of an include-free document.
//!
//! A single read-only traversal collects everything the structural rules
//! need. Errors are reported in a fixed priority: window count first, then
//! duplicate ids, then the first structural problem in document order.
//!
//! ## Validations Performed
//!
//! - **Window**: exactly one `window`, and it is the document root
//! - **Ids**: element ids are unique across the document
//! - **Placement**: nothing but the window appears at the top level
//! - **Content**: shapes take no children or text, `text` takes no children
//! - **Includes**: no `include` survives include resolution

use std::collections::{HashMap, HashSet};

use log::debug;

use gem_core::identifier::Id;

use crate::{
    document::{Document, ElementNode, Tag, TextContent},
    error::{CompileError, Diagnostic, DiagnosticCollector, ErrorCode},
    include::IncludeKind,
    span::{Span, Spanned},
    stylesheet::{Selector, Stylesheet},
};

/// Visitor trait for read-only traversal of a [`Document`].
///
/// Default implementations recurse, so implementors override only what they
/// need.
pub trait Visitor<'a> {
    fn visit_document(&mut self, document: &'a Document) {
        self.visit_elements(&document.elements, None);
    }

    /// Visit siblings. `parent` is `None` at the top level.
    fn visit_elements(&mut self, elements: &'a [ElementNode], parent: Option<&'a ElementNode>) {
        for element in elements {
            self.visit_element(element, parent);
        }
    }

    fn visit_element(&mut self, element: &'a ElementNode, _parent: Option<&'a ElementNode>) {
        if let Some(id) = &element.id {
            self.visit_id(id);
        }
        if let Some(content) = &element.content {
            self.visit_content(element, content);
        }
        self.visit_elements(&element.children, Some(element));
    }

    fn visit_id(&mut self, _id: &'a Spanned<Id>) {}

    fn visit_content(&mut self, _element: &'a ElementNode, _content: &'a TextContent) {}
}

/// Entry point for running a visitor on a document
pub fn visit_document<'a, V: Visitor<'a>>(visitor: &mut V, document: &'a Document) {
    visitor.visit_document(document)
}

/// Collects the facts the validation rules are checked against.
struct Validator<'a> {
    windows: Vec<&'a ElementNode>,
    ids: HashMap<Id, Span>,
    duplicate_id: Option<Diagnostic>,
    structural: Option<Diagnostic>,
}

impl<'a> Validator<'a> {
    fn new() -> Self {
        Self {
            windows: Vec::new(),
            ids: HashMap::new(),
            duplicate_id: None,
            structural: None,
        }
    }

    /// Keeps only the first structural error.
    fn structural_error(&mut self, diagnostic: Diagnostic) {
        if self.structural.is_none() {
            self.structural = Some(diagnostic);
        }
    }

    fn check_placement(&mut self, element: &'a ElementNode, parent: Option<&'a ElementNode>) {
        let tag = element.tag();
        match (tag, parent) {
            (Tag::Window, Some(parent)) => self.structural_error(
                Diagnostic::error("window must be the document root")
                    .with_code(ErrorCode::E303)
                    .with_label(element.tag.span(), "nested window")
                    .with_secondary_label(parent.tag.span(), format!("inside this `{}`", parent.tag())),
            ),
            (Tag::Include, _) => self.check_leftover_include(element),
            (Tag::Window, None) => {}
            (_, None) => self.structural_error(
                Diagnostic::error(format!("`{tag}` must be inside the window"))
                    .with_code(ErrorCode::E303)
                    .with_label(element.tag.span(), "top-level element")
                    .with_help("the window is the only element allowed at the top level"),
            ),
            (_, Some(_)) => {}
        }
    }

    fn check_leftover_include(&mut self, element: &'a ElementNode) {
        let unsupported = element
            .attributes
            .get("as")
            .filter(|kind| kind.value.inner().parse::<IncludeKind>().is_err());

        let diagnostic = match unsupported {
            Some(kind) => Diagnostic::error(format!(
                "unsupported include kind `{}`",
                kind.value.inner()
            ))
            .with_code(ErrorCode::E200)
            .with_label(kind.value.span(), "unsupported kind"),
            None => Diagnostic::error("include was not resolved")
                .with_code(ErrorCode::E303)
                .with_label(element.span, "unresolved include")
                .with_help("resolve includes before validating"),
        };
        self.structural_error(diagnostic);
    }

    fn check_children(&mut self, element: &'a ElementNode) {
        let tag = element.tag();
        let takes_children = tag.is_container();
        if let (false, Some(child)) = (takes_children, element.children.first()) {
            self.structural_error(
                Diagnostic::error(format!("`{tag}` cannot contain elements"))
                    .with_code(ErrorCode::E304)
                    .with_label(child.span, "unexpected child")
                    .with_secondary_label(element.tag.span(), format!("inside this `{tag}`")),
            );
        }
    }

    fn finish(self, document: &Document, stylesheet: &Stylesheet) -> Result<(), CompileError> {
        debug!(windows = self.windows.len(), ids = self.ids.len(); "Validated document");

        let window_error = match self.windows.as_slice() {
            [] => Some(
                Diagnostic::error("document has no window")
                    .with_code(ErrorCode::E300)
                    .with_label(document.span, "no `window` element")
                    .with_help("wrap the document in a single `<window>` element"),
            ),
            [_] => None,
            [first, second, ..] => Some(
                Diagnostic::error(format!(
                    "document has {} windows, expected exactly one",
                    self.windows.len()
                ))
                .with_code(ErrorCode::E301)
                .with_label(second.tag.span(), "second window")
                .with_secondary_label(first.tag.span(), "first window"),
            ),
        };

        if let Some(error) = window_error.or(self.duplicate_id).or(self.structural) {
            return Err(error.into());
        }

        let mut collector = DiagnosticCollector::new();
        let mut reported = HashSet::new();
        for rule in stylesheet.rules() {
            let Selector::Id(id) = rule.selector else {
                continue;
            };
            if !self.ids.contains_key(&id) && reported.insert(id) {
                let mut warning = Diagnostic::warning(format!("selector `#{id}` matches no element"));
                if let Some(origin) = &rule.origin {
                    warning = warning.with_help(format!("rule defined in `{origin}`"));
                }
                collector.emit(warning);
            }
        }
        collector.finish()
    }
}

impl<'a> Visitor<'a> for Validator<'a> {
    fn visit_element(&mut self, element: &'a ElementNode, parent: Option<&'a ElementNode>) {
        if element.tag() == Tag::Window {
            self.windows.push(element);
        }
        self.check_placement(element, parent);
        self.check_children(element);

        if let Some(id) = &element.id {
            self.visit_id(id);
        }
        if let Some(content) = &element.content {
            self.visit_content(element, content);
        }
        self.visit_elements(&element.children, Some(element));
    }

    fn visit_id(&mut self, id: &'a Spanned<Id>) {
        match self.ids.get(&id.value()) {
            Some(first) if self.duplicate_id.is_none() => {
                self.duplicate_id = Some(
                    Diagnostic::error(format!("duplicate id `{}`", id.inner()))
                        .with_code(ErrorCode::E302)
                        .with_label(id.span(), "duplicate id")
                        .with_secondary_label(*first, "first used here"),
                );
            }
            Some(_) => {}
            None => {
                self.ids.insert(id.value(), id.span());
            }
        }
    }

    fn visit_content(&mut self, element: &'a ElementNode, content: &'a TextContent) {
        let tag = element.tag();
        if !tag.is_shape() {
            return;
        }
        let span = match content {
            TextContent::Raw(raw) => raw.span(),
            TextContent::Rich(_) => element.span,
        };
        self.structural_error(
            Diagnostic::error(format!("`{tag}` cannot contain text"))
                .with_code(ErrorCode::E304)
                .with_label(span, "unexpected text")
                .with_secondary_label(element.tag.span(), format!("inside this `{tag}`")),
        );
    }
}

/// Check the structural invariants of a document whose includes have been
/// resolved.
///
/// Id selectors in `stylesheet` that match no element are logged as
/// warnings.
pub fn validate(document: &Document, stylesheet: &Stylesheet) -> Result<(), CompileError> {
    let mut validator = Validator::new();
    visit_document(&mut validator, document);
    validator.finish(document, stylesheet)
}
