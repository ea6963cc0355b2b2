//! The untyped GemXML element tree.
//!
//! A [`Document`] is what the parser produces and what the include resolver,
//! validator and attribute resolver consume. Attribute values stay raw
//! strings here; nothing is interpreted until resolution.

use std::{fmt, str::FromStr};

use indexmap::IndexMap;

use gem_core::{identifier::Id, text::TextSpan};

use crate::span::{Span, Spanned};

/// The closed GemXML tag vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Window,
    Text,
    Div,
    Line,
    Rect,
    Circle,
    Include,
}

impl Tag {
    pub const ALL: [Tag; 7] = [
        Tag::Window,
        Tag::Text,
        Tag::Div,
        Tag::Line,
        Tag::Rect,
        Tag::Circle,
        Tag::Include,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Tag::Window => "window",
            Tag::Text => "text",
            Tag::Div => "div",
            Tag::Line => "line",
            Tag::Rect => "rect",
            Tag::Circle => "circle",
            Tag::Include => "include",
        }
    }

    /// Containers turn character data into implicit `text` children.
    pub fn is_container(self) -> bool {
        matches!(self, Tag::Window | Tag::Div)
    }

    /// Leaf shapes accept neither children nor text.
    pub fn is_shape(self) -> bool {
        matches!(self, Tag::Line | Tag::Rect | Tag::Circle)
    }
}

impl FromStr for Tag {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw attribute as written in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub value: Spanned<String>,
}

/// Text carried by a `text` or `include` element.
#[derive(Debug, Clone, PartialEq)]
pub enum TextContent {
    /// Whitespace-collapsed character data
    Raw(Spanned<String>),
    /// Spans spliced in from a GemMD include
    Rich(Vec<TextSpan>),
}

impl TextContent {
    /// Returns the raw text, if this content has not been parsed into spans.
    pub fn as_raw(&self) -> Option<&Spanned<String>> {
        match self {
            TextContent::Raw(raw) => Some(raw),
            TextContent::Rich(_) => None,
        }
    }
}

/// One GemXML element.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementNode {
    pub tag: Spanned<Tag>,
    /// Attributes other than `class` and `id`, in source order
    pub attributes: IndexMap<String, Attribute>,
    pub classes: Vec<Id>,
    pub id: Option<Spanned<Id>>,
    pub children: Vec<ElementNode>,
    pub content: Option<TextContent>,
    /// The whole element, from `<` to the end of its closing tag
    pub span: Span,
}

impl ElementNode {
    pub fn new(tag: Spanned<Tag>, span: Span) -> Self {
        Self {
            tag,
            attributes: IndexMap::new(),
            classes: Vec::new(),
            id: None,
            children: Vec::new(),
            content: None,
            span,
        }
    }

    /// Builds the implicit `text` element wrapping bare character data.
    pub fn implicit_text(text: Spanned<String>) -> Self {
        let span = text.span();
        let mut node = Self::new(Spanned::new(Tag::Text, span), span);
        node.content = Some(TextContent::Raw(text));
        node
    }

    pub fn tag(&self) -> Tag {
        self.tag.value()
    }

    /// Returns the raw value of an attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .map(|attribute| attribute.value.inner().as_str())
    }

    pub fn has_class(&self, class: Id) -> bool {
        self.classes.contains(&class)
    }

    /// Visits this element and all descendants in depth-first pre-order.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a ElementNode)) {
        f(self);
        for child in &self.children {
            child.walk(f);
        }
    }
}

/// A parsed GemXML document: the list of top-level elements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub elements: Vec<ElementNode>,
    /// Span of the whole source
    pub span: Span,
}

impl Document {
    pub fn new(elements: Vec<ElementNode>, span: Span) -> Self {
        Self { elements, span }
    }

    /// Visits every element in depth-first pre-order.
    pub fn walk<'a>(&'a self, mut f: impl FnMut(&'a ElementNode)) {
        for element in &self.elements {
            element.walk(&mut f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_from_str() {
        assert_eq!("circle".parse::<Tag>(), Ok(Tag::Circle));
        assert_eq!("include".parse::<Tag>(), Ok(Tag::Include));
        assert!("Window".parse::<Tag>().is_err());
        assert!("button".parse::<Tag>().is_err());
    }

    #[test]
    fn test_tag_categories() {
        assert!(Tag::Div.is_container());
        assert!(!Tag::Text.is_container());
        assert!(Tag::Line.is_shape());
        assert!(!Tag::Include.is_shape());
    }

    #[test]
    fn test_walk_is_preorder() {
        let span = Span::default();
        let mut window = ElementNode::new(Spanned::new(Tag::Window, span), span);
        let mut div = ElementNode::new(Spanned::new(Tag::Div, span), span);
        div.children
            .push(ElementNode::implicit_text(Spanned::new("a".into(), span)));
        window.children.push(div);
        window
            .children
            .push(ElementNode::new(Spanned::new(Tag::Rect, span), span));
        let document = Document::new(vec![window], span);

        let mut tags = Vec::new();
        document.walk(|node| tags.push(node.tag()));
        assert_eq!(tags, [Tag::Window, Tag::Div, Tag::Text, Tag::Rect]);
    }
}
