//! Attribute resolution.
//!
//! Every property of an element is looked up in three places, strongest
//! first:
//!
//! 1. an explicit attribute on the element
//! 2. the stylesheet cascade: id rules beat class rules beat element rules,
//!    later rules beat earlier ones and later declarations beat earlier ones
//! 3. the built-in default, which for shapes depends on the window size
//!
//! The window is resolved before anything else so the shape defaults can
//! refer to its dimensions. `color` is inherited by children; `background`
//! is not.

use indexmap::IndexMap;
use log::{debug, warn};

use gem_core::{
    color::Shade,
    geometry::{Bounds, Point, Size},
    scene::{Drawable, Paint},
    text::TextSpan,
};

use crate::{
    document::{Attribute, Document, ElementNode, Tag, TextContent},
    error::{CompileError, Diagnostic, ErrorCode},
    markdown::parse_markdown,
    stylesheet::{Declaration, Origin, Selector, Specificity, Stylesheet},
};

const WINDOW_X: f32 = 45.0;
const WINDOW_Y: f32 = 35.0;
const WINDOW_WIDTH: f32 = 30.0;
const WINDOW_HEIGHT: f32 = 20.0;
const WINDOW_TITLE: &str = "Title";

const RECT_WIDTH: f32 = 10.0;
const RECT_HEIGHT: f32 = 6.0;
const CIRCLE_RADIUS: f32 = 4.0;

/// Every property name the resolver understands.
const KNOWN_PROPERTIES: [&str; 12] = [
    "x",
    "y",
    "width",
    "height",
    "radius",
    "startx",
    "starty",
    "endx",
    "endy",
    "title",
    "color",
    "background",
];

/// Properties that apply to each tag.
fn applicable_properties(tag: Tag) -> &'static [&'static str] {
    match tag {
        Tag::Window => &["x", "y", "width", "height", "title", "color", "background"],
        Tag::Rect => &["x", "y", "width", "height", "color", "background"],
        Tag::Circle => &["x", "y", "radius", "color", "background"],
        Tag::Line => &["startx", "starty", "endx", "endy", "color"],
        Tag::Text | Tag::Div => &["color", "background"],
        Tag::Include => &[],
    }
}

/// Options that change how a document is compiled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileConfig {
    inline_markdown: bool,
}

impl CompileConfig {
    /// Parse the text of `<text>` elements as GemMD instead of plain text.
    pub fn with_inline_markdown(mut self, enabled: bool) -> Self {
        self.inline_markdown = enabled;
        self
    }

    pub fn inline_markdown(&self) -> bool {
        self.inline_markdown
    }
}

/// A document element with all of its properties resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedElement<'a> {
    node: &'a ElementNode,
    drawable: Drawable,
    paint: Paint,
    children: Vec<ResolvedElement<'a>>,
}

impl<'a> ResolvedElement<'a> {
    /// The source element.
    pub fn node(&self) -> &'a ElementNode {
        self.node
    }

    pub fn drawable(&self) -> &Drawable {
        &self.drawable
    }

    pub fn paint(&self) -> Paint {
        self.paint
    }

    pub fn children(&self) -> &[ResolvedElement<'a>] {
        &self.children
    }
}

/// The resolved window and everything below it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTree<'a> {
    root: ResolvedElement<'a>,
}

impl<'a> ResolvedTree<'a> {
    pub fn root(&self) -> &ResolvedElement<'a> {
        &self.root
    }
}

/// Where a property value came from.
#[derive(Debug, Clone, Copy)]
enum PropertyValue<'a> {
    Attribute(&'a Attribute),
    Rule {
        selector: Selector,
        declaration: &'a Declaration,
        origin: Option<&'a Origin>,
    },
}

impl<'a> PropertyValue<'a> {
    fn raw(&self) -> &'a str {
        match self {
            PropertyValue::Attribute(attribute) => attribute.value.inner(),
            PropertyValue::Rule { declaration, .. } => &declaration.value,
        }
    }
}

/// The winning value of every property set on one element.
struct Properties<'a> {
    node: &'a ElementNode,
    values: IndexMap<&'a str, PropertyValue<'a>>,
}

impl<'a> Properties<'a> {
    fn collect(node: &'a ElementNode, stylesheet: &'a Stylesheet) -> Self {
        let mut values = IndexMap::new();

        for specificity in Specificity::ASCENDING {
            let rules = stylesheet.rules().iter().filter(|rule| {
                rule.selector.specificity() == specificity && rule.selector.matches(node)
            });
            for rule in rules {
                for declaration in &rule.declarations {
                    values.insert(
                        declaration.property.as_str(),
                        PropertyValue::Rule {
                            selector: rule.selector,
                            declaration,
                            origin: rule.origin.as_deref(),
                        },
                    );
                }
            }
        }

        for (name, attribute) in &node.attributes {
            values.insert(name.as_str(), PropertyValue::Attribute(attribute));
        }

        let properties = Self { node, values };
        properties.report_ignored();
        properties
    }

    fn report_ignored(&self) {
        let tag = self.node.tag();
        let applicable = applicable_properties(tag);
        for name in self.values.keys() {
            if applicable.iter().any(|property| property == name) {
                continue;
            }
            if KNOWN_PROPERTIES.iter().any(|property| property == name) {
                debug!(property = name, tag = tag.as_str(); "Ignoring property that does not apply");
            } else {
                warn!(property = name, tag = tag.as_str(); "Unknown property");
            }
        }
    }

    fn invalid_value(&self, name: &str, value: PropertyValue<'_>, problem: &str) -> Diagnostic {
        self.value_error(ErrorCode::E401, name, value, problem)
    }

    fn value_error(
        &self,
        code: ErrorCode,
        name: &str,
        value: PropertyValue<'_>,
        problem: &str,
    ) -> Diagnostic {
        let raw = value.raw();
        match value {
            PropertyValue::Attribute(attribute) => {
                Diagnostic::error(format!("invalid value `{raw}` for `{name}`: {problem}"))
                    .with_code(code)
                    .with_label(attribute.value.span(), problem.to_string())
            }
            PropertyValue::Rule {
                selector,
                declaration,
                origin,
            } => {
                let location = origin.map_or_else(
                    || "stylesheet".to_string(),
                    |origin| origin.locate(declaration.span),
                );
                Diagnostic::error(format!(
                    "{location}: invalid value `{raw}` for `{name}` in rule `{selector}`: {problem}"
                ))
                .with_code(code)
                .with_label(self.node.tag.span(), "styled element")
            }
        }
    }

    fn number(&self, name: &str) -> Result<Option<f32>, Diagnostic> {
        let Some(&value) = self.values.get(name) else {
            return Ok(None);
        };
        match value.raw().trim().parse::<f32>() {
            Ok(number) if number.is_finite() => Ok(Some(number)),
            _ => Err(self.invalid_value(name, value, "expected a finite number")),
        }
    }

    /// A number that may not be negative.
    fn extent(&self, name: &str) -> Result<Option<f32>, Diagnostic> {
        match self.number(name)? {
            Some(number) if number < 0.0 => {
                let value = self.values[name];
                Err(self.invalid_value(name, value, "must not be negative"))
            }
            number => Ok(number),
        }
    }

    fn shade(&self, name: &str) -> Result<Option<Shade>, Diagnostic> {
        let Some(&value) = self.values.get(name) else {
            return Ok(None);
        };
        value.raw().parse::<Shade>().map(Some).map_err(|_| {
            self.value_error(ErrorCode::E402, name, value, "expected a shade token")
                .with_help("shades are `0`, `1`, `2` and `3`")
        })
    }

    fn string(&self, name: &str) -> Option<&'a str> {
        self.values.get(name).map(PropertyValue::raw)
    }

    fn required(&self, name: &str) -> Result<f32, Diagnostic> {
        self.number(name)?.ok_or_else(|| {
            Diagnostic::error(format!("`{}` requires `{name}`", self.node.tag()))
                .with_code(ErrorCode::E400)
                .with_label(self.node.tag.span(), format!("missing `{name}`"))
                .with_help(format!(
                    "set `{name}` as an attribute or in a stylesheet rule"
                ))
        })
    }
}

fn window_bounds(properties: &Properties<'_>) -> Result<Bounds, Diagnostic> {
    let x = properties.number("x")?.unwrap_or(WINDOW_X);
    let y = properties.number("y")?.unwrap_or(WINDOW_Y);
    let width = properties.extent("width")?.unwrap_or(WINDOW_WIDTH);
    let height = properties.extent("height")?.unwrap_or(WINDOW_HEIGHT);
    Ok(Bounds::new(Point::new(x, y), Size::new(width, height)))
}

struct Resolver<'a> {
    stylesheet: &'a Stylesheet,
    config: &'a CompileConfig,
    window: Bounds,
}

impl<'a> Resolver<'a> {
    fn resolve_element(
        &self,
        node: &'a ElementNode,
        properties: Properties<'a>,
        inherited_color: Option<Shade>,
    ) -> Result<ResolvedElement<'a>, Diagnostic> {
        let tag = node.tag();
        let drawable = self.drawable(node, &properties)?;

        let applicable = applicable_properties(tag);
        let foreground = properties.shade("color")?.or(inherited_color);
        let background = if applicable.contains(&"background") {
            properties.shade("background")?
        } else {
            None
        };
        let paint = Paint::new(foreground, background);

        let children = node
            .children
            .iter()
            .map(|child| {
                let properties = Properties::collect(child, self.stylesheet);
                self.resolve_element(child, properties, foreground)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ResolvedElement {
            node,
            drawable,
            paint,
            children,
        })
    }

    fn drawable(&self, node: &'a ElementNode, properties: &Properties<'a>) -> Result<Drawable, Diagnostic> {
        let window = self.window;
        let drawable = match node.tag() {
            Tag::Window => Drawable::Window {
                bounds: window,
                title: properties.string("title").unwrap_or(WINDOW_TITLE).to_string(),
            },
            Tag::Rect => {
                let x = properties.number("x")?.unwrap_or(window.width() / 2.0 - 5.0);
                let y = properties.number("y")?.unwrap_or(window.height() / 2.0 - 3.0);
                let width = properties.extent("width")?.unwrap_or(RECT_WIDTH);
                let height = properties.extent("height")?.unwrap_or(RECT_HEIGHT);
                Drawable::Rect {
                    bounds: Bounds::new(Point::new(x, y), Size::new(width, height)),
                }
            }
            Tag::Circle => {
                let x = properties.number("x")?.unwrap_or(window.width() / 2.0);
                let y = properties.number("y")?.unwrap_or(window.height() / 2.0);
                let radius = properties.extent("radius")?.unwrap_or(CIRCLE_RADIUS);
                Drawable::Circle {
                    center: Point::new(x, y),
                    radius,
                }
            }
            Tag::Line => Drawable::Line {
                start: Point::new(properties.required("startx")?, properties.required("starty")?),
                end: Point::new(properties.required("endx")?, properties.required("endy")?),
            },
            Tag::Text => Drawable::Text {
                spans: self.text_spans(node),
            },
            Tag::Div => Drawable::Div,
            Tag::Include => {
                return Err(Diagnostic::error("include was not resolved")
                    .with_code(ErrorCode::E303)
                    .with_label(node.span, "unresolved include"));
            }
        };
        Ok(drawable)
    }

    fn text_spans(&self, node: &ElementNode) -> Vec<TextSpan> {
        match &node.content {
            Some(TextContent::Rich(spans)) => spans.clone(),
            Some(TextContent::Raw(raw)) if raw.inner().is_empty() => Vec::new(),
            Some(TextContent::Raw(raw)) if self.config.inline_markdown() => {
                parse_markdown(raw.inner())
            }
            Some(TextContent::Raw(raw)) => vec![TextSpan::Plain(raw.inner().clone())],
            None => Vec::new(),
        }
    }
}

/// Resolve every property of a validated document.
pub fn resolve<'a>(
    document: &'a Document,
    stylesheet: &'a Stylesheet,
    config: &'a CompileConfig,
) -> Result<ResolvedTree<'a>, CompileError> {
    let window = document
        .elements
        .iter()
        .find(|element| element.tag() == Tag::Window)
        .ok_or_else(|| {
            Diagnostic::error("document has no window")
                .with_code(ErrorCode::E300)
                .with_label(document.span, "no `window` element")
        })?;

    let properties = Properties::collect(window, stylesheet);
    let bounds = window_bounds(&properties)?;
    debug!(window:? = bounds; "Resolved window");

    let resolver = Resolver {
        stylesheet,
        config,
        window: bounds,
    };
    let root = resolver.resolve_element(window, properties, None)?;
    Ok(ResolvedTree { root })
}
