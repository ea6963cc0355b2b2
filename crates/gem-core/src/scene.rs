//! The compiled scene graph.
//!
//! A [`SceneNode`] tree is the only artifact a renderer consumes. It is
//! immutable once built: every geometry value is final and every paint value
//! has been chosen from the shade palette.

use std::fmt;

use crate::{
    color::Shade,
    geometry::{Bounds, Geometry, Point},
    identifier::Id,
    text::TextSpan,
};

/// Foreground and background shades of a drawable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Paint {
    foreground: Option<Shade>,
    background: Option<Shade>,
}

impl Paint {
    pub fn new(foreground: Option<Shade>, background: Option<Shade>) -> Self {
        Self {
            foreground,
            background,
        }
    }

    /// Shade set through the `color` property
    pub fn foreground(self) -> Option<Shade> {
        self.foreground
    }

    /// Shade set through the `background` property
    pub fn background(self) -> Option<Shade> {
        self.background
    }

    pub fn is_empty(self) -> bool {
        self.foreground.is_none() && self.background.is_none()
    }
}

/// The typed content of a scene node.
#[derive(Debug, Clone, PartialEq)]
pub enum Drawable {
    Window { bounds: Bounds, title: String },
    Text { spans: Vec<TextSpan> },
    Div,
    Line { start: Point, end: Point },
    Rect { bounds: Bounds },
    Circle { center: Point, radius: f32 },
}

impl Drawable {
    /// Returns the GemXML tag name this drawable was built from.
    pub fn kind(&self) -> &'static str {
        match self {
            Drawable::Window { .. } => "window",
            Drawable::Text { .. } => "text",
            Drawable::Div => "div",
            Drawable::Line { .. } => "line",
            Drawable::Rect { .. } => "rect",
            Drawable::Circle { .. } => "circle",
        }
    }

    /// Returns the resolved geometry of this drawable.
    pub fn geometry(&self) -> Geometry {
        match self {
            Drawable::Window { bounds, .. } | Drawable::Rect { bounds } => Geometry::Bounds(*bounds),
            Drawable::Circle { center, radius } => Geometry::Circle {
                center: *center,
                radius: *radius,
            },
            Drawable::Line { start, end } => Geometry::Line {
                start: *start,
                end: *end,
            },
            Drawable::Text { .. } | Drawable::Div => Geometry::None,
        }
    }
}

/// A node of the compiled scene.
///
/// # Examples
///
/// ```
/// # use gem_core::geometry::{Bounds, Point, Size};
/// # use gem_core::scene::{Drawable, SceneNode};
/// let rect = SceneNode::new(Drawable::Rect {
///     bounds: Bounds::new(Point::new(9.0, 3.5), Size::new(10.0, 6.0)),
/// })
/// .with_id(Some("box".into()));
///
/// let window = SceneNode::new(Drawable::Window {
///     bounds: Bounds::new(Point::new(45.0, 35.0), Size::new(28.0, 13.0)),
///     title: "Title".to_string(),
/// })
/// .with_children(vec![rect]);
///
/// assert_eq!(window.iter().count(), 2);
/// assert_eq!(window.find_by_id("box").unwrap().drawable().kind(), "rect");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    drawable: Drawable,
    classes: Vec<Id>,
    id: Option<Id>,
    paint: Paint,
    children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn new(drawable: Drawable) -> Self {
        Self {
            drawable,
            classes: Vec::new(),
            id: None,
            paint: Paint::default(),
            children: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: Option<Id>) -> Self {
        self.id = id;
        self
    }

    pub fn with_classes(mut self, classes: Vec<Id>) -> Self {
        self.classes = classes;
        self
    }

    pub fn with_paint(mut self, paint: Paint) -> Self {
        self.paint = paint;
        self
    }

    pub fn with_children(mut self, children: Vec<SceneNode>) -> Self {
        self.children = children;
        self
    }

    pub fn drawable(&self) -> &Drawable {
        &self.drawable
    }

    pub fn geometry(&self) -> Geometry {
        self.drawable.geometry()
    }

    pub fn classes(&self) -> &[Id] {
        &self.classes
    }

    pub fn id(&self) -> Option<Id> {
        self.id
    }

    pub fn paint(&self) -> Paint {
        self.paint
    }

    pub fn children(&self) -> &[SceneNode] {
        &self.children
    }

    /// Iterates over this node and all descendants in depth-first pre-order.
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }

    /// Finds the node carrying the given id, if any.
    pub fn find_by_id(&self, id: &str) -> Option<&SceneNode> {
        self.iter().find(|node| node.id.is_some_and(|node_id| node_id == id))
    }

    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{:indent$}{}", "", self.drawable.kind(), indent = depth * 2)?;
        if let Some(id) = self.id {
            write!(f, "#{id}")?;
        }
        for class in &self.classes {
            write!(f, ".{class}")?;
        }

        match &self.drawable {
            Drawable::Window { bounds, title } => {
                write!(f, " {title:?}")?;
                write_bounds(f, *bounds)?;
            }
            Drawable::Rect { bounds } => write_bounds(f, *bounds)?,
            Drawable::Circle { center, radius } => {
                write!(f, " [cx={} cy={} r={radius}]", center.x(), center.y())?;
            }
            Drawable::Line { start, end } => write!(
                f,
                " [{},{} -> {},{}]",
                start.x(),
                start.y(),
                end.x(),
                end.y()
            )?,
            Drawable::Text { spans } => {
                let markdown: String = spans.iter().map(ToString::to_string).collect();
                write!(f, " {markdown:?}")?;
            }
            Drawable::Div => {}
        }

        if let Some(shade) = self.paint.foreground {
            write!(f, " color={shade}")?;
        }
        if let Some(shade) = self.paint.background {
            write!(f, " background={shade}")?;
        }
        writeln!(f)?;

        for child in &self.children {
            child.fmt_tree(f, depth + 1)?;
        }
        Ok(())
    }
}

fn write_bounds(f: &mut fmt::Formatter<'_>, bounds: Bounds) -> fmt::Result {
    write!(
        f,
        " [x={} y={} w={} h={}]",
        bounds.x(),
        bounds.y(),
        bounds.width(),
        bounds.height()
    )
}

impl fmt::Display for SceneNode {
    /// Writes an indented tree dump, one node per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}

impl<'a> IntoIterator for &'a SceneNode {
    type Item = &'a SceneNode;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Depth-first pre-order iterator over a scene tree.
pub struct Iter<'a> {
    stack: Vec<&'a SceneNode>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a SceneNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;

    fn window(children: Vec<SceneNode>) -> SceneNode {
        SceneNode::new(Drawable::Window {
            bounds: Bounds::new(Point::new(45.0, 35.0), Size::new(30.0, 20.0)),
            title: "Title".to_string(),
        })
        .with_children(children)
    }

    #[test]
    fn test_iter_is_depth_first_preorder() {
        let div = SceneNode::new(Drawable::Div).with_children(vec![
            SceneNode::new(Drawable::Text {
                spans: vec![TextSpan::Plain("a".into())],
            }),
            SceneNode::new(Drawable::Div),
        ]);
        let circle = SceneNode::new(Drawable::Circle {
            center: Point::new(15.0, 10.0),
            radius: 4.0,
        });
        let scene = window(vec![div, circle]);

        let kinds: Vec<_> = scene.iter().map(|n| n.drawable().kind()).collect();
        assert_eq!(kinds, ["window", "div", "text", "div", "circle"]);
    }

    #[test]
    fn test_find_by_id() {
        let scene = window(vec![
            SceneNode::new(Drawable::Div).with_id(Some("outer".into())),
            SceneNode::new(Drawable::Line {
                start: Point::new(0.0, 0.0),
                end: Point::new(1.0, 1.0),
            })
            .with_id(Some("diag".into())),
        ]);

        assert_eq!(scene.find_by_id("diag").unwrap().drawable().kind(), "line");
        assert!(scene.find_by_id("missing").is_none());
    }

    #[test]
    fn test_geometry_matches_drawable() {
        let scene = window(Vec::new());
        assert_eq!(scene.geometry().as_bounds().unwrap().width(), 30.0);
        assert!(SceneNode::new(Drawable::Div).geometry().is_none());
    }

    #[test]
    fn test_display_tree_dump() {
        let rect = SceneNode::new(Drawable::Rect {
            bounds: Bounds::new(Point::new(9.0, 3.5), Size::new(10.0, 6.0)),
        })
        .with_id(Some("box".into()))
        .with_classes(vec!["big".into()])
        .with_paint(Paint::new(Some(Shade::Shade1), None));
        let scene = window(vec![rect]);

        let dump = scene.to_string();
        let lines: Vec<_> = dump.lines().collect();
        assert_eq!(lines[0], r#"window "Title" [x=45 y=35 w=30 h=20]"#);
        assert_eq!(
            lines[1],
            "  rect#box.big [x=9 y=3.5 w=10 h=6] color=shade 1 (#40bfae)"
        );
    }
}
