//! Geometric primitives for resolved scene elements.
//!
//! This module provides the geometry types carried by every node of a
//! compiled scene. All values are fully resolved: explicit attributes,
//! stylesheet declarations and built-in defaults have already been applied by
//! the time a [`Geometry`] value exists.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in window space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A rectangle defined by its top-left origin and size
//! - [`Geometry`] - The shape-specific geometry of a scene node
//!
//! # Coordinate System
//!
//! Gem uses screen coordinates:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! Bounds are stored as origin plus size so that explicitly written values
//! are reproduced exactly.

/// A 2D point in window coordinate space.
///
/// # Examples
///
/// ```
/// # use gem_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(4.0, 6.0);
///
/// let mid = p1.midpoint(p2);
/// assert_eq!(mid.x(), 7.0);
/// assert_eq!(mid.y(), 13.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Calculates the midpoint between this point and another point
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Euclidean distance to another point
    pub fn distance(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Width and height of an element
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns true if either dimension is zero
    pub fn is_zero(self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }
}

/// An axis-aligned rectangle anchored at its top-left corner.
///
/// # Examples
///
/// ```
/// # use gem_core::geometry::{Bounds, Point, Size};
/// let bounds = Bounds::new(Point::new(9.0, 3.5), Size::new(10.0, 6.0));
///
/// assert_eq!(bounds.x(), 9.0);
/// assert_eq!(bounds.max_x(), 19.0);
/// assert_eq!(bounds.center(), Point::new(14.0, 6.5));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    origin: Point,
    size: Size,
}

impl Bounds {
    pub fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Top-left corner
    pub fn origin(self) -> Point {
        self.origin
    }

    pub fn size(self) -> Size {
        self.size
    }

    pub fn x(self) -> f32 {
        self.origin.x
    }

    pub fn y(self) -> f32 {
        self.origin.y
    }

    pub fn width(self) -> f32 {
        self.size.width
    }

    pub fn height(self) -> f32 {
        self.size.height
    }

    /// Right edge
    pub fn max_x(self) -> f32 {
        self.origin.x + self.size.width
    }

    /// Bottom edge
    pub fn max_y(self) -> f32 {
        self.origin.y + self.size.height
    }

    pub fn center(self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    /// Returns true if the point lies inside or on the edge of the bounds
    pub fn contains(self, point: Point) -> bool {
        point.x >= self.x() && point.x <= self.max_x() && point.y >= self.y() && point.y <= self.max_y()
    }
}

/// Shape-specific resolved geometry of a scene element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    /// Elements without own geometry (`text`, `div`)
    None,
    /// `window` and `rect`
    Bounds(Bounds),
    /// `circle`
    Circle { center: Point, radius: f32 },
    /// `line`
    Line { start: Point, end: Point },
}

impl Geometry {
    /// Returns the bounds if this geometry is rectangular
    pub fn as_bounds(&self) -> Option<Bounds> {
        match self {
            Geometry::Bounds(bounds) => Some(*bounds),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Geometry::None)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_point_midpoint_and_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.midpoint(b), Point::new(1.5, 2.0));
        assert_approx_eq!(f32, a.distance(b), 5.0);
    }

    #[test]
    fn test_bounds_accessors() {
        let bounds = Bounds::new(Point::new(45.0, 35.0), Size::new(30.0, 20.0));
        assert_approx_eq!(f32, bounds.x(), 45.0);
        assert_approx_eq!(f32, bounds.y(), 35.0);
        assert_approx_eq!(f32, bounds.width(), 30.0);
        assert_approx_eq!(f32, bounds.height(), 20.0);
        assert_approx_eq!(f32, bounds.max_x(), 75.0);
        assert_approx_eq!(f32, bounds.max_y(), 55.0);
        assert_eq!(bounds.center(), Point::new(60.0, 45.0));
    }

    #[test]
    fn test_bounds_contains() {
        let bounds = Bounds::new(Point::new(0.0, 0.0), Size::new(10.0, 5.0));
        assert!(bounds.contains(Point::new(10.0, 5.0)));
        assert!(bounds.contains(Point::new(3.0, 2.0)));
        assert!(!bounds.contains(Point::new(11.0, 2.0)));
    }

    #[test]
    fn test_geometry_as_bounds() {
        let bounds = Bounds::new(Point::default(), Size::new(1.0, 1.0));
        assert_eq!(Geometry::Bounds(bounds).as_bounds(), Some(bounds));
        assert_eq!(
            Geometry::Circle {
                center: Point::default(),
                radius: 4.0
            }
            .as_bounds(),
            None
        );
        assert!(Geometry::None.is_none());
        assert!(Size::new(0.0, 3.0).is_zero());
    }
}
