//! Pixel-space primitives shared by the effects and the surfaces.

/// A point in CSS pixels, origin at the top-left of the viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Size of the drawing surface in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Cubic bezier from `start` to `end` through two control points.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CubicBezier {
    pub start: Point,
    pub c1: Point,
    pub c2: Point,
    pub end: Point,
}
