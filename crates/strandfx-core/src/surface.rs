//! Drawing sink abstraction.
//!
//! Effects never talk to a platform canvas directly. They describe each
//! draw as data and hand it to a [`Surface`]. Individual draw calls cannot
//! fail at this level: a surface that hits a platform error drops that one
//! draw and keeps going.

use crate::geometry::{CubicBezier, Point, Viewport};
use crate::palette::{LinearGradient, RadialGradient, Rgb, Rgba};

/// Soft outer glow applied to a stroke. Surfaces reset it after the stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub blur: f64,
    pub color: Rgb,
}

/// One gradient-stroked cubic curve with round caps.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveStroke {
    pub curve: CubicBezier,
    pub gradient: LinearGradient,
    pub width: f64,
    pub glow: Glow,
}

pub trait Surface {
    /// Current pixel size.
    fn size(&self) -> Viewport;

    /// Resize the backing store to `viewport`.
    fn set_size(&mut self, viewport: Viewport);

    /// Erase every pixel to transparent.
    fn clear(&mut self);

    /// Fill the whole surface with a solid (possibly translucent) color.
    fn fill(&mut self, color: Rgba);

    /// Fill the whole surface with a radial gradient.
    fn fill_radial(&mut self, gradient: &RadialGradient);

    /// Stroke a gradient curve, then reset any glow state.
    fn stroke_curve(&mut self, stroke: &CurveStroke);

    /// Stroke a straight segment in a solid color.
    fn stroke_segment(&mut self, from: Point, to: Point, color: Rgba, width: f64);

    /// Fill a disc.
    fn fill_disc(&mut self, center: Point, radius: f64, color: Rgba);
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn size(&self) -> Viewport {
        (**self).size()
    }

    fn set_size(&mut self, viewport: Viewport) {
        (**self).set_size(viewport);
    }

    fn clear(&mut self) {
        (**self).clear();
    }

    fn fill(&mut self, color: Rgba) {
        (**self).fill(color);
    }

    fn fill_radial(&mut self, gradient: &RadialGradient) {
        (**self).fill_radial(gradient);
    }

    fn stroke_curve(&mut self, stroke: &CurveStroke) {
        (**self).stroke_curve(stroke);
    }

    fn stroke_segment(&mut self, from: Point, to: Point, color: Rgba, width: f64) {
        (**self).stroke_segment(from, to, color, width);
    }

    fn fill_disc(&mut self, center: Point, radius: f64, color: Rgba) {
        (**self).fill_disc(center, radius, color);
    }
}
