//! Colors and gradient descriptions.
//!
//! Gradients are plain data here; each [`Surface`](crate::surface::Surface)
//! turns them into whatever its platform needs (a `CanvasGradient` on the
//! web, a recorded command in tests).

use std::fmt;

use crate::config::Band;
use crate::geometry::Point;

/// Opaque 8-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[must_use]
    pub const fn with_alpha(self, a: f64) -> Rgba {
        Rgba { rgb: self, a }
    }

    /// CSS `rgb(r, g, b)` form.
    #[must_use]
    pub fn css(self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Color with a floating-point alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub a: f64,
}

impl Rgba {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self {
            rgb: Rgb::new(r, g, b),
            a,
        }
    }

    /// CSS `rgba(r, g, b, a)` form.
    #[must_use]
    pub fn css(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Rgb { r, g, b } = self.rgb;
        write!(f, "rgba({r}, {g}, {b}, {})", self.a)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Rgba,
}

/// Linear gradient between two points.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub from: Point,
    pub to: Point,
    pub stops: Vec<ColorStop>,
}

/// Radial gradient from a zero-radius center out to `radius`.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub center: Point,
    pub radius: f64,
    pub stops: Vec<ColorStop>,
}

const NAVY: Rgb = Rgb::new(30, 64, 175);
const BLUE: Rgb = Rgb::new(59, 130, 246);
const GREEN: Rgb = Rgb::new(34, 197, 94);
const LIGHT_GREEN: Rgb = Rgb::new(74, 222, 128);
const DEEP_NAVY: Rgb = Rgb::new(20, 30, 70);
const MUTED_GREEN: Rgb = Rgb::new(100, 180, 100);
const SLATE: Rgb = Rgb::new(15, 23, 42);

/// Offset, color and alpha weight of one palette stop. The weight is
/// multiplied by the strand's current opacity.
type StopSpec = (f64, Rgb, f64);

const TOP_STOPS: [StopSpec; 5] = [
    (0.0, NAVY, 0.0),
    (0.3, NAVY, 0.7),
    (0.5, BLUE, 1.0),
    (0.7, GREEN, 0.6),
    (1.0, GREEN, 0.0),
];

const MIDDLE_STOPS: [StopSpec; 5] = [
    (0.0, GREEN, 0.0),
    (0.3, GREEN, 0.8),
    (0.5, LIGHT_GREEN, 1.0),
    (0.7, NAVY, 0.7),
    (1.0, NAVY, 0.0),
];

const BOTTOM_STOPS: [StopSpec; 5] = [
    (0.0, DEEP_NAVY, 0.0),
    (0.4, DEEP_NAVY, 0.8),
    (0.6, NAVY, 0.6),
    (0.8, MUTED_GREEN, 0.4),
    (1.0, MUTED_GREEN, 0.0),
];

/// Five gradient stops for a strand of `band` at `opacity`. Both ends are
/// transparent.
#[must_use]
pub fn band_stops(band: Band, opacity: f64) -> [ColorStop; 5] {
    let spec = match band {
        Band::Top => &TOP_STOPS,
        Band::Middle => &MIDDLE_STOPS,
        Band::Bottom => &BOTTOM_STOPS,
    };
    spec.map(|(offset, rgb, weight)| ColorStop {
        offset,
        color: rgb.with_alpha(opacity * weight),
    })
}

/// Glow (shadow) color of a band: its primary hue.
#[must_use]
pub const fn glow_color(band: Band) -> Rgb {
    match band {
        Band::Top => NAVY,
        Band::Middle => GREEN,
        Band::Bottom => DEEP_NAVY,
    }
}

/// Faint slate wash painted behind the strands each frame.
#[must_use]
pub fn backdrop_stops() -> Vec<ColorStop> {
    vec![
        ColorStop {
            offset: 0.0,
            color: SLATE.with_alpha(0.1),
        },
        ColorStop {
            offset: 1.0,
            color: SLATE.with_alpha(0.05),
        },
    ]
}

/// Star colors of the hyperspace field.
pub const STAR_COLORS: [Rgba; 5] = [
    Rgba::new(55, 90, 180, 0.8),
    Rgba::new(100, 149, 237, 0.7),
    Rgba::new(144, 238, 144, 0.6),
    Rgba::new(200, 220, 255, 0.9),
    Rgba::new(70, 130, 180, 0.8),
];

/// Cream fill that leaves fading trails behind moving stars.
pub const STAR_TRAIL_FADE: Rgba = Rgba::new(247, 245, 240, 0.15);
