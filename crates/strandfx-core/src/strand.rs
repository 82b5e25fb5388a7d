//! A single drifting, oscillating, pulsing line.
//!
//! # Invariants
//!
//! 1. `band` and `original_y` are fixed at spawn; nothing writes them again.
//! 2. `y` is recomputed from `original_y` every frame, never accumulated.
//! 3. After [`Strand::advance`], `x` lies in `[-2L, W + 2L]` where `L` is the
//!    strand length and `W` the viewport width; a strand that crossed either
//!    bound re-enters at the opposite side one length off-screen.
//! 4. `bend_offset` only changes when the pointer is within the bend radius.
//!    It does not relax back when the pointer moves away.

use std::f64::consts::{PI, TAU};

use rand::Rng;

use crate::config::Band;
use crate::geometry::{CubicBezier, Point, Viewport};

/// Half-width of the drift direction band (±27° around horizontal).
pub const MAX_DRIFT_ANGLE: f64 = PI * 0.15;

/// Lowest pulse multiplier on base opacity.
pub const PULSE_FLOOR: f64 = 0.7;

/// Frame-local inputs for [`Strand::advance`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct StepInputs {
    pub viewport: Viewport,
    /// Scroll offset, present only when parallax is enabled.
    pub scroll: Option<f64>,
    /// Pointer bend parameters, present only when interaction is enabled.
    pub bend: Option<BendInputs>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct BendInputs {
    pub pointer: Point,
    pub pointer_speed: f64,
    /// Proximity radius in pixels.
    pub radius: f64,
    /// Signed deflection scale (bend strength times its unit).
    pub strength: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Strand {
    x: f64,
    y: f64,
    original_y: f64,
    length: f64,
    width: f64,
    speed: f64,
    angle: f64,
    opacity: f64,
    band: Band,
    bend_offset: f64,
    phase: f64,
    amplitude: f64,
    frequency: f64,
    pulse_phase: f64,
    pulse_speed: f64,
}

fn unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.random::<f64>()
}

impl Strand {
    /// Create a strand in `band`: y uniform within the band's stripe, x
    /// uniform across the width, every other parameter uniform in its range.
    pub fn spawn<R: Rng + ?Sized>(
        band: Band,
        viewport: Viewport,
        animation_speed: f64,
        rng: &mut R,
    ) -> Self {
        let (top, bottom) = band.stripe(viewport.height);
        let y = top + unit(rng) * (bottom - top);
        Self {
            x: unit(rng) * viewport.width,
            y,
            original_y: y,
            length: 100.0 + unit(rng) * 150.0,
            speed: (0.2 + unit(rng) * 0.4) * animation_speed,
            angle: unit(rng) * 2.0 * MAX_DRIFT_ANGLE - MAX_DRIFT_ANGLE,
            opacity: 0.06 + unit(rng) * 0.08,
            width: 0.8 + unit(rng) * 2.0,
            band,
            bend_offset: unit(rng) * TAU,
            phase: unit(rng) * TAU,
            amplitude: 3.0 + unit(rng) * 4.0,
            frequency: 0.001 + unit(rng) * 0.002,
            pulse_phase: unit(rng) * TAU,
            pulse_speed: 0.001 + unit(rng) * 0.002,
        }
    }

    /// Vertical displacement from `original_y` at `time_ms`: three
    /// sinusoids at 1x, 1.7x and 0.5x the strand frequency weighted
    /// 100%, 30% and 20% of the amplitude.
    #[must_use]
    pub fn oscillation(&self, time_ms: f64) -> f64 {
        let tf = time_ms * self.frequency;
        let a = self.amplitude;
        (tf + self.phase).sin() * a
            + (tf * 1.7 + self.phase * 1.3).cos() * (a * 0.3)
            + (tf * 0.5 + self.phase * 0.7).sin() * (a * 0.2)
    }

    /// Opacity multiplier in `[0.7, 1.0]` at `time_ms`.
    #[must_use]
    pub fn pulse_factor(&self, time_ms: f64) -> f64 {
        let pulse = ((time_ms * self.pulse_speed + self.pulse_phase).sin() + 1.0) * 0.5;
        PULSE_FLOOR + pulse * (1.0 - PULSE_FLOOR)
    }

    /// Base opacity modulated by the pulse.
    #[must_use]
    pub fn current_opacity(&self, time_ms: f64) -> f64 {
        self.opacity * self.pulse_factor(time_ms)
    }

    /// Horizontal displacement for one frame. A slow global sinusoid
    /// breathes the nominal speed by ±30%.
    #[must_use]
    pub fn drift(&self, time_ms: f64) -> f64 {
        self.angle.cos() * self.speed * (1.0 + (time_ms * 0.0005).sin() * 0.3)
    }

    /// Run one frame of motion. Returns `true` when the strand wrapped.
    pub(crate) fn advance<R: Rng + ?Sized>(
        &mut self,
        time_ms: f64,
        inputs: &StepInputs,
        rng: &mut R,
    ) -> bool {
        self.y = self.original_y + self.oscillation(time_ms);
        self.x += self.drift(time_ms);

        if let Some(scroll) = inputs.scroll {
            self.y += scroll * self.band.parallax_factor();
        }

        if let Some(bend) = inputs.bend {
            let dx = bend.pointer.x - self.x;
            let dy = bend.pointer.y - self.y;
            let dist = self.position().distance(bend.pointer);
            if dist < bend.radius {
                let force = (1.0 - dist / bend.radius) * bend.strength;
                self.bend_offset = dy.atan2(dx) + force + bend.pointer_speed * 0.1;
            }
        }

        let width = inputs.viewport.width;
        let mut wrapped = false;
        if self.x < -self.length * 2.0 {
            self.x = width + self.length;
            wrapped = true;
        }
        if self.x > width + self.length * 2.0 {
            self.x = -self.length;
            wrapped = true;
        }
        if wrapped {
            self.y = unit(rng) * inputs.viewport.height;
        }
        wrapped
    }

    /// Curve drawn for this strand at `time_ms`, from its current position
    /// along the drift direction. Two slow sinusoids of `bend_offset`
    /// displace the control points and the endpoint vertically.
    #[must_use]
    pub fn curve(&self, time_ms: f64) -> CubicBezier {
        let bend1 = (time_ms * 0.003 + self.bend_offset).sin() * 40.0;
        let bend2 = (time_ms * 0.002 + self.bend_offset * 1.5).cos() * 20.0;
        let (sin, cos) = self.angle.sin_cos();
        let along = |frac: f64, lift: f64| {
            Point::new(
                self.x + cos * self.length * frac,
                self.y + sin * self.length * frac + lift,
            )
        };
        CubicBezier {
            start: Point::new(self.x, self.y),
            c1: along(0.33, bend1 * 0.3),
            c2: along(0.66, bend1),
            end: along(1.0, bend2),
        }
    }

    #[must_use]
    pub const fn band(&self) -> Band {
        self.band
    }

    #[must_use]
    pub const fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[must_use]
    pub const fn original_y(&self) -> f64 {
        self.original_y
    }

    #[must_use]
    pub const fn length(&self) -> f64 {
        self.length
    }

    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub const fn opacity(&self) -> f64 {
        self.opacity
    }

    #[must_use]
    pub const fn bend_offset(&self) -> f64 {
        self.bend_offset
    }

    /// Place the strand at `x` (harness and test hook).
    pub fn set_x(&mut self, x: f64) {
        self.x = x;
    }
}
