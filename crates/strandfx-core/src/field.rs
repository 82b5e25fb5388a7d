//! Floating-lines backdrop: bands of curved strands that drift across the
//! viewport, breathe vertically, pulse in opacity, lean toward the pointer
//! and shift with page scroll.
//!
//! # Frame pipeline
//!
//! 1. Clear, then paint a faint radial slate wash centred on the viewport.
//! 2. For each strand: oscillate `y`, pulse opacity, drift `x`, apply scroll
//!    parallax, apply pointer bend, wrap at the edges.
//! 3. Stroke each strand as a cubic curve with a five-stop band gradient,
//!    round caps and a 15px glow in the band's primary hue.

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::{BEND_STRENGTH_UNIT, Band, FieldConfig};
use crate::effect::{BackdropEffect, FrameInputs};
use crate::geometry::Viewport;
use crate::host::Listeners;
use crate::palette::{LinearGradient, RadialGradient, backdrop_stops, band_stops, glow_color};
use crate::strand::{BendInputs, StepInputs, Strand};
use crate::surface::{CurveStroke, Glow, Surface};

/// Glow blur radius in pixels.
pub const GLOW_BLUR: f64 = 15.0;

pub struct FloatingLinesField {
    config: FieldConfig,
    viewport: Viewport,
    strands: Vec<Strand>,
    rng: SmallRng,
    /// Incremented on every regeneration.
    epoch: u64,
}

impl FloatingLinesField {
    /// Build an empty field. Strands appear on the first
    /// [`BackdropEffect::resize`] or [`regenerate`](Self::regenerate).
    #[must_use]
    pub fn new(config: FieldConfig, seed: u64) -> Self {
        Self {
            config,
            viewport: Viewport::default(),
            strands: Vec::new(),
            rng: SmallRng::seed_from_u64(seed),
            epoch: 0,
        }
    }

    #[must_use]
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    #[must_use]
    pub fn strands(&self) -> &[Strand] {
        &self.strands
    }

    /// Mutable access for harness scripting (placing strands at edges).
    pub fn strands_mut(&mut self) -> &mut [Strand] {
        &mut self.strands
    }

    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Number of regenerations so far.
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Strand count per band, indexed top/middle/bottom.
    #[must_use]
    pub fn band_counts(&self) -> [usize; 3] {
        let mut counts = [0; 3];
        for strand in &self.strands {
            counts[strand.band().index()] += 1;
        }
        counts
    }

    /// Replace the whole population for `viewport`.
    pub fn regenerate(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let bands = self.config.bands();
        let mut strands = Vec::with_capacity(self.config.total_lines());
        for band in bands {
            for _ in 0..self.config.lines_for(band) {
                strands.push(Strand::spawn(
                    band,
                    viewport,
                    self.config.animation_speed,
                    &mut self.rng,
                ));
            }
        }
        self.strands = strands;
        self.epoch += 1;
        tracing::debug!(
            epoch = self.epoch,
            strands = self.strands.len(),
            width = viewport.width,
            height = viewport.height,
            "floating lines regenerated"
        );
    }

    /// Motion step for every strand. Returns how many wrapped.
    pub fn advance(&mut self, time_ms: f64, inputs: &FrameInputs) -> usize {
        let step = StepInputs {
            viewport: self.viewport,
            scroll: self.config.parallax.then_some(inputs.scroll_offset),
            bend: self.config.interactive.then(|| BendInputs {
                pointer: inputs.pointer.position(),
                pointer_speed: inputs.pointer.speed(),
                radius: self.config.bend_radius_px(),
                strength: self.config.bend_strength * BEND_STRENGTH_UNIT,
            }),
        };
        let mut wrapped = 0;
        for strand in &mut self.strands {
            if strand.advance(time_ms, &step, &mut self.rng) {
                wrapped += 1;
            }
        }
        wrapped
    }

    /// Draw the backdrop wash and every strand at `time_ms`.
    pub fn render(&self, time_ms: f64, surface: &mut dyn Surface) {
        let viewport = self.viewport;
        surface.clear();
        surface.fill_radial(&RadialGradient {
            center: viewport.center(),
            radius: viewport.width.max(viewport.height) / 2.0,
            stops: backdrop_stops(),
        });

        for strand in &self.strands {
            surface.stroke_curve(&stroke_for(strand, time_ms));
        }
    }
}

/// Gradient stroke for `strand` as drawn at `time_ms`.
#[must_use]
pub fn stroke_for(strand: &Strand, time_ms: f64) -> CurveStroke {
    let curve = strand.curve(time_ms);
    let band: Band = strand.band();
    CurveStroke {
        gradient: LinearGradient {
            from: curve.start,
            to: curve.end,
            stops: band_stops(band, strand.current_opacity(time_ms)).to_vec(),
        },
        curve,
        width: strand.width(),
        glow: Glow {
            blur: GLOW_BLUR,
            color: glow_color(band),
        },
    }
}

impl BackdropEffect for FloatingLinesField {
    fn name(&self) -> &'static str {
        "floating-lines"
    }

    fn listeners(&self) -> Listeners {
        self.config.listeners()
    }

    fn resize(&mut self, viewport: Viewport) {
        self.regenerate(viewport);
    }

    fn frame(&mut self, time_ms: f64, inputs: &FrameInputs, surface: &mut dyn Surface) {
        self.advance(time_ms, inputs);
        self.render(time_ms, surface);
    }

    fn population(&self) -> usize {
        self.strands.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{DrawCommand, RecordingSurface};
    use crate::tracking::PointerTracker;
    use pretty_assertions::assert_eq;

    const VIEW: Viewport = Viewport::new(1280.0, 720.0);

    fn field(config: FieldConfig) -> FloatingLinesField {
        let mut field = FloatingLinesField::new(config, 42);
        field.regenerate(VIEW);
        field
    }

    #[test]
    fn new_field_is_empty_until_resized() {
        let field = FloatingLinesField::new(FieldConfig::default(), 1);
        assert!(field.strands().is_empty());
        assert_eq!(field.epoch(), 0);
    }

    #[test]
    fn default_population_per_band() {
        let field = field(FieldConfig::default());
        assert_eq!(field.band_counts(), [12, 18, 24]);
        assert_eq!(field.population(), 54);
    }

    #[test]
    fn regeneration_replaces_population() {
        let mut field = field(FieldConfig::default());
        let before: Vec<f64> = field.strands().iter().map(Strand::original_y).collect();
        field.regenerate(Viewport::new(800.0, 600.0));
        let after: Vec<f64> = field.strands().iter().map(Strand::original_y).collect();
        assert_eq!(field.epoch(), 2);
        assert_eq!(before.len(), after.len());
        assert_ne!(before, after);
        assert!(after.iter().all(|y| *y < 600.0));
    }

    #[test]
    fn same_seed_same_population() {
        let a = field(FieldConfig::default());
        let b = field(FieldConfig::default());
        assert_eq!(a.strands(), b.strands());
    }

    #[test]
    fn render_draws_backdrop_then_one_stroke_per_strand() {
        let mut field = field(FieldConfig {
            line_count: crate::config::PerBand::Uniform(2),
            ..FieldConfig::default()
        });
        let mut surface = RecordingSurface::new(VIEW);
        field.frame(16.0, &FrameInputs::default(), &mut surface);

        let commands = surface.take_commands();
        assert_eq!(commands.len(), 2 + 6);
        assert_eq!(commands[0], DrawCommand::Clear);
        match &commands[1] {
            DrawCommand::FillRadial(gradient) => {
                assert_eq!(gradient.center, VIEW.center());
                assert_eq!(gradient.radius, 640.0);
            }
            other => panic!("expected radial backdrop, got {other:?}"),
        }
        for (command, strand) in commands[2..].iter().zip(field.strands()) {
            match command {
                DrawCommand::StrokeCurve(stroke) => {
                    assert_eq!(stroke.glow.blur, GLOW_BLUR);
                    assert_eq!(stroke.glow.color, glow_color(strand.band()));
                    assert_eq!(stroke.gradient.stops.len(), 5);
                    assert_eq!(stroke.width, strand.width());
                }
                other => panic!("expected strand stroke, got {other:?}"),
            }
        }
    }

    #[test]
    fn interactive_off_ignores_pointer() {
        let mut field = field(FieldConfig {
            interactive: false,
            ..FieldConfig::default()
        });
        let before: Vec<f64> = field.strands().iter().map(Strand::bend_offset).collect();
        let mut pointer = PointerTracker::new();
        pointer.on_move(640.0, 360.0, 10.0);
        let inputs = FrameInputs {
            pointer,
            scroll_offset: 0.0,
        };
        for frame in 0..30 {
            field.advance(frame as f64 * 16.0, &inputs);
        }
        let after: Vec<f64> = field.strands().iter().map(Strand::bend_offset).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn interactive_on_bends_nearby_strands() {
        let mut field = field(FieldConfig::default());
        let before: Vec<f64> = field.strands().iter().map(Strand::bend_offset).collect();
        let mut pointer = PointerTracker::new();
        pointer.on_move(640.0, 360.0, 10.0);
        field.advance(
            16.0,
            &FrameInputs {
                pointer,
                scroll_offset: 0.0,
            },
        );
        let after: Vec<f64> = field.strands().iter().map(Strand::bend_offset).collect();
        assert_ne!(before, after);
    }
}
