//! Hyperspace starfield backdrop.
//!
//! Stars live in a centred 3D box and fly toward the viewer. Each frame a
//! translucent cream fill fades the previous frame instead of clearing it,
//! which leaves short trails; every star is drawn as a streak from its
//! slightly-farther projection to its current one, capped with a disc that
//! grows as it approaches.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::StarfieldConfig;
use crate::effect::{BackdropEffect, FrameInputs};
use crate::geometry::{Point, Viewport};
use crate::host::Listeners;
use crate::palette::{Rgba, STAR_COLORS, STAR_TRAIL_FADE};
use crate::surface::Surface;

/// Depth offset of the streak tail behind a star.
const TRAIL_DEPTH: f64 = 10.0;
const MAX_STAR_SIZE: f64 = 3.0;
const MIN_STAR_SIZE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    /// Horizontal offset from the viewport centre.
    pub x: f64,
    /// Vertical offset from the viewport centre.
    pub y: f64,
    /// Distance from the viewer, in `(0, depth]`.
    pub z: f64,
    pub color: Rgba,
}

pub struct HyperspaceField {
    config: StarfieldConfig,
    viewport: Viewport,
    stars: Vec<Star>,
    rng: SmallRng,
}

impl HyperspaceField {
    #[must_use]
    pub fn new(config: StarfieldConfig, seed: u64) -> Self {
        Self {
            config,
            viewport: Viewport::default(),
            stars: Vec::new(),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    #[must_use]
    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    #[must_use]
    pub fn config(&self) -> &StarfieldConfig {
        &self.config
    }

    fn lateral(&mut self) -> (f64, f64) {
        let Viewport { width, height } = self.viewport;
        (
            self.rng.random::<f64>() * width - width / 2.0,
            self.rng.random::<f64>() * height - height / 2.0,
        )
    }

    /// Replace every star for `viewport`.
    pub fn regenerate(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let count = self.config.star_count;
        let mut stars = Vec::with_capacity(count);
        for _ in 0..count {
            let (x, y) = self.lateral();
            let z = self.rng.random::<f64>() * self.config.depth;
            let color = STAR_COLORS[self.rng.random_range(0..STAR_COLORS.len())];
            stars.push(Star { x, y, z, color });
        }
        self.stars = stars;
        tracing::debug!(stars = self.stars.len(), "hyperspace stars regenerated");
    }

    /// Move every star toward the viewer; stars that pass the viewer
    /// respawn at the far plane. Returns how many respawned.
    pub fn advance(&mut self) -> usize {
        let mut respawned = 0;
        for i in 0..self.stars.len() {
            self.stars[i].z -= self.config.speed;
            if self.stars[i].z <= 0.0 {
                let (x, y) = self.lateral();
                let star = &mut self.stars[i];
                star.z = self.config.depth;
                star.x = x;
                star.y = y;
                respawned += 1;
            }
        }
        respawned
    }

    /// Screen position of a star at depth `z`.
    #[must_use]
    pub fn project(&self, star: &Star, z: f64) -> Point {
        let center = self.viewport.center();
        let scale = self.config.focal_length / z;
        Point::new(star.x * scale + center.x, star.y * scale + center.y)
    }

    /// Disc radius and streak width of a star: grows from 0.5 at the far
    /// plane to 3 at the viewer.
    #[must_use]
    pub fn star_size(&self, star: &Star) -> f64 {
        ((1.0 - star.z / self.config.depth) * MAX_STAR_SIZE).max(MIN_STAR_SIZE)
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        surface.fill(STAR_TRAIL_FADE);
        for star in &self.stars {
            let head = self.project(star, star.z);
            let tail = self.project(star, star.z + TRAIL_DEPTH);
            let size = self.star_size(star);
            surface.stroke_segment(tail, head, star.color, size);
            surface.fill_disc(head, size, star.color);
        }
    }
}

impl BackdropEffect for HyperspaceField {
    fn name(&self) -> &'static str {
        "hyperspace"
    }

    fn listeners(&self) -> Listeners {
        Listeners::RESIZE
    }

    fn resize(&mut self, viewport: Viewport) {
        self.regenerate(viewport);
    }

    fn frame(&mut self, _time_ms: f64, _inputs: &FrameInputs, surface: &mut dyn Surface) {
        self.advance();
        self.render(surface);
    }

    fn population(&self) -> usize {
        self.stars.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{DrawCommand, RecordingSurface};

    const VIEW: Viewport = Viewport::new(1000.0, 600.0);

    fn field() -> HyperspaceField {
        let mut field = HyperspaceField::new(StarfieldConfig::default(), 9);
        field.regenerate(VIEW);
        field
    }

    #[test]
    fn stars_start_inside_the_box() {
        let field = field();
        assert_eq!(field.stars().len(), 400);
        for star in field.stars() {
            assert!(star.x >= -500.0 && star.x < 500.0);
            assert!(star.y >= -300.0 && star.y < 300.0);
            assert!(star.z >= 0.0 && star.z < 1000.0);
            assert!(STAR_COLORS.contains(&star.color));
        }
    }

    #[test]
    fn depth_stays_positive_across_many_frames() {
        let mut field = field();
        let mut respawned = 0;
        for _ in 0..600 {
            respawned += field.advance();
            assert!(field.stars().iter().all(|s| s.z > 0.0 && s.z <= 1000.0));
        }
        assert!(respawned > 0);
    }

    #[test]
    fn frame_fades_then_draws_streak_and_disc_per_star() {
        let mut field = HyperspaceField::new(
            StarfieldConfig {
                star_count: 3,
                ..StarfieldConfig::default()
            },
            1,
        );
        field.regenerate(VIEW);
        let mut surface = RecordingSurface::new(VIEW);
        field.frame(0.0, &FrameInputs::default(), &mut surface);
        let commands = surface.take_commands();
        assert_eq!(commands.len(), 1 + 3 * 2);
        assert_eq!(commands[0], DrawCommand::Fill(STAR_TRAIL_FADE));
        assert!(matches!(commands[1], DrawCommand::StrokeSegment { .. }));
        assert!(matches!(commands[2], DrawCommand::FillDisc { .. }));
    }

    #[test]
    fn size_grows_toward_viewer() {
        let field = field();
        let far = Star {
            x: 0.0,
            y: 0.0,
            z: 1000.0,
            color: STAR_COLORS[0],
        };
        let near = Star { z: 1.0, ..far };
        assert_eq!(field.star_size(&far), MIN_STAR_SIZE);
        assert!(field.star_size(&near) > 2.9);
    }

    #[test]
    fn centred_star_projects_to_centre() {
        let field = field();
        let star = Star {
            x: 0.0,
            y: 0.0,
            z: 500.0,
            color: STAR_COLORS[1],
        };
        assert_eq!(field.project(&star, star.z), VIEW.center());
    }

    #[test]
    fn only_resize_listener() {
        assert_eq!(field().listeners(), Listeners::RESIZE);
    }
}
