//! Pointer and scroll state owned by one mounted backdrop.
//!
//! Event callbacks write these between frames; the frame callback only
//! reads them. Each mount owns its own pair, so two backdrops on one page
//! never share state.

use crate::geometry::Point;

/// Last pointer position and its velocity in pixels per millisecond.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerTracker {
    position: Point,
    vx: f64,
    vy: f64,
    last_time_ms: f64,
}

impl PointerTracker {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            position: Point::new(0.0, 0.0),
            vx: 0.0,
            vy: 0.0,
            last_time_ms: 0.0,
        }
    }

    /// Record a move to `(x, y)` at `time_ms`.
    ///
    /// Velocity is the displacement since the previous sample divided by the
    /// elapsed time. A sample with no elapsed time (or time running
    /// backwards) keeps the previous velocity.
    pub fn on_move(&mut self, x: f64, y: f64, time_ms: f64) {
        let dt = time_ms - self.last_time_ms;
        if dt > 0.0 {
            self.vx = (x - self.position.x) / dt;
            self.vy = (y - self.position.y) / dt;
        }
        self.position = Point::new(x, y);
        self.last_time_ms = time_ms;
    }

    /// The pointer left the document: it is no longer moving.
    pub fn on_leave(&mut self) {
        self.vx = 0.0;
        self.vy = 0.0;
    }

    #[must_use]
    pub const fn position(&self) -> Point {
        self.position
    }

    #[must_use]
    pub const fn velocity(&self) -> (f64, f64) {
        (self.vx, self.vy)
    }

    /// Magnitude of the velocity vector.
    #[must_use]
    pub fn speed(&self) -> f64 {
        self.vx.hypot(self.vy)
    }
}

/// Vertical page scroll offset in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollTracker {
    offset: f64,
}

impl ScrollTracker {
    #[must_use]
    pub const fn new() -> Self {
        Self { offset: 0.0 }
    }

    pub fn on_scroll(&mut self, offset: f64) {
        self.offset = offset;
    }

    #[must_use]
    pub const fn offset(&self) -> f64 {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_move_measures_from_origin() {
        let mut pointer = PointerTracker::new();
        pointer.on_move(100.0, 50.0, 10.0);
        assert_eq!(pointer.position(), Point::new(100.0, 50.0));
        assert_eq!(pointer.velocity(), (10.0, 5.0));
    }

    #[test]
    fn velocity_uses_elapsed_time() {
        let mut pointer = PointerTracker::new();
        pointer.on_move(0.0, 0.0, 100.0);
        pointer.on_move(30.0, 40.0, 110.0);
        assert_eq!(pointer.velocity(), (3.0, 4.0));
        assert_eq!(pointer.speed(), 5.0);
    }

    #[test]
    fn zero_dt_keeps_previous_velocity() {
        let mut pointer = PointerTracker::new();
        pointer.on_move(0.0, 0.0, 100.0);
        pointer.on_move(10.0, 0.0, 110.0);
        pointer.on_move(500.0, 500.0, 110.0);
        assert_eq!(pointer.velocity(), (1.0, 0.0));
        assert_eq!(pointer.position(), Point::new(500.0, 500.0));
    }

    #[test]
    fn leave_zeroes_velocity_but_keeps_position() {
        let mut pointer = PointerTracker::new();
        pointer.on_move(10.0, 10.0, 1.0);
        pointer.on_leave();
        assert_eq!(pointer.velocity(), (0.0, 0.0));
        assert_eq!(pointer.position(), Point::new(10.0, 10.0));
    }

    #[test]
    fn scroll_tracks_latest_offset() {
        let mut scroll = ScrollTracker::new();
        scroll.on_scroll(120.0);
        scroll.on_scroll(80.0);
        assert_eq!(scroll.offset(), 80.0);
    }
}
