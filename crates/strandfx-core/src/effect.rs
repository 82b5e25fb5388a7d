//! The contract between a mount and the animation it drives.

use crate::geometry::Viewport;
use crate::host::Listeners;
use crate::surface::Surface;
use crate::tracking::PointerTracker;

/// Tracked inputs sampled at the start of a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInputs {
    pub pointer: PointerTracker,
    pub scroll_offset: f64,
}

/// A full-viewport animated backdrop.
///
/// Implementations own their element population and regenerate it
/// wholesale in [`resize`](Self::resize). [`frame`](Self::frame) advances
/// and draws one display refresh; it is never called re-entrantly.
pub trait BackdropEffect {
    /// Short stable identifier for logs.
    fn name(&self) -> &'static str;

    /// Listeners this effect needs while mounted.
    fn listeners(&self) -> Listeners;

    /// Throw away the current population and build a new one for `viewport`.
    fn resize(&mut self, viewport: Viewport);

    /// Advance to `time_ms` and draw onto `surface`.
    fn frame(&mut self, time_ms: f64, inputs: &FrameInputs, surface: &mut dyn Surface);

    /// Number of live elements (strands, stars).
    fn population(&self) -> usize;
}

impl<E: BackdropEffect + ?Sized> BackdropEffect for Box<E> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn listeners(&self) -> Listeners {
        (**self).listeners()
    }

    fn resize(&mut self, viewport: Viewport) {
        (**self).resize(viewport);
    }

    fn frame(&mut self, time_ms: f64, inputs: &FrameInputs, surface: &mut dyn Surface) {
        (**self).frame(time_ms, inputs, surface);
    }

    fn population(&self) -> usize {
        (**self).population()
    }
}
