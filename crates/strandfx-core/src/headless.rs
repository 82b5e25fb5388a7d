//! Deterministic, in-memory host and surface.
//!
//! [`HeadlessHost`] stands in for `window`: it remembers which listeners are
//! attached, hands out frame handles, and lets the driver decide when a
//! requested frame fires and with what timestamp. [`RecordingSurface`]
//! stores draw calls as [`DrawCommand`] values instead of rasterizing.
//! The harness CLI and the test suites drive effects through these.

use crate::geometry::{Point, Viewport};
use crate::host::{FrameHandle, Host, Listeners};
use crate::palette::{RadialGradient, Rgba};
use crate::surface::{CurveStroke, Surface};

/// Host-controlled stand-in for a browser window.
#[derive(Debug, Clone)]
pub struct HeadlessHost {
    viewport: Viewport,
    attached: Listeners,
    pending: Option<FrameHandle>,
    next_handle: i32,
    /// Every attach/detach/request/cancel, in call order.
    journal: Vec<HostCall>,
}

/// One call made by a mount into the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCall {
    Attach(Listeners),
    Detach(Listeners),
    RequestFrame(FrameHandle),
    CancelFrame(FrameHandle),
}

impl HeadlessHost {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            attached: Listeners::empty(),
            pending: None,
            next_handle: 1,
            journal: Vec::new(),
        }
    }

    /// Change the reported viewport. The driver must still deliver a
    /// `HostEvent::Resize` for the mount to notice.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Listeners currently attached.
    #[must_use]
    pub const fn attached(&self) -> Listeners {
        self.attached
    }

    /// The outstanding frame request, if any.
    #[must_use]
    pub const fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Consume the outstanding frame request, as the browser does right
    /// before invoking the callback.
    pub fn take_frame(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    #[must_use]
    pub fn journal(&self) -> &[HostCall] {
        &self.journal
    }
}

impl Host for HeadlessHost {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn attach(&mut self, listener: Listeners) {
        self.attached |= listener;
        self.journal.push(HostCall::Attach(listener));
    }

    fn detach(&mut self, listener: Listeners) {
        self.attached -= listener;
        self.journal.push(HostCall::Detach(listener));
    }

    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        self.pending = Some(handle);
        self.journal.push(HostCall::RequestFrame(handle));
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
        self.journal.push(HostCall::CancelFrame(handle));
    }
}

/// A recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Resize(Viewport),
    Clear,
    Fill(Rgba),
    FillRadial(RadialGradient),
    StrokeCurve(CurveStroke),
    StrokeSegment {
        from: Point,
        to: Point,
        color: Rgba,
        width: f64,
    },
    FillDisc {
        center: Point,
        radius: f64,
        color: Rgba,
    },
}

/// Surface that records draw calls.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    size: Viewport,
    commands: Vec<DrawCommand>,
    /// Total draw calls since creation; not reset by `take_commands`.
    draw_calls: u64,
}

impl RecordingSurface {
    #[must_use]
    pub fn new(size: Viewport) -> Self {
        Self {
            size,
            commands: Vec::new(),
            draw_calls: 0,
        }
    }

    /// Drain recorded commands.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    #[must_use]
    pub const fn draw_calls(&self) -> u64 {
        self.draw_calls
    }

    fn record(&mut self, command: DrawCommand) {
        if !matches!(command, DrawCommand::Resize(_)) {
            self.draw_calls += 1;
        }
        self.commands.push(command);
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Viewport {
        self.size
    }

    fn set_size(&mut self, viewport: Viewport) {
        self.size = viewport;
        self.record(DrawCommand::Resize(viewport));
    }

    fn clear(&mut self) {
        self.record(DrawCommand::Clear);
    }

    fn fill(&mut self, color: Rgba) {
        self.record(DrawCommand::Fill(color));
    }

    fn fill_radial(&mut self, gradient: &RadialGradient) {
        self.record(DrawCommand::FillRadial(gradient.clone()));
    }

    fn stroke_curve(&mut self, stroke: &CurveStroke) {
        self.record(DrawCommand::StrokeCurve(stroke.clone()));
    }

    fn stroke_segment(&mut self, from: Point, to: Point, color: Rgba, width: f64) {
        self.record(DrawCommand::StrokeSegment {
            from,
            to,
            color,
            width,
        });
    }

    fn fill_disc(&mut self, center: Point, radius: f64, color: Rgba) {
        self.record(DrawCommand::FillDisc {
            center,
            radius,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_tracks_attach_and_detach() {
        let mut host = HeadlessHost::new(Viewport::new(10.0, 10.0));
        host.attach(Listeners::RESIZE);
        host.attach(Listeners::SCROLL);
        host.detach(Listeners::RESIZE);
        assert_eq!(host.attached(), Listeners::SCROLL);
        assert_eq!(host.journal().len(), 3);
    }

    #[test]
    fn cancel_clears_matching_request_only() {
        let mut host = HeadlessHost::new(Viewport::new(10.0, 10.0));
        let first = host.request_frame();
        let second = host.request_frame();
        assert_ne!(first, second);
        host.cancel_frame(first);
        assert_eq!(host.pending_frame(), Some(second));
        host.cancel_frame(second);
        assert_eq!(host.pending_frame(), None);
    }

    #[test]
    fn resize_is_not_a_draw_call() {
        let mut surface = RecordingSurface::default();
        surface.set_size(Viewport::new(4.0, 4.0));
        surface.clear();
        assert_eq!(surface.draw_calls(), 1);
        assert_eq!(surface.size(), Viewport::new(4.0, 4.0));
        assert_eq!(surface.take_commands().len(), 2);
        assert!(surface.commands().is_empty());
    }
}
