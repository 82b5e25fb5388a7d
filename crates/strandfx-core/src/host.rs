//! Platform boundary: listener registration, frame scheduling, viewport.
//!
//! A [`Mount`](crate::mount::Mount) never touches `window` directly. It asks
//! its [`Host`] to attach listeners and request frames, and the host feeds
//! the resulting callbacks back in as [`HostEvent`]s and frame timestamps.
//! The host is passed into each call instead of being owned so that the web
//! binding can keep closures that point back at the mount without a cycle.

use bitflags::bitflags;

use crate::geometry::Viewport;

bitflags! {
    /// Listener kinds a mount may attach.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Listeners: u8 {
        const RESIZE        = 0b0001;
        const POINTER_MOVE  = 0b0010;
        const POINTER_LEAVE = 0b0100;
        const SCROLL        = 0b1000;

        const POINTER = Self::POINTER_MOVE.bits() | Self::POINTER_LEAVE.bits();
    }
}

impl Listeners {
    /// Single-listener flags in attach order.
    pub const EACH: [Listeners; 4] = [
        Self::RESIZE,
        Self::POINTER_MOVE,
        Self::POINTER_LEAVE,
        Self::SCROLL,
    ];

    /// DOM event name for a single listener flag.
    #[must_use]
    pub fn event_name(self) -> Option<&'static str> {
        if self == Self::RESIZE {
            Some("resize")
        } else if self == Self::POINTER_MOVE {
            Some("mousemove")
        } else if self == Self::POINTER_LEAVE {
            Some("mouseleave")
        } else if self == Self::SCROLL {
            Some("scroll")
        } else {
            None
        }
    }
}

/// Opaque token for a pending animation-frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// Callbacks delivered by the host between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    /// The viewport changed size; query [`Host::viewport`] for the new one.
    Resize,
    /// Pointer moved to `(x, y)` at host time `time_ms`.
    PointerMove { x: f64, y: f64, time_ms: f64 },
    /// Pointer left the document.
    PointerLeave,
    /// Page scrolled to vertical offset `offset` pixels.
    Scroll { offset: f64 },
}

impl HostEvent {
    /// The listener that produces this event.
    #[must_use]
    pub const fn listener(&self) -> Listeners {
        match self {
            Self::Resize => Listeners::RESIZE,
            Self::PointerMove { .. } => Listeners::POINTER_MOVE,
            Self::PointerLeave => Listeners::POINTER_LEAVE,
            Self::Scroll { .. } => Listeners::SCROLL,
        }
    }
}

pub trait Host {
    /// Current viewport size in CSS pixels.
    fn viewport(&self) -> Viewport;

    /// Register one listener. Called with a single flag at a time.
    fn attach(&mut self, listener: Listeners);

    /// Remove one listener previously attached.
    fn detach(&mut self, listener: Listeners);

    /// Ask for a callback on the next display refresh.
    fn request_frame(&mut self) -> FrameHandle;

    /// Withdraw a pending frame request.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_is_move_plus_leave() {
        assert_eq!(
            Listeners::POINTER,
            Listeners::POINTER_MOVE | Listeners::POINTER_LEAVE
        );
        assert_eq!(Listeners::all().bits(), 0b1111);
    }

    #[test]
    fn event_names_only_for_single_flags() {
        assert_eq!(Listeners::RESIZE.event_name(), Some("resize"));
        assert_eq!(Listeners::SCROLL.event_name(), Some("scroll"));
        assert_eq!(Listeners::POINTER.event_name(), None);
        assert_eq!(Listeners::empty().event_name(), None);
    }

    #[test]
    fn events_map_to_their_listener() {
        let moved = HostEvent::PointerMove {
            x: 1.0,
            y: 2.0,
            time_ms: 3.0,
        };
        assert_eq!(moved.listener(), Listeners::POINTER_MOVE);
        assert_eq!(HostEvent::PointerLeave.listener(), Listeners::POINTER_LEAVE);
        assert_eq!(HostEvent::Scroll { offset: 4.0 }.listener(), Listeners::SCROLL);
        assert_eq!(HostEvent::Resize.listener(), Listeners::RESIZE);
    }
}
