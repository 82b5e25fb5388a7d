//! Activation, per-frame driving and teardown of one backdrop instance.
//!
//! # Lifecycle
//!
//! ```text
//! activate ──► [frame requested] ──on_frame──► draw ──► [frame requested] ──► …
//!     │                 ▲
//!     │            dispatch(event)   (resize / pointer / scroll, between frames)
//!     ▼
//! deactivate: cancel the pending request, detach every listener, drop state
//! ```
//!
//! # Invariants
//!
//! 1. At most one frame request is outstanding; the next one is made only
//!    after the current frame has finished drawing.
//! 2. `Resize` is always attached. Pointer listeners are attached iff the
//!    effect asks for them, and likewise the scroll listener.
//! 3. After [`Mount::deactivate`] no listener remains attached and no draw
//!    call happens, even if the host delivers a stale frame callback.
//! 4. Events whose listener was never attached are ignored.

use crate::effect::{BackdropEffect, FrameInputs};
use crate::error::{FieldError, Result};
use crate::host::{FrameHandle, Host, HostEvent, Listeners};
use crate::surface::Surface;
use crate::tracking::{PointerTracker, ScrollTracker};

pub struct Mount<E, S> {
    effect: E,
    surface: S,
    pointer: PointerTracker,
    scroll: ScrollTracker,
    attached: Listeners,
    pending: Option<FrameHandle>,
    active: bool,
    frames_drawn: u64,
}

impl<E: BackdropEffect, S: Surface> Mount<E, S> {
    /// Size `surface` to the host viewport, populate `effect`, attach
    /// listeners and request the first frame.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::SurfaceUnavailable`] when `surface` is `None`.
    /// Nothing is attached or requested in that case.
    pub fn activate<H: Host + ?Sized>(
        mut effect: E,
        surface: Option<S>,
        host: &mut H,
    ) -> Result<Self> {
        let Some(mut surface) = surface else {
            tracing::debug!(effect = effect.name(), "no drawing surface; backdrop not started");
            return Err(FieldError::SurfaceUnavailable);
        };

        let viewport = host.viewport();
        surface.set_size(viewport);
        effect.resize(viewport);

        let wanted = effect.listeners() | Listeners::RESIZE;
        for listener in Listeners::EACH {
            if wanted.contains(listener) {
                host.attach(listener);
            }
        }
        let pending = Some(host.request_frame());

        tracing::debug!(
            effect = effect.name(),
            population = effect.population(),
            listeners = ?wanted,
            "backdrop activated"
        );

        Ok(Self {
            effect,
            surface,
            pointer: PointerTracker::new(),
            scroll: ScrollTracker::new(),
            attached: wanted,
            pending,
            active: true,
            frames_drawn: 0,
        })
    }

    /// Apply a host callback. Returns `false` when the event was ignored
    /// (mount inactive, or its listener was never attached).
    pub fn dispatch<H: Host + ?Sized>(&mut self, event: HostEvent, host: &H) -> bool {
        if !self.active || !self.attached.contains(event.listener()) {
            return false;
        }
        match event {
            HostEvent::Resize => {
                let viewport = host.viewport();
                self.surface.set_size(viewport);
                self.effect.resize(viewport);
            }
            HostEvent::PointerMove { x, y, time_ms } => self.pointer.on_move(x, y, time_ms),
            HostEvent::PointerLeave => self.pointer.on_leave(),
            HostEvent::Scroll { offset } => self.scroll.on_scroll(offset),
        }
        true
    }

    /// Frame callback at host timestamp `time_ms`. Draws one frame and
    /// requests the next. Returns `false` (and draws nothing) when no frame
    /// was pending, which covers stale callbacks after teardown.
    pub fn on_frame<H: Host + ?Sized>(&mut self, time_ms: f64, host: &mut H) -> bool {
        if !self.active || self.pending.take().is_none() {
            return false;
        }
        let inputs = FrameInputs {
            pointer: self.pointer,
            scroll_offset: self.scroll.offset(),
        };
        self.effect.frame(time_ms, &inputs, &mut self.surface);
        self.frames_drawn += 1;
        self.pending = Some(host.request_frame());
        true
    }

    /// Cancel the pending frame and detach every listener. Idempotent.
    pub fn deactivate<H: Host + ?Sized>(&mut self, host: &mut H) {
        if !self.active {
            return;
        }
        if let Some(handle) = self.pending.take() {
            host.cancel_frame(handle);
        }
        for listener in Listeners::EACH {
            if self.attached.contains(listener) {
                host.detach(listener);
            }
        }
        self.attached = Listeners::empty();
        self.pointer = PointerTracker::new();
        self.scroll = ScrollTracker::new();
        self.active = false;
        tracing::debug!(
            effect = self.effect.name(),
            frames = self.frames_drawn,
            "backdrop deactivated"
        );
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub const fn attached(&self) -> Listeners {
        self.attached
    }

    #[must_use]
    pub const fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    #[must_use]
    pub const fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    #[must_use]
    pub const fn pointer(&self) -> &PointerTracker {
        &self.pointer
    }

    #[must_use]
    pub const fn scroll_offset(&self) -> f64 {
        self.scroll.offset()
    }

    #[must_use]
    pub const fn effect(&self) -> &E {
        &self.effect
    }

    pub fn effect_mut(&mut self) -> &mut E {
        &mut self.effect
    }

    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
