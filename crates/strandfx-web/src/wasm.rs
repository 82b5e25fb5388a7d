//! `wasm-bindgen` exports: canvas surface, window host and the JS-facing
//! backdrop handles.

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::{Rc, Weak};

use js_sys::Reflect;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasGradient, CanvasRenderingContext2d, EventTarget, HtmlCanvasElement, MouseEvent, Window,
};

use strandfx_core::palette::{ColorStop, RadialGradient, Rgba};
use strandfx_core::surface::CurveStroke;
use strandfx_core::{
    BackdropEffect, FloatingLinesField, FrameHandle, Host, HostEvent, HyperspaceField, Listeners,
    Mount, Point, Surface, Viewport,
};

use crate::options;

fn install_panic_hook() {
    use std::sync::Once;
    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let global = js_sys::global();
            if let Ok(console) = Reflect::get(&global, &"console".into()) {
                if let Ok(error) = Reflect::get(&console, &"error".into()) {
                    if let Ok(f) = error.dyn_into::<js_sys::Function>() {
                        let _ = f.call1(&console, &JsValue::from_str(&format!("{info}")));
                    }
                }
            }
        }));
    });
}

// ---------------------------------------------------------------------------
// Canvas surface
// ---------------------------------------------------------------------------

struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    fn from_canvas(canvas: HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        // The backdrop never takes clicks from the page above it.
        if canvas.style().set_property("pointer-events", "none").is_err() {
            tracing::warn!("cannot set pointer-events on canvas");
        }
        Some(Self { canvas, ctx })
    }

    fn add_stops(gradient: &CanvasGradient, stops: &[ColorStop]) {
        for stop in stops {
            let _ = gradient.add_color_stop(stop.offset as f32, &stop.color.css());
        }
    }

    fn cover(&self) {
        let Viewport { width, height } = self.size();
        self.ctx.fill_rect(0.0, 0.0, width, height);
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> Viewport {
        Viewport::new(f64::from(self.canvas.width()), f64::from(self.canvas.height()))
    }

    fn set_size(&mut self, viewport: Viewport) {
        self.canvas.set_width(viewport.width.max(0.0) as u32);
        self.canvas.set_height(viewport.height.max(0.0) as u32);
    }

    fn clear(&mut self) {
        let Viewport { width, height } = self.size();
        self.ctx.clear_rect(0.0, 0.0, width, height);
    }

    fn fill(&mut self, color: Rgba) {
        self.ctx.set_fill_style_str(&color.css());
        self.cover();
    }

    fn fill_radial(&mut self, gradient: &RadialGradient) {
        let Point { x, y } = gradient.center;
        let Ok(canvas_gradient) = self
            .ctx
            .create_radial_gradient(x, y, 0.0, x, y, gradient.radius)
        else {
            return;
        };
        Self::add_stops(&canvas_gradient, &gradient.stops);
        self.ctx.set_fill_style_canvas_gradient(&canvas_gradient);
        self.cover();
    }

    fn stroke_curve(&mut self, stroke: &CurveStroke) {
        let curve = &stroke.curve;
        let line = &stroke.gradient;
        let canvas_gradient = self
            .ctx
            .create_linear_gradient(line.from.x, line.from.y, line.to.x, line.to.y);
        Self::add_stops(&canvas_gradient, &line.stops);

        let ctx = &self.ctx;
        ctx.begin_path();
        ctx.move_to(curve.start.x, curve.start.y);
        ctx.bezier_curve_to(
            curve.c1.x,
            curve.c1.y,
            curve.c2.x,
            curve.c2.y,
            curve.end.x,
            curve.end.y,
        );
        ctx.set_stroke_style_canvas_gradient(&canvas_gradient);
        ctx.set_line_width(stroke.width);
        ctx.set_line_cap("round");
        ctx.set_shadow_blur(stroke.glow.blur);
        ctx.set_shadow_color(&stroke.glow.color.css());
        ctx.stroke();
        ctx.set_shadow_blur(0.0);
    }

    fn stroke_segment(&mut self, from: Point, to: Point, color: Rgba, width: f64) {
        let ctx = &self.ctx;
        ctx.begin_path();
        ctx.move_to(from.x, from.y);
        ctx.line_to(to.x, to.y);
        ctx.set_stroke_style_str(&color.css());
        ctx.set_line_width(width);
        ctx.stroke();
    }

    fn fill_disc(&mut self, center: Point, radius: f64, color: Rgba) {
        let ctx = &self.ctx;
        ctx.begin_path();
        if ctx.arc(center.x, center.y, radius, 0.0, TAU).is_err() {
            return;
        }
        ctx.set_fill_style_str(&color.css());
        ctx.fill();
    }
}

// ---------------------------------------------------------------------------
// Window host
// ---------------------------------------------------------------------------

/// Receiver for host callbacks; implemented by the shared mount state.
trait Driven {
    fn event(&self, event: HostEvent);
    fn frame(&self, time_ms: f64);
}

struct Registered {
    listener: Listeners,
    target: EventTarget,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

struct WebHost {
    window: Window,
    sink: Weak<dyn Driven>,
    registered: Vec<Registered>,
    /// One persistent frame callback, reused for every request.
    frame: Option<Closure<dyn FnMut(f64)>>,
}

impl WebHost {
    fn new(window: Window, sink: Weak<dyn Driven>) -> Self {
        Self {
            window,
            sink,
            registered: Vec::new(),
            frame: None,
        }
    }

    fn target_for(&self, listener: Listeners) -> Option<EventTarget> {
        if listener == Listeners::POINTER_LEAVE {
            self.window.document().map(Into::into)
        } else {
            Some(self.window.clone().into())
        }
    }

    fn callback_for(&self, listener: Listeners) -> Closure<dyn FnMut(web_sys::Event)> {
        let sink = self.sink.clone();
        let window = self.window.clone();
        Closure::wrap(Box::new(move |event: web_sys::Event| {
            let host_event = if listener == Listeners::RESIZE {
                HostEvent::Resize
            } else if listener == Listeners::POINTER_MOVE {
                let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                HostEvent::PointerMove {
                    x: f64::from(mouse.client_x()),
                    y: f64::from(mouse.client_y()),
                    time_ms: event.time_stamp(),
                }
            } else if listener == Listeners::POINTER_LEAVE {
                HostEvent::PointerLeave
            } else {
                HostEvent::Scroll {
                    offset: window.scroll_y().unwrap_or(0.0),
                }
            };
            if let Some(sink) = sink.upgrade() {
                sink.event(host_event);
            }
        }) as Box<dyn FnMut(web_sys::Event)>)
    }
}

impl Host for WebHost {
    fn viewport(&self) -> Viewport {
        let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Viewport::new(
            dim(self.window.inner_width()),
            dim(self.window.inner_height()),
        )
    }

    fn attach(&mut self, listener: Listeners) {
        let (Some(name), Some(target)) = (listener.event_name(), self.target_for(listener)) else {
            tracing::warn!(?listener, "no event target for listener");
            return;
        };
        let closure = self.callback_for(listener);
        if target
            .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
            .is_err()
        {
            tracing::warn!(event = name, "addEventListener failed");
            return;
        }
        self.registered.push(Registered {
            listener,
            target,
            closure,
        });
    }

    fn detach(&mut self, listener: Listeners) {
        let Some(name) = listener.event_name() else {
            return;
        };
        self.registered.retain(|entry| {
            if entry.listener != listener {
                return true;
            }
            let _ = entry
                .target
                .remove_event_listener_with_callback(name, entry.closure.as_ref().unchecked_ref());
            false
        });
    }

    fn request_frame(&mut self) -> FrameHandle {
        if self.frame.is_none() {
            let sink = self.sink.clone();
            self.frame = Some(Closure::wrap(Box::new(move |time_ms: f64| {
                if let Some(sink) = sink.upgrade() {
                    sink.frame(time_ms);
                }
            }) as Box<dyn FnMut(f64)>));
        }
        let Some(callback) = self.frame.as_ref() else {
            return FrameHandle(0);
        };
        match self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            Ok(id) => FrameHandle(id),
            Err(_) => {
                tracing::warn!("requestAnimationFrame failed");
                FrameHandle(0)
            }
        }
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let _ = self.window.cancel_animation_frame(handle.0);
    }
}

// ---------------------------------------------------------------------------
// Shared mount state
// ---------------------------------------------------------------------------

struct Shared<E: BackdropEffect> {
    mount: RefCell<Option<Mount<E, CanvasSurface>>>,
    host: RefCell<WebHost>,
}

impl<E: BackdropEffect> Driven for Shared<E> {
    fn event(&self, event: HostEvent) {
        let (Ok(mut mount), Ok(host)) = (self.mount.try_borrow_mut(), self.host.try_borrow())
        else {
            return;
        };
        if let Some(mount) = mount.as_mut() {
            mount.dispatch(event, &*host);
        }
    }

    fn frame(&self, time_ms: f64) {
        let (Ok(mut mount), Ok(mut host)) =
            (self.mount.try_borrow_mut(), self.host.try_borrow_mut())
        else {
            return;
        };
        if let Some(mount) = mount.as_mut() {
            mount.on_frame(time_ms, &mut *host);
        }
    }
}

impl<E: BackdropEffect + 'static> Shared<E> {
    /// Activate `effect` on `canvas`. A missing canvas or 2D context yields
    /// an inactive handle rather than an error.
    fn start(effect: E, canvas: Option<HtmlCanvasElement>) -> Result<Rc<Self>, JsValue> {
        install_panic_hook();
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let surface = canvas.and_then(CanvasSurface::from_canvas);
        let shared = Rc::new_cyclic(|weak: &Weak<Self>| {
            let sink: Weak<dyn Driven> = weak.clone();
            Self {
                mount: RefCell::new(None),
                host: RefCell::new(WebHost::new(window, sink)),
            }
        });
        let mounted = Mount::activate(effect, surface, &mut *shared.host.borrow_mut());
        match mounted {
            Ok(mount) => *shared.mount.borrow_mut() = Some(mount),
            Err(err) if err.is_silent() => {}
            Err(err) => return Err(JsValue::from_str(&err.to_string())),
        }
        Ok(shared)
    }

    /// Deactivate the mount. The deactivated mount is kept so the handle
    /// can still report its last population.
    fn stop(&self) {
        let (Ok(mut mount), Ok(mut host)) =
            (self.mount.try_borrow_mut(), self.host.try_borrow_mut())
        else {
            tracing::warn!("unmount during a callback; ignored");
            return;
        };
        if let Some(mount) = mount.as_mut() {
            mount.deactivate(&mut *host);
        }
    }

    fn listener_count(&self) -> usize {
        self.host.borrow().registered.len()
    }

    fn is_active(&self) -> bool {
        self.mount
            .borrow()
            .as_ref()
            .is_some_and(|mount| mount.is_active())
    }

    fn population(&self) -> usize {
        self.mount
            .borrow()
            .as_ref()
            .map_or(0, |mount| mount.effect().population())
    }
}

fn seed() -> u64 {
    options::seed_from_unit(js_sys::Math::random())
}

// ---------------------------------------------------------------------------
// JS exports
// ---------------------------------------------------------------------------

/// Floating-lines backdrop bound to one canvas.
///
/// ```js
/// const bg = FloatingLinesBackground.mount(canvas, JSON.stringify({ lineCount: [8, 12, 16] }));
/// // ...
/// bg.unmount();
/// ```
#[wasm_bindgen]
pub struct FloatingLinesBackground {
    shared: Rc<Shared<FloatingLinesField>>,
}

#[wasm_bindgen]
impl FloatingLinesBackground {
    /// Start the backdrop. `options` is a JSON object; unknown or malformed
    /// options fall back to defaults.
    pub fn mount(
        canvas: Option<HtmlCanvasElement>,
        options: Option<String>,
    ) -> Result<FloatingLinesBackground, JsValue> {
        let config = options::field_options(options.as_deref());
        let field = FloatingLinesField::new(config, seed());
        Ok(Self {
            shared: Shared::start(field, canvas)?,
        })
    }

    /// Cancel the pending frame and remove every listener. Idempotent.
    pub fn unmount(&mut self) {
        self.shared.stop();
    }

    #[wasm_bindgen(js_name = isActive)]
    pub fn is_active(&self) -> bool {
        self.shared.is_active()
    }

    #[wasm_bindgen(js_name = strandCount)]
    pub fn strand_count(&self) -> usize {
        self.shared.population()
    }

    /// DOM listeners currently registered by this handle.
    #[wasm_bindgen(js_name = listenerCount)]
    pub fn listener_count(&self) -> usize {
        self.shared.listener_count()
    }
}

impl Drop for FloatingLinesBackground {
    fn drop(&mut self) {
        self.shared.stop();
    }
}

/// Hyperspace starfield backdrop bound to one canvas.
#[wasm_bindgen]
pub struct HyperSpeedBackground {
    shared: Rc<Shared<HyperspaceField>>,
}

#[wasm_bindgen]
impl HyperSpeedBackground {
    pub fn mount(
        canvas: Option<HtmlCanvasElement>,
        options: Option<String>,
    ) -> Result<HyperSpeedBackground, JsValue> {
        let config = options::starfield_options(options.as_deref());
        let field = HyperspaceField::new(config, seed());
        Ok(Self {
            shared: Shared::start(field, canvas)?,
        })
    }

    pub fn unmount(&mut self) {
        self.shared.stop();
    }

    #[wasm_bindgen(js_name = isActive)]
    pub fn is_active(&self) -> bool {
        self.shared.is_active()
    }

    #[wasm_bindgen(js_name = starCount)]
    pub fn star_count(&self) -> usize {
        self.shared.population()
    }

    #[wasm_bindgen(js_name = listenerCount)]
    pub fn listener_count(&self) -> usize {
        self.shared.listener_count()
    }
}

impl Drop for HyperSpeedBackground {
    fn drop(&mut self) {
        self.shared.stop();
    }
}

/// Simulated form submissions. Time is supplied by the page
/// (`performance.now()`), and `poll` is expected from a timer or frame loop.
#[wasm_bindgen(js_name = SubmissionDesk)]
pub struct WebSubmissionDesk {
    inner: strandfx_core::SubmissionDesk,
}

#[wasm_bindgen(js_class = SubmissionDesk)]
impl WebSubmissionDesk {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        install_panic_hook();
        Self {
            inner: strandfx_core::SubmissionDesk::new(),
        }
    }

    /// Submit a `kind` form ("contact", "brochure", "enquiry" or
    /// "newsletter") with a flat JSON field map. Returns the new phase name;
    /// an enquiry or a newsletter without email leaves it unchanged.
    pub fn submit(&mut self, kind: &str, fields: &str, now_ms: f64) -> Result<String, JsValue> {
        let kind = strandfx_core::FormKind::parse(kind)
            .ok_or_else(|| JsValue::from_str(&format!("unknown form kind: {kind}")))?;
        let fields = options::form_fields(fields).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.inner
            .submit(kind, &fields, now_ms)
            .map(|phase| phase.as_str().to_owned())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn poll(&mut self, now_ms: f64) -> String {
        self.inner.poll(now_ms).as_str().to_owned()
    }

    pub fn phase(&self) -> String {
        self.inner.phase().as_str().to_owned()
    }
}

impl Default for WebSubmissionDesk {
    fn default() -> Self {
        Self::new()
    }
}
