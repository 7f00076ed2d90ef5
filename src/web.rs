//! Browser binding.
//!
//! [`DomHost`] implements [`Host`] over the live document. [`WebCursor`] is
//! the `wasm_bindgen` handle a page creates once: `start()` injects the
//! hide-native-cursor rule, attaches the document/window listeners and starts
//! the animation-frame loop; `stop()` (or dropping the handle) reverses all
//! of it.
//!
//! Failed DOM writes are logged, never thrown; the engine treats the
//! document as best-effort.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CssStyleDeclaration, Document, Element, Event, EventTarget, HtmlElement, SvgElement, Window,
};

use crate::config::CursorConfig;
use crate::consts::{
    FOREIGN_TAGS, HIDE_CURSOR_CSS, HIDE_CURSOR_STYLE_ID, MAGNET_X_PROP, MAGNET_Y_PROP, MORPHED_ATTR,
    PARALLAX_X_PROP, PARALLAX_Y_PROP, RADIUS_ATTR, RELEASE_EASING,
};
use crate::engine::CursorEngine;
use crate::error::{ConfigError, HostError};
use crate::geom::{Offset, Point, Rect};
use crate::host::{
    ElementId, Host, OffsetProperty, RadiusHints, TextHit, TextStyle, Transform, Transition,
};
use crate::mode::Marker;
use crate::output::CursorOutput;

#[cfg(test)]
#[path = "web_test.rs"]
mod web_test;

/// Error raised while creating or mounting a [`WebCursor`].
#[derive(Debug, thiserror::Error)]
pub enum MountError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("failed to add `{event}` listener")]
    Listener { event: &'static str },
    #[error("requestAnimationFrame failed")]
    AnimationFrame,
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<MountError> for JsValue {
    fn from(err: MountError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

fn log_failure<T>(result: Result<T, JsValue>, action: &'static str) {
    if let Err(err) = result {
        tracing::warn!(?err, action, "DOM write failed");
    }
}

fn same_node(a: &Element, b: &Element) -> bool {
    let a: &JsValue = a.as_ref();
    let b: &JsValue = b.as_ref();
    a == b
}

// =============================================================================
// DomHost
// =============================================================================

/// [`Host`] over the live document.
///
/// Element handles live in an explicit registry. The engine prunes it after
/// every event via [`Host::retain_handles`], so it only ever holds the active
/// target and elements awaiting cleanup.
pub struct DomHost {
    window: Window,
    document: Document,
    registry: Vec<(ElementId, Element)>,
    next_id: u64,
    hide_style: Option<Element>,
}

impl DomHost {
    /// Bind to the global window and document.
    ///
    /// # Errors
    ///
    /// Returns `Err` outside a browser main thread.
    pub fn new() -> Result<Self, MountError> {
        let window = web_sys::window().ok_or(MountError::NoWindow)?;
        let document = window.document().ok_or(MountError::NoDocument)?;
        Ok(Self { window, document, registry: Vec::new(), next_id: 0, hide_style: None })
    }

    fn intern(&mut self, el: Element) -> ElementId {
        if let Some((id, _)) = self.registry.iter().find(|(_, known)| same_node(known, &el)) {
            return *id;
        }
        self.next_id += 1;
        let id = ElementId(self.next_id);
        self.registry.push((id, el));
        id
    }

    fn get(&self, id: ElementId) -> Option<&Element> {
        self.registry.iter().find(|(known, _)| *known == id).map(|(_, el)| el)
    }

    /// Inline style of an element about to be written; logs when there is
    /// none so a dropped write is never silent.
    fn inline_style(&self, id: ElementId, action: &'static str) -> Option<CssStyleDeclaration> {
        let el = self.get(id)?;
        let style = style_of(el);
        if style.is_none() {
            tracing::warn!(
                tag = %el.tag_name(),
                action,
                "element has no inline style; write skipped"
            );
        }
        style
    }

    fn computed_style(&self, id: ElementId) -> Option<CssStyleDeclaration> {
        match self.window.get_computed_style(self.get(id)?) {
            Ok(Some(style)) => Some(style),
            _ => None,
        }
    }

    fn media_matches(&self, query: &str) -> bool {
        match self.window.match_media(query) {
            Ok(Some(list)) => list.matches(),
            _ => false,
        }
    }

    /// Text node under the caret, trying the standard API then the WebKit one.
    fn caret_node(&self, pt: Point) -> Result<Option<web_sys::Node>, HostError> {
        let doc: &JsValue = self.document.as_ref();
        let (x, y) = (JsValue::from_f64(pt.x), JsValue::from_f64(pt.y));
        let probe_error = |err: JsValue| HostError::CaretProbe(format!("{err:?}"));

        if let Some(probe) = js_method(doc, "caretPositionFromPoint") {
            let position = probe.call2(doc, &x, &y).map_err(probe_error)?;
            return Ok(node_field(&position, "offsetNode"));
        }
        if let Some(probe) = js_method(doc, "caretRangeFromPoint") {
            let range = probe.call2(doc, &x, &y).map_err(probe_error)?;
            return Ok(node_field(&range, "startContainer"));
        }
        Err(HostError::CaretUnavailable)
    }
}

/// Inline style declaration of HTML and SVG elements.
fn style_of(el: &Element) -> Option<CssStyleDeclaration> {
    if let Some(html) = el.dyn_ref::<HtmlElement>() {
        return Some(html.style());
    }
    el.dyn_ref::<SvgElement>().map(SvgElement::style)
}

fn js_method(target: &JsValue, name: &str) -> Option<js_sys::Function> {
    match js_sys::Reflect::get(target, &JsValue::from_str(name)) {
        Ok(value) if value.is_function() => Some(value.unchecked_into()),
        _ => None,
    }
}

fn node_field(target: &JsValue, name: &str) -> Option<web_sys::Node> {
    if target.is_null() || target.is_undefined() {
        return None;
    }
    match js_sys::Reflect::get(target, &JsValue::from_str(name)) {
        Ok(value) if value.is_instance_of::<web_sys::Node>() => Some(value.unchecked_into()),
        _ => None,
    }
}

impl Host for DomHost {
    fn has_fine_pointer(&self) -> bool {
        self.media_matches("(hover: hover) and (pointer: fine)")
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.media_matches("(prefers-reduced-motion: reduce)")
    }

    #[allow(clippy::cast_possible_truncation)]
    fn element_at(&mut self, pt: Point) -> Option<ElementId> {
        let el = self.document.element_from_point(pt.x as f32, pt.y as f32)?;
        Some(self.intern(el))
    }

    fn closest(&mut self, el: ElementId, marker: Marker) -> Option<ElementId> {
        let el = self.get(el)?.clone();
        match el.closest(marker.selector()) {
            Ok(Some(found)) => Some(self.intern(found)),
            _ => None,
        }
    }

    fn matches(&self, el: ElementId, marker: Marker) -> bool {
        self.get(el).is_some_and(|el| el.matches(marker.selector()).unwrap_or(false))
    }

    fn is_connected(&self, el: ElementId) -> bool {
        self.get(el).is_some_and(|el| el.is_connected())
    }

    fn is_foreign_content(&self, el: ElementId) -> bool {
        self.get(el).is_some_and(|el| {
            let tag = el.tag_name().to_ascii_uppercase();
            FOREIGN_TAGS.contains(&tag.as_str())
        })
    }

    fn bounding_rect(&self, el: ElementId) -> Option<Rect> {
        let el = self.get(el).filter(|el| el.is_connected())?;
        let r = el.get_bounding_client_rect();
        Some(Rect::new(r.x(), r.y(), r.width(), r.height()))
    }

    fn caret_text_at(&mut self, pt: Point) -> Result<Option<TextHit>, HostError> {
        let Some(node) = self.caret_node(pt)? else {
            return Ok(None);
        };
        if node.node_type() != web_sys::Node::TEXT_NODE {
            return Ok(None);
        }
        let Some(parent) = node.parent_element() else {
            return Ok(None);
        };
        let text = node.text_content().unwrap_or_default();
        Ok(Some(TextHit { element: self.intern(parent), text }))
    }

    fn text_style(&self, el: ElementId) -> TextStyle {
        let Some(style) = self.computed_style(el) else {
            return TextStyle::default();
        };
        TextStyle {
            line_height: style.get_property_value("line-height").unwrap_or_default(),
            font_size: style.get_property_value("font-size").unwrap_or_default(),
        }
    }

    fn radius_hints(&self, el: ElementId) -> RadiusHints {
        let attribute = self.get(el).and_then(|el| el.get_attribute(RADIUS_ATTR));
        let computed = self.computed_style(el).and_then(|style| {
            match style.get_property_value("border-top-left-radius") {
                Ok(value) if !value.is_empty() => Some(value),
                _ => None,
            }
        });
        RadiusHints { attribute, computed }
    }

    fn set_transform(&mut self, el: ElementId, transform: Option<Transform>) {
        let Some(style) = self.inline_style(el, "set transform") else {
            return;
        };
        match transform {
            Some(t) => {
                let value = format!(
                    "translate3d({:.3}px, {:.3}px, 0) scale({:.4})",
                    t.translate.dx, t.translate.dy, t.scale
                );
                log_failure(style.set_property("transform", &value), "set transform");
            }
            None => log_failure(style.remove_property("transform"), "clear transform"),
        }
    }

    fn set_transition(&mut self, el: ElementId, transition: Transition) {
        let Some(style) = self.inline_style(el, "set transition") else {
            return;
        };
        match transition {
            Transition::Suspended => {
                log_failure(style.set_property("transition", "none"), "suspend transition");
            }
            Transition::Release { duration_ms } => {
                let value = format!("transform {duration_ms}ms {RELEASE_EASING}");
                log_failure(style.set_property("transition", &value), "release transition");
            }
            Transition::Authored => {
                log_failure(style.remove_property("transition"), "restore transition");
            }
        }
    }

    fn set_offset_property(
        &mut self,
        el: ElementId,
        property: OffsetProperty,
        value: Option<Offset>,
    ) {
        let Some(style) = self.inline_style(el, "set offset property") else {
            return;
        };
        let (x_prop, y_prop) = match property {
            OffsetProperty::Parallax => (PARALLAX_X_PROP, PARALLAX_Y_PROP),
            OffsetProperty::Magnet => (MAGNET_X_PROP, MAGNET_Y_PROP),
        };
        match value {
            Some(offset) => {
                for (prop, px) in [(x_prop, offset.dx), (y_prop, offset.dy)] {
                    let value = format!("{px:.3}px");
                    log_failure(style.set_property(prop, &value), "set offset property");
                }
            }
            None => {
                log_failure(style.remove_property(x_prop), "clear offset property");
                log_failure(style.remove_property(y_prop), "clear offset property");
            }
        }
    }

    fn set_morphed_marker(&mut self, el: ElementId, on: bool) {
        let Some(el) = self.get(el) else {
            return;
        };
        if on {
            log_failure(el.set_attribute(MORPHED_ATTR, ""), "set morphed marker");
        } else {
            log_failure(el.remove_attribute(MORPHED_ATTR), "remove morphed marker");
        }
    }

    fn strip_inline_cursor(&mut self, el: ElementId) {
        // Elements without inline style cannot carry an inline cursor.
        let Some(style) = self.get(el).and_then(style_of) else {
            return;
        };
        if style.get_property_value("cursor").is_ok_and(|value| !value.is_empty()) {
            log_failure(style.remove_property("cursor"), "strip inline cursor");
        }
    }

    fn set_native_cursor_hidden(&mut self, hidden: bool) {
        if !hidden {
            if let Some(style) = self.hide_style.take() {
                style.remove();
            }
            return;
        }
        if self.hide_style.is_some() {
            return;
        }
        let style = match self.document.create_element("style") {
            Ok(style) => style,
            Err(err) => {
                tracing::warn!(?err, "could not create hide-cursor style");
                return;
            }
        };
        style.set_id(HIDE_CURSOR_STYLE_ID);
        style.set_text_content(Some(HIDE_CURSOR_CSS));
        let Some(head) = self.document.head() else {
            tracing::warn!("document has no <head>; native cursor stays visible");
            return;
        };
        match head.append_child(&style) {
            Ok(_) => self.hide_style = Some(style),
            Err(err) => tracing::warn!(?err, "could not inject hide-cursor style"),
        }
    }

    fn retain_handles(&mut self, live: &[ElementId]) {
        self.registry.retain(|(id, _)| live.contains(id));
    }
}

// =============================================================================
// WebCursor
// =============================================================================

type Handler = fn(&mut CursorEngine<DomHost>, &Event);

/// Shared holder for a value that callbacks read while JS may replace it.
///
/// Readers get a clone, so no borrow is held across a call into JS and a
/// callback may replace the value it was invoked through.
struct Slot<T>(Rc<RefCell<Option<T>>>);

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self(Rc::new(RefCell::new(None)))
    }
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T: Clone> Slot<T> {
    fn get(&self) -> Option<T> {
        match self.0.try_borrow() {
            Ok(value) => value.clone(),
            Err(_) => None,
        }
    }

    /// Replace the value. Returns `false` (and logs) if the slot is busy.
    fn set(&self, value: Option<T>) -> bool {
        match self.0.try_borrow_mut() {
            Ok(mut slot) => {
                *slot = value;
                true
            }
            Err(_) => {
                tracing::warn!("slot busy; update dropped");
                false
            }
        }
    }
}

struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

/// Page-level handle around a [`CursorEngine`] bound to the live DOM.
#[wasm_bindgen]
pub struct WebCursor {
    window: Window,
    engine: Rc<RefCell<CursorEngine<DomHost>>>,
    listeners: Vec<Listener>,
    frame: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
    frame_handle: Rc<Cell<Option<i32>>>,
    renderer: Slot<js_sys::Function>,
}

#[wasm_bindgen]
impl WebCursor {
    /// Create the engine. `config_json` is an optional partial
    /// [`CursorConfig`] object.
    ///
    /// # Errors
    ///
    /// Returns `Err` for invalid config or outside a browser window.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<WebCursor, JsValue> {
        init_logging();
        let config = match config_json.as_deref() {
            Some(raw) => CursorConfig::from_json(raw).map_err(MountError::from)?,
            None => CursorConfig::default(),
        };
        let host = DomHost::new()?;
        let window = host.window.clone();
        Ok(Self {
            window,
            engine: Rc::new(RefCell::new(CursorEngine::new(host, config))),
            listeners: Vec::new(),
            frame: Rc::new(RefCell::new(None)),
            frame_handle: Rc::new(Cell::new(None)),
            renderer: Slot::default(),
        })
    }

    /// `false` on coarse-pointer devices: render nothing.
    #[wasm_bindgen(getter)]
    pub fn enabled(&self) -> bool {
        self.engine.try_borrow().is_ok_and(|engine| engine.is_enabled())
    }

    /// Mount listeners and the frame loop. No-op when disabled or mounted.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a listener or the first animation frame could not be
    /// registered; anything already attached is detached again.
    pub fn start(&mut self) -> Result<(), JsValue> {
        if let Err(err) = self.mount() {
            self.stop();
            return Err(err.into());
        }
        Ok(())
    }

    /// Detach everything and undo every DOM change.
    pub fn stop(&mut self) {
        if let Some(id) = self.frame_handle.take() {
            log_failure(self.window.cancel_animation_frame(id), "cancel animation frame");
        }
        *self.frame.borrow_mut() = None;
        for listener in self.listeners.drain(..) {
            let callback = listener.callback.as_ref().unchecked_ref();
            log_failure(
                listener.target.remove_event_listener_with_callback(listener.event, callback),
                "remove listener",
            );
        }
        match self.engine.try_borrow_mut() {
            Ok(mut engine) => engine.stop(),
            Err(_) => tracing::warn!("engine busy during stop"),
        }
    }

    /// Register a callback invoked with the output snapshot every frame.
    #[wasm_bindgen(js_name = setRenderer)]
    pub fn set_renderer(&self, callback: Option<js_sys::Function>) {
        self.renderer.set(callback);
    }

    /// The current output snapshot as a plain JS object.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the snapshot cannot be converted.
    pub fn output(&self) -> Result<JsValue, JsValue> {
        let output =
            self.engine.try_borrow().map_err(|_| JsValue::from_str("engine busy"))?.output();
        to_js(&output)
    }

    /// Release the active morph target now. Idempotent.
    #[wasm_bindgen(js_name = releaseActive)]
    pub fn release_active(&self) -> bool {
        let now = self.now_ms();
        self.engine.try_borrow_mut().is_ok_and(|mut engine| engine.release_active(now))
    }
}

impl WebCursor {
    fn mount(&mut self) -> Result<(), MountError> {
        if !self.listeners.is_empty() {
            return Ok(());
        }
        {
            let Ok(mut engine) = self.engine.try_borrow_mut() else {
                return Ok(());
            };
            if !engine.is_enabled() {
                return Ok(());
            }
            engine.start();
        }

        let document = self.window.document().ok_or(MountError::NoDocument)?;
        let root: EventTarget = match document.document_element() {
            Some(el) => el.into(),
            None => document.clone().into(),
        };
        let window: EventTarget = self.window.clone().into();

        self.listen(document.into(), "pointermove", |engine, ev| {
            if let Some(pt) = mouse_point(ev) {
                engine.on_pointer_move(pt, ev.time_stamp());
            }
        })?;
        self.listen(root.clone(), "pointerenter", |engine, ev| {
            if let Some(pt) = mouse_point(ev) {
                engine.on_pointer_enter(pt, ev.time_stamp());
            }
        })?;
        self.listen(root, "pointerleave", |engine, ev| engine.on_pointer_leave(ev.time_stamp()))?;
        self.listen(window.clone(), "blur", |engine, ev| engine.on_blur(ev.time_stamp()))?;
        self.listen(window, "focus", |engine, ev| engine.on_focus(ev.time_stamp()))?;
        self.start_frame_loop()
    }

    fn listen(
        &mut self,
        target: EventTarget,
        event: &'static str,
        handler: Handler,
    ) -> Result<(), MountError> {
        let engine = Rc::clone(&self.engine);
        let callback = Closure::wrap(Box::new(move |ev: Event| {
            if let Ok(mut engine) = engine.try_borrow_mut() {
                handler(&mut engine, &ev);
            }
        }) as Box<dyn FnMut(Event)>);
        target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .map_err(|_| MountError::Listener { event })?;
        self.listeners.push(Listener { target, event, callback });
        Ok(())
    }

    fn start_frame_loop(&mut self) -> Result<(), MountError> {
        let engine = Rc::clone(&self.engine);
        let renderer = self.renderer.clone();
        let frame = Rc::clone(&self.frame);
        let handle = Rc::clone(&self.frame_handle);
        let window = self.window.clone();

        let callback = Closure::wrap(Box::new(move |ts: f64| {
            let output = match engine.try_borrow_mut() {
                Ok(mut engine) => Some(engine.tick(ts)),
                Err(_) => None,
            };
            if let (Some(output), Some(render)) = (output, renderer.get()) {
                notify(&render, &output);
            }
            if let Some(next) = frame.borrow().as_ref() {
                match window.request_animation_frame(next.as_ref().unchecked_ref()) {
                    Ok(id) => handle.set(Some(id)),
                    Err(err) => {
                        tracing::warn!(?err, "requestAnimationFrame failed; frame loop stopped");
                        handle.set(None);
                    }
                }
            }
        }) as Box<dyn FnMut(f64)>);

        let id = self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map_err(|_| MountError::AnimationFrame)?;
        self.frame_handle.set(Some(id));
        *self.frame.borrow_mut() = Some(callback);
        Ok(())
    }

    fn now_ms(&self) -> f64 {
        self.window.performance().map_or(0.0, |perf| perf.now())
    }
}

impl Drop for WebCursor {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Viewport position of a mouse or pen event; touch is ignored.
fn mouse_point(ev: &Event) -> Option<Point> {
    let ev = ev.dyn_ref::<web_sys::PointerEvent>()?;
    if ev.pointer_type() == "touch" {
        return None;
    }
    Some(Point::new(f64::from(ev.client_x()), f64::from(ev.client_y())))
}

fn to_js(output: &CursorOutput) -> Result<JsValue, JsValue> {
    let json = serde_json::to_string(output).map_err(|err| JsValue::from_str(&err.to_string()))?;
    js_sys::JSON::parse(&json)
}

fn notify(render: &js_sys::Function, output: &CursorOutput) {
    match to_js(output) {
        Ok(value) => log_failure(render.call1(&JsValue::NULL, &value), "renderer callback"),
        Err(err) => tracing::warn!(?err, "could not convert cursor output"),
    }
}

fn init_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        tracing::debug!("console logger already installed");
    }
}
