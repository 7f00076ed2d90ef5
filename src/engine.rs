use crate::cleanup::CleanupRegistry;
use crate::config::CursorConfig;
use crate::consts::MAX_FRAME_DT_MS;
use crate::css;
use crate::geom::{Point, Rect};
use crate::host::{ElementId, Host, OffsetProperty, Transform};
use crate::machine::{self, ModeMachine, MorphTarget};
use crate::magnet::{magnetic_offset, parallax_offset};
use crate::mode::{Mode, Shape};
use crate::output::CursorOutput;
use crate::pointer::PointerTracker;
use crate::resolve::resolve;
use crate::spring::SpringSet;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// The cursor interaction engine.
///
/// Two producers feed it: pointer events (`on_pointer_*`, `on_blur`,
/// `on_focus`) and the per-frame [`CursorEngine::tick`]. Both only retarget
/// the springs; the renderer reads the interpolated [`CursorOutput`].
///
/// On a coarse-pointer device the engine is constructed disabled and every
/// entry point is a no-op: no global rule, no DOM writes.
pub struct CursorEngine<H: Host> {
    host: H,
    config: CursorConfig,
    pointer: PointerTracker,
    machine: ModeMachine,
    cleanup: CleanupRegistry,
    springs: SpringSet,
    reduced_motion: bool,
    running: bool,
    last_tick_ms: Option<f64>,
    revision: u64,
}

impl<H: Host> CursorEngine<H> {
    #[must_use]
    pub fn new(host: H, config: CursorConfig) -> Self {
        let enabled = host.has_fine_pointer();
        if !enabled {
            tracing::info!("no fine pointer; custom cursor disabled");
        }
        let reduced_motion = enabled && host.prefers_reduced_motion();
        let rest = Shape::for_pointer(Mode::Default, Point::default(), 0.0, &config);
        let springs = SpringSet::new(rest, config.follow, config.morph, config.fade);
        Self {
            host,
            pointer: PointerTracker::new(enabled),
            machine: ModeMachine::new(),
            cleanup: CleanupRegistry::new(),
            springs,
            reduced_motion,
            running: false,
            last_tick_ms: None,
            revision: 0,
            config,
        }
    }

    // --- Lifecycle ---

    /// Hide the platform pointer and begin accepting input.
    pub fn start(&mut self) {
        if !self.pointer.is_enabled() || self.running {
            return;
        }
        self.host.set_native_cursor_hidden(true);
        self.running = true;
        tracing::info!(reduced_motion = self.reduced_motion, "cursor engine started");
    }

    /// Undo every DOM change and stop accepting input.
    ///
    /// The active target is released and all pending cleanups run at once,
    /// so no marker, transform or custom property is left behind.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        let now = self.last_tick_ms.unwrap_or(0.0);
        self.machine.disengage(&mut self.host, &mut self.cleanup, now, 0.0);
        for (el, pending) in self.cleanup.drain() {
            machine::finish_cleanup(&mut self.host, el, pending);
        }
        self.pointer.leave();
        self.sync_opacity();
        self.host.set_native_cursor_hidden(false);
        self.host.retain_handles(&[]);
        self.running = false;
        self.last_tick_ms = None;
        tracing::info!("cursor engine stopped");
    }

    // --- Pointer input ---

    pub fn on_pointer_move(&mut self, pt: Point, now_ms: f64) {
        if !self.running {
            return;
        }
        if self.pointer.record(pt) {
            self.springs.jump_position(pt);
        }
        self.sync_opacity();

        let hit = self.host.element_at(pt);
        if let Some(el) = hit {
            self.host.strip_inline_cursor(el);
            if self.host.is_foreign_content(el) {
                self.pointer.arm_fade(now_ms + self.config.foreign_fade_ms);
            }
        }
        self.resolve_at(pt, hit, now_ms);
    }

    pub fn on_pointer_enter(&mut self, pt: Point, now_ms: f64) {
        self.on_pointer_move(pt, now_ms);
    }

    /// Fade out and release the active target immediately.
    pub fn on_pointer_leave(&mut self, now_ms: f64) {
        if !self.running {
            return;
        }
        self.pointer.leave();
        self.sync_opacity();
        self.disengage(now_ms);
    }

    /// Window lost focus; treated as leaving.
    pub fn on_blur(&mut self, now_ms: f64) {
        self.on_pointer_leave(now_ms);
    }

    /// Window regained focus; re-resolve at the last known position so DOM
    /// changes made meanwhile are picked up without new input.
    pub fn on_focus(&mut self, now_ms: f64) {
        if !self.running {
            return;
        }
        if let Some(pt) = self.pointer.position() {
            let hit = self.host.element_at(pt);
            self.resolve_at(pt, hit, now_ms);
        }
    }

    /// Release the active target, if any. Idempotent.
    pub fn release_active(&mut self, now_ms: f64) -> bool {
        if !self.running {
            return false;
        }
        self.disengage(now_ms)
    }

    // --- Frame loop ---

    /// Advance one animation frame: fire due cleanups, re-measure the active
    /// target, and step every spring.
    pub fn tick(&mut self, now_ms: f64) -> CursorOutput {
        if !self.running {
            return self.output();
        }
        let dt_ms = self
            .last_tick_ms
            .map_or(0.0, |prev| (now_ms - prev).clamp(0.0, MAX_FRAME_DT_MS));
        self.last_tick_ms = Some(now_ms);

        let due = self.cleanup.take_due(now_ms);
        for (el, pending) in &due {
            machine::finish_cleanup(&mut self.host, *el, *pending);
        }
        if self.pointer.poll_fade(now_ms) {
            tracing::debug!("pointer over foreign content; fading out");
            self.sync_opacity();
        }

        self.sync_target(now_ms);
        if !self.springs.is_settled() {
            self.springs.step(dt_ms / 1000.0);
        }
        if !due.is_empty() {
            self.retain_handles();
        }
        self.output()
    }

    /// Keep the cursor glued to the active target through scrolling, resizing
    /// and reflow. Disengages if the target is gone or lost its marker.
    fn sync_target(&mut self, now_ms: f64) {
        let Some(target) = self.machine.target() else {
            return;
        };
        let el = target.element;
        let still_valid = self.host.is_connected(el)
            && target.mode.marker().is_some_and(|marker| self.host.matches(el, marker));
        let rect = if still_valid { self.host.bounding_rect(el) } else { None };
        let Some(mut rect) = rect else {
            tracing::debug!(element = ?el, "morph target detached or unmarked; disengaging");
            self.disengage(now_ms);
            return;
        };

        if let Some(pt) = self.pointer.position().filter(|_| !self.reduced_motion) {
            rect = self.apply_displacement(target, rect, pt);
        }
        let shape = self.conform(el, rect);
        self.push_shape(shape);
    }

    /// Write the magnetic and parallax offsets for this frame. Returns the
    /// target's box after displacement.
    fn apply_displacement(&mut self, target: MorphTarget, rect: Rect, pt: Point) -> Rect {
        let el = target.element;
        let natural_center = rect.center().offset_by(-self.machine.applied());
        let magnet = magnetic_offset(
            natural_center,
            pt,
            self.config.magnetic_strength,
            self.config.magnetic_max_px,
        );
        self.host.set_offset_property(el, OffsetProperty::Magnet, Some(magnet));

        let mut rect = rect;
        if target.mode.displaces_target() {
            let transform = Transform { translate: magnet, scale: self.config.lift_scale };
            self.host.set_transform(el, Some(transform));
            // Record how far the box actually moved. Inline boxes ignore
            // transforms and some writes are dropped, so this may be zero.
            if let Some(moved) = self.host.bounding_rect(el) {
                self.machine.set_applied(moved.center().offset_from(natural_center));
                rect = moved;
            }
        }

        let parallax = parallax_offset(rect, pt, self.config.parallax_max_px);
        self.host.set_offset_property(el, OffsetProperty::Parallax, Some(parallax));
        rect
    }

    // --- Queries ---

    #[must_use]
    pub fn output(&self) -> CursorOutput {
        CursorOutput {
            enabled: self.pointer.is_enabled(),
            x: self.springs.x.value(),
            y: self.springs.y.value(),
            width: self.springs.width.value(),
            height: self.springs.height.value(),
            radius: self.springs.radius.value(),
            opacity: self.springs.opacity.value(),
            morphed: self.machine.target().is_some(),
            inverted: self.machine.inverted(),
            mode: self.machine.mode(),
            revision: self.revision,
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.pointer.is_enabled()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.machine.mode()
    }

    #[must_use]
    pub fn active_target(&self) -> Option<ElementId> {
        self.machine.target().map(|t| t.element)
    }

    #[must_use]
    pub fn cleanup(&self) -> &CleanupRegistry {
        &self.cleanup
    }

    #[must_use]
    pub fn springs(&self) -> &SpringSet {
        &self.springs
    }

    #[must_use]
    pub fn config(&self) -> &CursorConfig {
        &self.config
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    // --- Internals ---

    fn resolve_at(&mut self, pt: Point, hit: Option<ElementId>, now_ms: f64) {
        let res = resolve(&mut self.host, pt, hit);
        let release_ms = self.config.release_ms;
        self.machine.transition(&mut self.host, &mut self.cleanup, &res, now_ms, release_ms);
        self.push_current_shape();
        self.retain_handles();
    }

    fn disengage(&mut self, now_ms: f64) -> bool {
        let release_ms = self.config.release_ms;
        let released =
            self.machine.disengage(&mut self.host, &mut self.cleanup, now_ms, release_ms);
        self.push_current_shape();
        self.retain_handles();
        released
    }

    /// Retarget the springs for the current mode from wherever they are.
    fn push_current_shape(&mut self) {
        let shape = match self.machine.target() {
            Some(target) => self
                .host
                .bounding_rect(target.element)
                .map(|rect| self.conform(target.element, rect)),
            None => {
                let (mode, beam_height) = (self.machine.mode(), self.machine.beam_height());
                self.pointer
                    .position()
                    .map(|pt| Shape::for_pointer(mode, pt, beam_height, &self.config))
            }
        };
        if let Some(shape) = shape {
            self.push_shape(shape);
        }
    }

    fn conform(&self, el: ElementId, rect: Rect) -> Shape {
        let radius = css::corner_radius(&self.host.radius_hints(el), rect);
        Shape::conform(rect, radius, self.config.morph_padding)
    }

    fn push_shape(&mut self, shape: Shape) {
        if self.springs.push_shape(shape) {
            self.revision += 1;
        }
    }

    /// Fade toward the pointer's visibility.
    fn sync_opacity(&mut self) {
        let opacity = if self.pointer.is_visible() { 1.0 } else { 0.0 };
        if self.springs.set_opacity(opacity) {
            self.revision += 1;
        }
    }

    fn retain_handles(&mut self) {
        let active = self.machine.target().map(|t| t.element);
        let live: Vec<ElementId> = active.into_iter().chain(self.cleanup.elements()).collect();
        self.host.retain_handles(&live);
    }
}
