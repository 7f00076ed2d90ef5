//! The mode state machine.
//!
//! Holds the active mode and, for morph modes, the single [`MorphTarget`].
//! Adopting a target always releases the previous one first, and moving
//! between two morph targets goes directly from one to the other with no
//! `default` state in between.
//!
//! Release is eased: a displaced element gets a slow transition and its
//! transform cleared, while its morphed marker stays until the cleanup
//! deadline fires. Re-entering the element before then cancels the deadline
//! and the marker is never removed.

#[cfg(test)]
#[path = "machine_test.rs"]
mod machine_test;

use crate::cleanup::{CleanupRegistry, PendingCleanup};
use crate::geom::Offset;
use crate::host::{ElementId, Host, OffsetProperty, Transition};
use crate::mode::Mode;
use crate::resolve::Resolution;

/// The element the cursor is conformed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MorphTarget {
    pub element: ElementId,
    pub mode: Mode,
}

#[derive(Debug, Default)]
pub struct ModeMachine {
    mode: Mode,
    target: Option<MorphTarget>,
    /// How far our transform actually moved the target's box center.
    applied: Offset,
    beam_height: f64,
    inverted: bool,
}

impl ModeMachine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn target(&self) -> Option<MorphTarget> {
        self.target
    }

    #[must_use]
    pub fn applied(&self) -> Offset {
        self.applied
    }

    pub fn set_applied(&mut self, offset: Offset) {
        self.applied = offset;
    }

    #[must_use]
    pub fn beam_height(&self) -> f64 {
        self.beam_height
    }

    #[must_use]
    pub fn inverted(&self) -> bool {
        self.inverted
    }

    /// Whether `res` names the current mode and target.
    #[must_use]
    pub fn is_current(&self, res: &Resolution) -> bool {
        res.mode == self.mode && res.target == self.target.map(|t| t.element)
    }

    /// Move to the state described by `res`. Returns whether the mode or
    /// target changed.
    pub fn transition<H: Host>(
        &mut self,
        host: &mut H,
        cleanup: &mut CleanupRegistry,
        res: &Resolution,
        now_ms: f64,
        release_ms: f64,
    ) -> bool {
        self.inverted = res.inverted;
        if let Some(height) = res.beam_height {
            self.beam_height = height;
        }
        if self.is_current(res) {
            return false;
        }

        tracing::debug!(
            from = ?self.mode,
            to = ?res.mode,
            target = ?res.target,
            "cursor mode transition"
        );
        if let Some(previous) = self.target.take() {
            release_target(host, cleanup, previous, now_ms, release_ms);
        }
        self.applied = Offset::ZERO;
        self.mode = res.mode;

        if let Some(element) = res.target.filter(|_| res.mode.is_morph()) {
            self.adopt(host, cleanup, MorphTarget { element, mode: res.mode });
        }
        true
    }

    /// Release any target and fall back to `default`. Returns whether a
    /// target was released; calling again is a no-op.
    pub fn disengage<H: Host>(
        &mut self,
        host: &mut H,
        cleanup: &mut CleanupRegistry,
        now_ms: f64,
        release_ms: f64,
    ) -> bool {
        self.mode = Mode::Default;
        self.inverted = false;
        self.applied = Offset::ZERO;
        let Some(target) = self.target.take() else {
            return false;
        };
        release_target(host, cleanup, target, now_ms, release_ms);
        true
    }

    fn adopt<H: Host>(&mut self, host: &mut H, cleanup: &mut CleanupRegistry, target: MorphTarget) {
        if let Some(timer) = cleanup.cancel(target.element) {
            tracing::debug!(
                element = ?target.element,
                timer = timer.0,
                "re-entered before cleanup; marker kept"
            );
        }
        host.set_morphed_marker(target.element, true);
        if target.mode.displaces_target() {
            host.set_transition(target.element, Transition::Suspended);
        }
        self.target = Some(target);
    }
}

/// Start the eased release of `target` and schedule its cleanup.
fn release_target<H: Host>(
    host: &mut H,
    cleanup: &mut CleanupRegistry,
    target: MorphTarget,
    now_ms: f64,
    release_ms: f64,
) {
    let el = target.element;
    let displaced = target.mode.displaces_target();
    if displaced {
        host.set_transition(el, Transition::Release { duration_ms: release_ms });
        host.set_transform(el, None);
    }
    host.set_offset_property(el, OffsetProperty::Parallax, None);
    host.set_offset_property(el, OffsetProperty::Magnet, None);
    let timer = cleanup.schedule(el, now_ms + release_ms, displaced);
    tracing::debug!(element = ?el, timer = timer.0, "morph target released");
}

/// Finish a release whose deadline fired.
pub fn finish_cleanup<H: Host>(host: &mut H, el: ElementId, pending: PendingCleanup) {
    host.set_morphed_marker(el, false);
    if pending.restore_transition {
        host.set_transition(el, Transition::Authored);
    }
    tracing::debug!(element = ?el, timer = pending.id.0, "cleanup fired");
}
