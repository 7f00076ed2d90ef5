//! Raw pointer state.
//!
//! Tracks the last pointer position, whether the engine is enabled for this
//! device, and the single fade deadline armed while the pointer sits over
//! foreign embedded content (which stops reporting moves to the document).

#[cfg(test)]
#[path = "pointer_test.rs"]
mod pointer_test;

use crate::geom::Point;

#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    enabled: bool,
    position: Option<Point>,
    visible: bool,
    fade_due_ms: Option<f64>,
}

impl PointerTracker {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self { enabled, ..Self::default() }
    }

    /// `false` on coarse-pointer devices; nothing should be rendered.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn position(&self) -> Option<Point> {
        self.position
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Record a move or enter at `pt`. Shows the cursor and cancels any
    /// pending foreign-content fade. Returns `true` on first contact.
    pub fn record(&mut self, pt: Point) -> bool {
        let first = self.position.is_none();
        self.position = Some(pt);
        self.visible = true;
        self.fade_due_ms = None;
        first
    }

    /// The pointer left the document (or the window lost focus).
    pub fn leave(&mut self) {
        self.visible = false;
        self.fade_due_ms = None;
    }

    /// Arm the foreign-content fade unless one is already pending.
    pub fn arm_fade(&mut self, due_ms: f64) {
        if self.fade_due_ms.is_none() {
            self.fade_due_ms = Some(due_ms);
        }
    }

    #[must_use]
    pub fn fade_due(&self) -> Option<f64> {
        self.fade_due_ms
    }

    /// Fire the fade if it is due. Returns whether the cursor was hidden.
    pub fn poll_fade(&mut self, now_ms: f64) -> bool {
        match self.fade_due_ms {
            Some(due) if due <= now_ms => {
                self.fade_due_ms = None;
                self.visible = false;
                true
            }
            _ => false,
        }
    }
}
