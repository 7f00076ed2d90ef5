//! Magnetic displacement and parallax.
//!
//! Both are pure functions of the pointer and the target box, recomputed
//! every frame while a target is active and never stored.

#[cfg(test)]
#[path = "magnet_test.rs"]
mod magnet_test;

use crate::geom::{Offset, Point, Rect};

/// Pull of a target toward the pointer.
///
/// `natural_center` is the center of the target's untransformed box. Each
/// axis is `(pointer - center) * strength`, clamped to `[-max, max]`.
#[must_use]
pub fn magnetic_offset(natural_center: Point, pointer: Point, strength: f64, max: f64) -> Offset {
    let max = max.abs();
    let axis = |delta: f64| {
        let v = delta * strength;
        if v.is_finite() { v.clamp(-max, max) } else { 0.0 }
    };
    Offset::new(axis(pointer.x - natural_center.x), axis(pointer.y - natural_center.y))
}

/// Parallax offset for the target's inner content.
///
/// The pointer's position within `rect` is normalized to `[0, 1]` per axis
/// (clamped when outside) and mapped to `(rel - 0.5) * 2 * max`: zero at the
/// center, `±max` at the edges. Degenerate boxes yield zero on that axis.
#[must_use]
pub fn parallax_offset(rect: Rect, pointer: Point, max: f64) -> Offset {
    let axis = |pos: f64, start: f64, len: f64| {
        if len <= 0.0 || !len.is_finite() {
            return 0.0;
        }
        let rel = ((pos - start) / len).clamp(0.0, 1.0);
        (rel - 0.5) * 2.0 * max
    };
    Offset::new(axis(pointer.x, rect.x, rect.width), axis(pointer.y, rect.y, rect.height))
}
