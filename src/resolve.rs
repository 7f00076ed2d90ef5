//! Classification of the element under the pointer into a cursor mode.
//!
//! Priority is the order of [`RESOLUTION_ORDER`] followed by the text probe
//! and finally `default`. Whether the point is over an inverted surface is
//! reported alongside, independent of the chosen mode.

#[cfg(test)]
#[path = "resolve_test.rs"]
mod resolve_test;

use crate::css;
use crate::error::HostError;
use crate::geom::Point;
use crate::host::{ElementId, Host};
use crate::mode::{Marker, Mode, RESOLUTION_ORDER};

/// Outcome of resolving one pointer position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub mode: Mode,
    /// The element to conform to; set for morph modes only.
    pub target: Option<ElementId>,
    /// Caret height for [`Mode::TextBeam`].
    pub beam_height: Option<f64>,
    /// Pointer is over an inverted-contrast region.
    pub inverted: bool,
}

impl Resolution {
    #[must_use]
    pub fn default_mode(inverted: bool) -> Self {
        Self { mode: Mode::Default, target: None, beam_height: None, inverted }
    }
}

/// Resolve `pt`, whose topmost element is `hit`.
pub fn resolve<H: Host>(host: &mut H, pt: Point, hit: Option<ElementId>) -> Resolution {
    let inverted = match hit {
        Some(el) => host.closest(el, Marker::Invert).is_some(),
        None => false,
    };

    if let Some(el) = hit {
        for (marker, mode) in RESOLUTION_ORDER {
            if let Some(found) = host.closest(el, marker) {
                let target = mode.is_morph().then_some(found);
                return Resolution { mode, target, beam_height: None, inverted };
            }
        }
    }

    match probe_text(host, pt) {
        Some(height) => {
            Resolution { mode: Mode::TextBeam, target: None, beam_height: Some(height), inverted }
        }
        None => Resolution::default_mode(inverted),
    }
}

/// Beam height if `pt` is over live, non-interactive text.
///
/// Caret APIs snap to the nearest text even far from any glyph, so the hit
/// is only accepted when `pt` is inside the owning element's box.
fn probe_text<H: Host>(host: &mut H, pt: Point) -> Option<f64> {
    let hit = match host.caret_text_at(pt) {
        Ok(Some(hit)) => hit,
        Ok(None) => return None,
        Err(HostError::CaretUnavailable) => return None,
        Err(err) => {
            tracing::warn!(%err, "caret probe failed; treating as no text");
            return None;
        }
    };
    if hit.text.trim().is_empty() {
        return None;
    }
    let rect = host.bounding_rect(hit.element)?;
    if !rect.contains(pt) {
        return None;
    }
    if host.closest(hit.element, Marker::Interactive).is_some() {
        return None;
    }
    Some(css::beam_height(&host.text_style(hit.element)))
}
