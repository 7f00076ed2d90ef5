//! Cursor modes, the DOM capability markers that select them, and the shape
//! each mode gives the cursor.
//!
//! The resolver walks [`RESOLUTION_ORDER`] top to bottom; the first marker
//! found on an ancestor of the hit element wins. Text detection and the
//! `default` fallback come after the table.

#[cfg(test)]
#[path = "mode_test.rs"]
mod mode_test;

use serde::{Deserialize, Serialize};

use crate::config::CursorConfig;
use crate::geom::{Point, Rect};

/// The discrete visual state of the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    /// Small dot following the pointer.
    #[default]
    Default,
    /// Conformed to a target which also gets a magnetic pull and lift.
    Morph,
    /// Conformed to a target whose own transform is left alone.
    MorphOnly,
    /// Enlarged disc.
    Grow,
    /// Thin vertical caret over live text.
    TextBeam,
    /// Large disc for media controls.
    Play,
}

impl Mode {
    /// Whether the cursor takes its shape from a live target element.
    #[must_use]
    pub fn is_morph(self) -> bool {
        matches!(self, Self::Morph | Self::MorphOnly)
    }

    /// Whether the hovered element itself receives a transform.
    #[must_use]
    pub fn displaces_target(self) -> bool {
        matches!(self, Self::Morph)
    }

    /// The marker an element must keep carrying to stay this mode's target.
    #[must_use]
    pub fn marker(self) -> Option<Marker> {
        RESOLUTION_ORDER
            .iter()
            .find(|(_, mode)| *mode == self)
            .map(|(marker, _)| *marker)
    }
}

/// A capability an element opts into through the DOM attribute contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    Morph,
    MorphOnly,
    Play,
    Grow,
    /// Dark / inverted-contrast surface; affects color only.
    Invert,
    /// Native interactive element (button, link, disclosure).
    Interactive,
}

impl Marker {
    /// CSS selector the browser host uses for this marker.
    #[must_use]
    pub fn selector(self) -> &'static str {
        use crate::consts::{
            GROW_SELECTOR, INTERACTIVE_SELECTOR, INVERT_SELECTOR, MORPH_ONLY_SELECTOR,
            MORPH_SELECTOR, PLAY_SELECTOR,
        };
        match self {
            Self::Morph => MORPH_SELECTOR,
            Self::MorphOnly => MORPH_ONLY_SELECTOR,
            Self::Play => PLAY_SELECTOR,
            Self::Grow => GROW_SELECTOR,
            Self::Invert => INVERT_SELECTOR,
            Self::Interactive => INTERACTIVE_SELECTOR,
        }
    }
}

/// Marker-driven modes in priority order.
pub const RESOLUTION_ORDER: [(Marker, Mode); 4] = [
    (Marker::Morph, Mode::Morph),
    (Marker::MorphOnly, Mode::MorphOnly),
    (Marker::Play, Mode::Play),
    (Marker::Grow, Mode::Grow),
];

/// Target values for the position/size/radius spring channels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shape {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub radius: f64,
}

impl Shape {
    /// A shape centered on `center`.
    #[must_use]
    pub fn centered(center: Point, width: f64, height: f64, radius: f64) -> Self {
        Self { x: center.x, y: center.y, width, height, radius }
    }

    /// Cursor shape for a fixed-size mode at the pointer.
    ///
    /// `beam_height` is only read for [`Mode::TextBeam`]. Morph modes have no
    /// fixed shape and fall back to the default dot; use [`Shape::conform`].
    #[must_use]
    pub fn for_pointer(
        mode: Mode,
        pointer: Point,
        beam_height: f64,
        config: &CursorConfig,
    ) -> Self {
        match mode {
            Mode::Grow => Self::disc(pointer, config.grow_size),
            Mode::Play => Self::disc(pointer, config.play_size),
            Mode::TextBeam => {
                let width = config.beam_width;
                Self::centered(pointer, width, beam_height, width * 0.5)
            }
            Mode::Default | Mode::Morph | Mode::MorphOnly => {
                Self::disc(pointer, config.default_size)
            }
        }
    }

    /// Cursor shape hugging a target's box.
    #[must_use]
    pub fn conform(rect: Rect, radius: f64, padding: f64) -> Self {
        let outer = rect.inflate(padding);
        let radius = (radius + padding).clamp(0.0, outer.short_side().max(0.0) * 0.5);
        Self::centered(outer.center(), outer.width, outer.height, radius)
    }

    fn disc(center: Point, size: f64) -> Self {
        Self::centered(center, size, size, size * 0.5)
    }
}
