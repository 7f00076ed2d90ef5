//! Parsing of the computed CSS values the engine reads back from targets.
//!
//! Hosts hand over raw strings (`"12px"`, `"normal"`, `"50%"`); turning them
//! into pixels happens here so the rules are the same for every host.

#[cfg(test)]
#[path = "css_test.rs"]
mod css_test;

use crate::consts::{FALLBACK_FONT_SIZE_PX, NORMAL_LINE_HEIGHT};
use crate::geom::Rect;
use crate::host::{RadiusHints, TextStyle};

/// A parsed CSS length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Px(f64),
    Percent(f64),
    /// Unitless number (line-height multipliers, bare attribute values).
    Number(f64),
}

/// Parse the first length in `raw`.
///
/// Multi-value radii (`"8px 4px"`) use the first component.
#[must_use]
pub fn parse_length(raw: &str) -> Option<Length> {
    let first = raw.split_whitespace().next()?;
    let (number, ctor): (&str, fn(f64) -> Length) = if let Some(n) = first.strip_suffix("px") {
        (n, Length::Px)
    } else if let Some(n) = first.strip_suffix('%') {
        (n, Length::Percent)
    } else {
        (first, Length::Number)
    };
    let Ok(value) = number.parse::<f64>() else {
        return None;
    };
    value.is_finite().then(|| ctor(value))
}

/// Corner radius of a target in pixels.
///
/// The override attribute wins when it holds a number or `px` length;
/// otherwise the computed radius is used. Percentages resolve against the
/// short side. The result is clamped to `[0, short_side / 2]`.
#[must_use]
pub fn corner_radius(hints: &RadiusHints, rect: Rect) -> f64 {
    let from_attr = hints.attribute.as_deref().and_then(parse_length).and_then(|len| match len {
        Length::Px(v) | Length::Number(v) => Some(v),
        Length::Percent(_) => None,
    });
    let from_computed = || {
        hints.computed.as_deref().and_then(parse_length).map(|len| match len {
            Length::Px(v) | Length::Number(v) => v,
            Length::Percent(p) => rect.short_side() * p / 100.0,
        })
    };
    let radius = from_attr.or_else(from_computed).unwrap_or(0.0);
    radius.clamp(0.0, rect.short_side().max(0.0) * 0.5)
}

/// Height of the text beam for an element's computed text style.
#[must_use]
pub fn beam_height(style: &TextStyle) -> f64 {
    let font_size = match parse_length(&style.font_size) {
        Some(Length::Px(v)) if v > 0.0 => v,
        _ => FALLBACK_FONT_SIZE_PX,
    };
    match parse_length(&style.line_height) {
        Some(Length::Px(v)) if v > 0.0 => v,
        Some(Length::Number(m)) if m > 0.0 => m * font_size,
        Some(Length::Percent(p)) if p > 0.0 => p / 100.0 * font_size,
        // `normal` and anything unreadable.
        _ => NORMAL_LINE_HEIGHT * font_size,
    }
}
