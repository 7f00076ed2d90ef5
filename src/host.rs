//! The seam between the engine and the document.
//!
//! [`Host`] is everything the engine needs from a DOM: hit-testing,
//! ancestor/marker queries, geometry, the caret probe, and a handful of
//! narrowly-scoped writes. The browser implementation lives in
//! [`crate::web`]; tests drive the engine with an in-memory fake.
//!
//! Elements are referred to by [`ElementId`], an opaque handle issued by the
//! host. Queries may issue fresh handles freely; after each event or frame
//! the engine calls [`Host::retain_handles`] with the handles it still holds
//! (active target plus pending cleanups), so the host's element registry
//! never outlives the engine's interest in an element.

use crate::error::HostError;
use crate::geom::{Offset, Point, Rect};
use crate::mode::Marker;

/// Stable opaque handle for a DOM element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

/// Element under the native caret at a point.
#[derive(Debug, Clone, PartialEq)]
pub struct TextHit {
    /// The element owning the text node.
    pub element: ElementId,
    /// Content of the text node.
    pub text: String,
}

/// Raw computed text metrics, exactly as the style system reports them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextStyle {
    pub line_height: String,
    pub font_size: String,
}

/// Raw inputs for a target's corner radius.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RadiusHints {
    /// Value of the explicit override attribute, if present.
    pub attribute: Option<String>,
    /// Computed `border-top-left-radius`.
    pub computed: Option<String>,
}

/// Magnetic translation plus uniform lift applied to a hovered element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translate: Offset,
    pub scale: f64,
}

/// Inline transition state of a displaced element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// Transitions off so the element tracks the pointer 1:1.
    Suspended,
    /// Eased spring-back toward the authored transform.
    Release { duration_ms: f64 },
    /// Inline override removed; the element's own styles apply.
    Authored,
}

/// Which pair of numeric custom properties to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OffsetProperty {
    /// `--cursor-parallax-x/y`, read by inner content.
    Parallax,
    /// `--cursor-magnet-x/y`, the soft magnetic offset.
    Magnet,
}

/// Document access used by the engine.
pub trait Host {
    // --- Environment ---

    /// Whether the primary pointer is fine (mouse, trackpad, pen hover).
    fn has_fine_pointer(&self) -> bool;

    /// Whether the user asked for reduced motion.
    fn prefers_reduced_motion(&self) -> bool;

    // --- Queries ---

    /// Topmost element at `pt`.
    fn element_at(&mut self, pt: Point) -> Option<ElementId>;

    /// `el` itself or its nearest ancestor carrying `marker`.
    fn closest(&mut self, el: ElementId, marker: Marker) -> Option<ElementId>;

    /// Whether `el` itself carries `marker`.
    fn matches(&self, el: ElementId, marker: Marker) -> bool;

    /// Whether `el` is still attached to the document.
    fn is_connected(&self, el: ElementId) -> bool;

    /// Whether `el` is foreign embedded content that swallows pointer events.
    fn is_foreign_content(&self, el: ElementId) -> bool;

    /// Current (transformed) bounding box; `None` once detached.
    fn bounding_rect(&self, el: ElementId) -> Option<Rect>;

    /// Text node under the native caret at `pt`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if no caret API exists or the probe throws.
    fn caret_text_at(&mut self, pt: Point) -> Result<Option<TextHit>, HostError>;

    fn text_style(&self, el: ElementId) -> TextStyle;

    fn radius_hints(&self, el: ElementId) -> RadiusHints;

    // --- Writes ---

    /// Apply (`Some`) or clear (`None`) the inline transform.
    fn set_transform(&mut self, el: ElementId, transform: Option<Transform>);

    fn set_transition(&mut self, el: ElementId, transition: Transition);

    /// Write (`Some`) or remove (`None`) a custom-property pair.
    fn set_offset_property(
        &mut self,
        el: ElementId,
        property: OffsetProperty,
        value: Option<Offset>,
    );

    fn set_morphed_marker(&mut self, el: ElementId, on: bool);

    /// Remove an author-set inline `cursor` style, if any.
    fn strip_inline_cursor(&mut self, el: ElementId);

    /// Install or remove the document-wide rule hiding the platform pointer.
    fn set_native_cursor_hidden(&mut self, hidden: bool);

    /// Drop every handle not listed in `live`. Dropped ids must not be used
    /// again.
    fn retain_handles(&mut self, live: &[ElementId]);
}
