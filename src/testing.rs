//! In-memory [`Host`] for unit tests.
//!
//! Elements form a tree with boxes, markers and optional text. Paint order is
//! insertion order, so a child added after its parent is hit first. Every
//! write is recorded on the element and counted in `writes`.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::HostError;
use crate::geom::{Offset, Point, Rect};
use crate::host::{
    ElementId, Host, OffsetProperty, RadiusHints, TextHit, TextStyle, Transform, Transition,
};
use crate::mode::Marker;

#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    pub parent: Option<ElementId>,
    pub markers: HashSet<Marker>,
    pub rect: Rect,
    pub connected: bool,
    pub foreign: bool,
    pub text: Option<String>,
    pub text_style: TextStyle,
    pub radius: RadiusHints,
    pub inline_cursor: bool,
    /// Transforms do not move the box (inline non-replaced element).
    pub inline: bool,
    pub transform: Option<Transform>,
    /// `None` until the engine first overrides the transition.
    pub transition: Option<Transition>,
    pub props: HashMap<OffsetProperty, Offset>,
    pub morphed: bool,
}

/// How the fake caret probe behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caret {
    /// Report the text under the point, or the nearest text anywhere.
    Snap,
    Unavailable,
    Throws,
}

#[derive(Debug)]
pub struct FakeHost {
    pub fine_pointer: bool,
    pub reduced_motion: bool,
    pub caret: Caret,
    pub elements: BTreeMap<ElementId, FakeElement>,
    pub cursor_hidden: bool,
    pub style_injections: usize,
    pub writes: usize,
    pub retained: Vec<ElementId>,
    next_id: u64,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self {
            fine_pointer: true,
            reduced_motion: false,
            caret: Caret::Snap,
            elements: BTreeMap::new(),
            cursor_hidden: false,
            style_injections: 0,
            writes: 0,
            retained: Vec::new(),
            next_id: 0,
        }
    }
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// A touch-only device.
    pub fn coarse() -> Self {
        Self { fine_pointer: false, ..Self::default() }
    }

    pub fn add(&mut self, parent: Option<ElementId>, rect: Rect) -> ElementId {
        self.next_id += 1;
        let id = ElementId(self.next_id);
        let el = FakeElement { parent, rect, connected: true, ..FakeElement::default() };
        self.elements.insert(id, el);
        id
    }

    /// Add an element carrying `marker`.
    pub fn add_marked(
        &mut self,
        parent: Option<ElementId>,
        rect: Rect,
        marker: Marker,
    ) -> ElementId {
        let id = self.add(parent, rect);
        self.mark(id, marker);
        id
    }

    /// Add a text-bearing element.
    pub fn add_text(
        &mut self,
        parent: Option<ElementId>,
        rect: Rect,
        text: &str,
        line_height: &str,
    ) -> ElementId {
        let id = self.add(parent, rect);
        if let Some(el) = self.elements.get_mut(&id) {
            el.text = Some(text.to_owned());
            el.text_style = TextStyle {
                line_height: line_height.to_owned(),
                font_size: "16px".to_owned(),
            };
        }
        id
    }

    pub fn mark(&mut self, id: ElementId, marker: Marker) {
        if let Some(el) = self.elements.get_mut(&id) {
            el.markers.insert(marker);
        }
    }

    pub fn unmark(&mut self, id: ElementId, marker: Marker) {
        if let Some(el) = self.elements.get_mut(&id) {
            el.markers.remove(&marker);
        }
    }

    /// Remove `id` and its descendants from the document.
    pub fn detach(&mut self, id: ElementId) {
        let doomed: Vec<ElementId> = self
            .elements
            .keys()
            .copied()
            .filter(|candidate| self.descends_from(*candidate, id))
            .collect();
        for el in doomed {
            if let Some(el) = self.elements.get_mut(&el) {
                el.connected = false;
            }
        }
    }

    /// Move an element's untransformed box (scroll, resize, reflow).
    pub fn set_rect(&mut self, id: ElementId, rect: Rect) {
        if let Some(el) = self.elements.get_mut(&id) {
            el.rect = rect;
        }
    }

    /// Snapshot of an element; a default element for unknown ids.
    pub fn el(&self, id: ElementId) -> FakeElement {
        self.elements.get(&id).cloned().unwrap_or_default()
    }

    pub fn el_mut(&mut self, id: ElementId) -> Option<&mut FakeElement> {
        self.elements.get_mut(&id)
    }

    fn descends_from(&self, mut candidate: ElementId, ancestor: ElementId) -> bool {
        loop {
            if candidate == ancestor {
                return true;
            }
            match self.elements.get(&candidate).and_then(|el| el.parent) {
                Some(parent) => candidate = parent,
                None => return false,
            }
        }
    }

    fn topmost(&self, pt: Point, pred: impl Fn(&FakeElement) -> bool) -> Option<ElementId> {
        self.elements
            .iter()
            .rev()
            .find(|(_, el)| el.connected && pred(el) && transformed(el).contains(pt))
            .map(|(id, _)| *id)
    }

    fn write(&mut self) {
        self.writes += 1;
    }
}

fn transformed(el: &FakeElement) -> Rect {
    match el.transform.filter(|_| !el.inline) {
        Some(t) => {
            let center = el.rect.center().offset_by(t.translate);
            let (w, h) = (el.rect.width * t.scale, el.rect.height * t.scale);
            Rect::new(center.x - w * 0.5, center.y - h * 0.5, w, h)
        }
        None => el.rect,
    }
}

impl Host for FakeHost {
    fn has_fine_pointer(&self) -> bool {
        self.fine_pointer
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn element_at(&mut self, pt: Point) -> Option<ElementId> {
        self.topmost(pt, |_| true)
    }

    fn closest(&mut self, el: ElementId, marker: Marker) -> Option<ElementId> {
        let mut current = Some(el);
        while let Some(id) = current {
            let node = self.elements.get(&id)?;
            if node.markers.contains(&marker) {
                return Some(id);
            }
            current = node.parent;
        }
        None
    }

    fn matches(&self, el: ElementId, marker: Marker) -> bool {
        self.elements.get(&el).is_some_and(|node| node.markers.contains(&marker))
    }

    fn is_connected(&self, el: ElementId) -> bool {
        self.elements.get(&el).is_some_and(|node| node.connected)
    }

    fn is_foreign_content(&self, el: ElementId) -> bool {
        self.elements.get(&el).is_some_and(|node| node.foreign)
    }

    fn bounding_rect(&self, el: ElementId) -> Option<Rect> {
        self.elements.get(&el).filter(|node| node.connected).map(transformed)
    }

    fn caret_text_at(&mut self, pt: Point) -> Result<Option<TextHit>, HostError> {
        match self.caret {
            Caret::Unavailable => return Err(HostError::CaretUnavailable),
            Caret::Throws => return Err(HostError::CaretProbe("boom".to_owned())),
            Caret::Snap => {}
        }
        let under = self.topmost(pt, |el| el.text.is_some());
        let nearest = || {
            self.elements
                .iter()
                .filter(|(_, el)| el.connected && el.text.is_some())
                .min_by(|(_, a), (_, b)| {
                    distance(a.rect.center(), pt).total_cmp(&distance(b.rect.center(), pt))
                })
                .map(|(id, _)| *id)
        };
        let hit = under.or_else(nearest).and_then(|id| {
            let text = self.elements.get(&id)?.text.clone()?;
            Some(TextHit { element: id, text })
        });
        Ok(hit)
    }

    fn text_style(&self, el: ElementId) -> TextStyle {
        self.elements.get(&el).map(|node| node.text_style.clone()).unwrap_or_default()
    }

    fn radius_hints(&self, el: ElementId) -> RadiusHints {
        self.elements.get(&el).map(|node| node.radius.clone()).unwrap_or_default()
    }

    fn set_transform(&mut self, el: ElementId, transform: Option<Transform>) {
        self.write();
        if let Some(node) = self.elements.get_mut(&el) {
            node.transform = transform;
        }
    }

    fn set_transition(&mut self, el: ElementId, transition: Transition) {
        self.write();
        if let Some(node) = self.elements.get_mut(&el) {
            node.transition = Some(transition);
        }
    }

    fn set_offset_property(
        &mut self,
        el: ElementId,
        property: OffsetProperty,
        value: Option<Offset>,
    ) {
        self.write();
        if let Some(node) = self.elements.get_mut(&el) {
            match value {
                Some(v) => node.props.insert(property, v),
                None => node.props.remove(&property),
            };
        }
    }

    fn set_morphed_marker(&mut self, el: ElementId, on: bool) {
        self.write();
        if let Some(node) = self.elements.get_mut(&el) {
            node.morphed = on;
        }
    }

    fn strip_inline_cursor(&mut self, el: ElementId) {
        let had = self.elements.get(&el).is_some_and(|node| node.inline_cursor);
        if had {
            self.write();
            if let Some(node) = self.elements.get_mut(&el) {
                node.inline_cursor = false;
            }
        }
    }

    fn set_native_cursor_hidden(&mut self, hidden: bool) {
        if hidden && !self.cursor_hidden {
            self.style_injections += 1;
        }
        self.cursor_hidden = hidden;
    }

    fn retain_handles(&mut self, live: &[ElementId]) {
        self.retained = live.to_vec();
    }
}

fn distance(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}
