#![allow(clippy::float_cmp)]

use super::*;
use crate::geom::Rect;
use crate::testing::{Caret, FakeHost};

fn at(host: &mut FakeHost, x: f64, y: f64) -> Resolution {
    let pt = Point::new(x, y);
    let hit = host.element_at(pt);
    resolve(host, pt, hit)
}

fn card() -> Rect {
    Rect::new(0.0, 0.0, 200.0, 100.0)
}

fn inner() -> Rect {
    Rect::new(20.0, 20.0, 100.0, 40.0)
}

// =============================================================
// Fallback
// =============================================================

#[test]
fn empty_document_is_default() {
    let mut host = FakeHost::new();
    assert_eq!(at(&mut host, 10.0, 10.0), Resolution::default_mode(false));
}

#[test]
fn plain_element_is_default() {
    let mut host = FakeHost::new();
    host.add(None, card());
    assert_eq!(at(&mut host, 10.0, 10.0).mode, Mode::Default);
}

// =============================================================
// Marker priority
// =============================================================

#[test]
fn morph_marker_on_ancestor_targets_the_ancestor() {
    let mut host = FakeHost::new();
    let button = host.add_marked(None, card(), Marker::Morph);
    host.add(Some(button), inner());
    let res = at(&mut host, 30.0, 30.0);
    assert_eq!(res.mode, Mode::Morph);
    assert_eq!(res.target, Some(button));
}

#[test]
fn morph_beats_grow_in_either_nesting() {
    let mut host = FakeHost::new();
    let outer = host.add_marked(None, card(), Marker::Grow);
    let button = host.add_marked(Some(outer), inner(), Marker::Morph);
    assert_eq!(at(&mut host, 30.0, 30.0).target, Some(button));

    let mut host = FakeHost::new();
    let outer = host.add_marked(None, card(), Marker::Morph);
    host.add_marked(Some(outer), inner(), Marker::Grow);
    let res = at(&mut host, 30.0, 30.0);
    assert_eq!(res.mode, Mode::Morph);
    assert_eq!(res.target, Some(outer));
}

#[test]
fn morph_beats_morph_only() {
    let mut host = FakeHost::new();
    let el = host.add_marked(None, card(), Marker::MorphOnly);
    host.mark(el, Marker::Morph);
    assert_eq!(at(&mut host, 10.0, 10.0).mode, Mode::Morph);
}

#[test]
fn morph_only_beats_play() {
    let mut host = FakeHost::new();
    let video = host.add_marked(None, card(), Marker::Play);
    let chip = host.add_marked(Some(video), inner(), Marker::MorphOnly);
    let res = at(&mut host, 30.0, 30.0);
    assert_eq!(res.mode, Mode::MorphOnly);
    assert_eq!(res.target, Some(chip));
}

#[test]
fn play_beats_grow() {
    let mut host = FakeHost::new();
    let el = host.add_marked(None, card(), Marker::Grow);
    host.mark(el, Marker::Play);
    let res = at(&mut host, 10.0, 10.0);
    assert_eq!(res.mode, Mode::Play);
    assert_eq!(res.target, None, "play is not a morph mode");
}

#[test]
fn grow_beats_text() {
    let mut host = FakeHost::new();
    let section = host.add_marked(None, card(), Marker::Grow);
    host.add_text(Some(section), inner(), "Read more", "24px");
    assert_eq!(at(&mut host, 30.0, 30.0).mode, Mode::Grow);
}

#[test]
fn morph_beats_text() {
    let mut host = FakeHost::new();
    let button = host.add_marked(None, card(), Marker::Morph);
    host.add_text(Some(button), inner(), "Submit", "24px");
    let res = at(&mut host, 30.0, 30.0);
    assert_eq!(res.mode, Mode::Morph);
    assert_eq!(res.beam_height, None);
}

#[test]
fn morph_beats_play() {
    let mut host = FakeHost::new();
    let video = host.add_marked(None, card(), Marker::Play);
    let button = host.add_marked(Some(video), inner(), Marker::Morph);
    let res = at(&mut host, 30.0, 30.0);
    assert_eq!(res.mode, Mode::Morph);
    assert_eq!(res.target, Some(button));

    let mut host = FakeHost::new();
    let el = host.add_marked(None, card(), Marker::Play);
    host.mark(el, Marker::Morph);
    assert_eq!(at(&mut host, 10.0, 10.0).mode, Mode::Morph);
}

#[test]
fn morph_only_beats_grow() {
    let mut host = FakeHost::new();
    let outer = host.add_marked(None, card(), Marker::Grow);
    let chip = host.add_marked(Some(outer), inner(), Marker::MorphOnly);
    let res = at(&mut host, 30.0, 30.0);
    assert_eq!(res.mode, Mode::MorphOnly);
    assert_eq!(res.target, Some(chip));

    let mut host = FakeHost::new();
    let el = host.add_marked(None, card(), Marker::Grow);
    host.mark(el, Marker::MorphOnly);
    assert_eq!(at(&mut host, 10.0, 10.0).mode, Mode::MorphOnly);
}

#[test]
fn morph_only_beats_text() {
    let mut host = FakeHost::new();
    let chip = host.add_marked(None, card(), Marker::MorphOnly);
    host.add_text(Some(chip), inner(), "Tag", "24px");
    let res = at(&mut host, 30.0, 30.0);
    assert_eq!(res.mode, Mode::MorphOnly);
    assert_eq!(res.target, Some(chip));
    assert_eq!(res.beam_height, None);
}

#[test]
fn play_beats_text() {
    let mut host = FakeHost::new();
    let video = host.add_marked(None, card(), Marker::Play);
    host.add_text(Some(video), inner(), "Trailer", "24px");
    let res = at(&mut host, 30.0, 30.0);
    assert_eq!(res.mode, Mode::Play);
    assert_eq!(res.target, None);
    assert_eq!(res.beam_height, None);
}

#[test]
fn explicit_marker_wins_over_interactive_exclusion() {
    let mut host = FakeHost::new();
    let link = host.add_marked(None, card(), Marker::Interactive);
    host.mark(link, Marker::Grow);
    host.add_text(Some(link), inner(), "Docs", "24px");
    assert_eq!(at(&mut host, 30.0, 30.0).mode, Mode::Grow);
}

// =============================================================
// Text probe
// =============================================================

#[test]
fn live_text_is_text_beam() {
    let mut host = FakeHost::new();
    host.add_text(None, inner(), "Hello world", "24px");
    let res = at(&mut host, 30.0, 30.0);
    assert_eq!(res.mode, Mode::TextBeam);
    assert_eq!(res.target, None);
    assert_eq!(res.beam_height, Some(24.0));
}

#[test]
fn normal_line_height_uses_font_multiplier() {
    let mut host = FakeHost::new();
    host.add_text(None, inner(), "Hello", "normal");
    let res = at(&mut host, 30.0, 30.0);
    let height = res.beam_height.unwrap_or_default();
    assert!((height - 19.2).abs() < 1e-9);
}

#[test]
fn whitespace_only_text_is_default() {
    let mut host = FakeHost::new();
    host.add_text(None, inner(), " \n\t ", "24px");
    assert_eq!(at(&mut host, 30.0, 30.0).mode, Mode::Default);
}

#[test]
fn caret_snapping_to_distant_text_is_default() {
    let mut host = FakeHost::new();
    host.add(None, Rect::new(0.0, 0.0, 1000.0, 1000.0));
    host.add_text(None, inner(), "Far away", "24px");
    assert_eq!(at(&mut host, 800.0, 800.0).mode, Mode::Default);
}

#[test]
fn text_inside_interactive_is_default() {
    let mut host = FakeHost::new();
    let button = host.add_marked(None, card(), Marker::Interactive);
    host.add_text(Some(button), inner(), "Click", "24px");
    assert_eq!(at(&mut host, 30.0, 30.0).mode, Mode::Default);
}

#[test]
fn missing_caret_api_is_default() {
    let mut host = FakeHost::new();
    host.caret = Caret::Unavailable;
    host.add_text(None, inner(), "Hello", "24px");
    assert_eq!(at(&mut host, 30.0, 30.0).mode, Mode::Default);
}

#[test]
fn throwing_caret_probe_is_default() {
    let mut host = FakeHost::new();
    host.caret = Caret::Throws;
    host.add_text(None, inner(), "Hello", "24px");
    assert_eq!(at(&mut host, 30.0, 30.0).mode, Mode::Default);
}

// =============================================================
// Inversion
// =============================================================

#[test]
fn inverted_surface_is_reported_with_default() {
    let mut host = FakeHost::new();
    let dark = host.add_marked(None, card(), Marker::Invert);
    host.add(Some(dark), inner());
    let res = at(&mut host, 30.0, 30.0);
    assert_eq!(res.mode, Mode::Default);
    assert!(res.inverted);
}

#[test]
fn inverted_surface_is_reported_with_morph() {
    let mut host = FakeHost::new();
    let dark = host.add_marked(None, card(), Marker::Invert);
    host.add_marked(Some(dark), inner(), Marker::Morph);
    let res = at(&mut host, 30.0, 30.0);
    assert_eq!(res.mode, Mode::Morph);
    assert!(res.inverted);
}

#[test]
fn outside_inverted_surface_is_not_inverted() {
    let mut host = FakeHost::new();
    host.add_marked(None, inner(), Marker::Invert);
    assert!(!at(&mut host, 150.0, 90.0).inverted);
}
