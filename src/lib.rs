//! Custom pointer engine: a rendered cursor that reshapes itself to whatever
//! interactive element it hovers.
//!
//! The engine owns the full hover lifecycle: tracking raw pointer input,
//! resolving the element under the pointer into a cursor [`mode::Mode`],
//! morphing onto targets (with a bounded magnetic pull and inner parallax),
//! re-measuring the active target every animation frame, and smoothing every
//! output value through spring channels. It never paints anything itself; a
//! renderer reads the [`output::CursorOutput`] snapshot each frame.
//!
//! All logic runs against the [`host::Host`] trait so it can be exercised
//! without a browser. The `web` feature adds [`web`], which implements the
//! host on top of the real DOM and wires events and the frame loop.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level [`engine::CursorEngine`]: lifecycle, events, frame tick |
//! | [`machine`] | Active mode / morph target and the adopt/release transitions |
//! | [`resolve`] | Hit-test classification into a mode by ordered priority |
//! | [`mode`] | The six cursor modes, capability markers, per-mode shapes |
//! | [`magnet`] | Magnetic displacement and parallax calculators |
//! | [`spring`] | Damped spring channels for every animated output |
//! | [`cleanup`] | Per-element release deadlines |
//! | [`pointer`] | Raw pointer state, visibility and foreign-content fade |
//! | [`host`] | The DOM seam and element handles |
//! | [`css`] | Parsing of computed CSS lengths (radius, line height) |
//! | [`geom`] | Points, rects, offsets |
//! | [`config`] | Tunables and their validation |
//! | [`output`] | The snapshot read by renderers |
//! | [`consts`] | Defaults and DOM contract names |

pub mod cleanup;
pub mod config;
pub mod consts;
pub mod css;
pub mod engine;
pub mod error;
pub mod geom;
pub mod host;
pub mod magnet;
pub mod machine;
pub mod mode;
pub mod output;
pub mod pointer;
pub mod resolve;
pub mod spring;

#[cfg(feature = "web")]
pub mod web;

#[cfg(test)]
pub(crate) mod testing;

pub use config::CursorConfig;
pub use engine::CursorEngine;
pub use host::{ElementId, Host};
pub use mode::Mode;
pub use output::CursorOutput;
