//! Shared constants: tuning defaults and the DOM attribute contract.

// ── Magnetic / parallax ─────────────────────────────────────────

/// Fraction of the center-to-pointer vector applied as displacement.
pub const MAGNETIC_STRENGTH: f64 = 0.2;

/// Per-axis cap on magnetic displacement, in CSS pixels.
pub const MAGNETIC_MAX_PX: f64 = 6.0;

/// Uniform scale applied to a magnetically displaced element.
pub const LIFT_SCALE: f64 = 1.04;

/// Per-axis cap on the parallax offset exposed to inner content.
pub const PARALLAX_MAX_PX: f64 = 4.0;

// ── Timing ──────────────────────────────────────────────────────

/// Eased release duration; the morphed marker is removed after this.
pub const RELEASE_MS: f64 = 350.0;

/// Grace period before fading out over foreign embedded content.
pub const FOREIGN_FADE_MS: f64 = 120.0;

/// Largest frame delta fed to the springs, in milliseconds.
pub const MAX_FRAME_DT_MS: f64 = 64.0;

/// Easing curve used by the release transition.
pub const RELEASE_EASING: &str = "cubic-bezier(0.22, 1, 0.36, 1)";

// ── Shapes ──────────────────────────────────────────────────────

pub const DEFAULT_SIZE: f64 = 16.0;
pub const GROW_SIZE: f64 = 56.0;
pub const PLAY_SIZE: f64 = 88.0;
pub const BEAM_WIDTH: f64 = 2.0;

/// Line-height multiplier used when the computed value is `normal`.
pub const NORMAL_LINE_HEIGHT: f64 = 1.2;

/// Font size assumed when none can be read.
pub const FALLBACK_FONT_SIZE_PX: f64 = 16.0;

// ── DOM contract ────────────────────────────────────────────────

pub const MORPH_SELECTOR: &str = "[data-cursor-morph]";
pub const MORPH_ONLY_SELECTOR: &str = "[data-cursor-morph-only]";
pub const PLAY_SELECTOR: &str = "[data-cursor-play]";
pub const GROW_SELECTOR: &str = "[data-cursor-grow]";
pub const INVERT_SELECTOR: &str = "[data-cursor-invert]";
pub const INTERACTIVE_SELECTOR: &str =
    "button, a[href], [role=\"button\"], summary, details, label, select";

/// Optional per-element corner radius override.
pub const RADIUS_ATTR: &str = "data-cursor-radius";

/// Present on an element while the cursor is conformed to it.
pub const MORPHED_ATTR: &str = "data-cursor-morphed";

pub const PARALLAX_X_PROP: &str = "--cursor-parallax-x";
pub const PARALLAX_Y_PROP: &str = "--cursor-parallax-y";
pub const MAGNET_X_PROP: &str = "--cursor-magnet-x";
pub const MAGNET_Y_PROP: &str = "--cursor-magnet-y";

/// Id of the injected style element hiding the platform pointer.
pub const HIDE_CURSOR_STYLE_ID: &str = "cursor-engine-hide-native";

pub const HIDE_CURSOR_CSS: &str = "*, *::before, *::after { cursor: none !important; }";

/// Tag names treated as foreign embedded content.
pub const FOREIGN_TAGS: [&str; 3] = ["IFRAME", "EMBED", "OBJECT"];
