//! Engine tunables.
//!
//! Every field has a default, so a config can be built from a partial JSON
//! object (`{"magneticMaxPx": 8}`) or from nothing at all.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    BEAM_WIDTH, DEFAULT_SIZE, FOREIGN_FADE_MS, GROW_SIZE, LIFT_SCALE, MAGNETIC_MAX_PX,
    MAGNETIC_STRENGTH, PARALLAX_MAX_PX, PLAY_SIZE, RELEASE_MS,
};
use crate::error::ConfigError;
use crate::spring::SpringConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CursorConfig {
    /// Fraction of the center-to-pointer vector used as displacement.
    pub magnetic_strength: f64,
    /// Per-axis cap on displacement, px.
    pub magnetic_max_px: f64,
    /// Scale applied to a displaced element.
    pub lift_scale: f64,
    /// Per-axis cap on parallax, px.
    pub parallax_max_px: f64,
    /// Duration of the eased release; the morphed marker goes after it.
    pub release_ms: f64,
    /// Delay before fading out over an iframe or other embed.
    pub foreign_fade_ms: f64,
    pub default_size: f64,
    pub grow_size: f64,
    pub play_size: f64,
    pub beam_width: f64,
    /// Gap between a morph target's box and the cursor outline.
    pub morph_padding: f64,
    /// Position channels.
    pub follow: SpringConfig,
    /// Size and radius channels.
    pub morph: SpringConfig,
    /// Opacity channel.
    pub fade: SpringConfig,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            magnetic_strength: MAGNETIC_STRENGTH,
            magnetic_max_px: MAGNETIC_MAX_PX,
            lift_scale: LIFT_SCALE,
            parallax_max_px: PARALLAX_MAX_PX,
            release_ms: RELEASE_MS,
            foreign_fade_ms: FOREIGN_FADE_MS,
            default_size: DEFAULT_SIZE,
            grow_size: GROW_SIZE,
            play_size: PLAY_SIZE,
            beam_width: BEAM_WIDTH,
            morph_padding: 0.0,
            follow: SpringConfig::FOLLOW,
            morph: SpringConfig::MORPH,
            fade: SpringConfig::FADE,
        }
    }
}

impl CursorConfig {
    /// Parse and validate a JSON config object. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::OutOfRange`] for values that fail [`Self::validate`].
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field is finite and within range.
    ///
    /// # Errors
    ///
    /// Returns the first offending field as [`ConfigError::OutOfRange`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        check("magneticStrength", "within [0, 1]", self.magnetic_strength, |v| {
            (0.0..=1.0).contains(&v)
        })?;
        check("liftScale", "at least 1", self.lift_scale, |v| v >= 1.0)?;
        let non_negative = [
            ("magneticMaxPx", self.magnetic_max_px),
            ("parallaxMaxPx", self.parallax_max_px),
            ("releaseMs", self.release_ms),
            ("foreignFadeMs", self.foreign_fade_ms),
            ("defaultSize", self.default_size),
            ("growSize", self.grow_size),
            ("playSize", self.play_size),
            ("beamWidth", self.beam_width),
            ("morphPadding", self.morph_padding),
        ];
        for (field, value) in non_negative {
            check(field, "a non-negative number", value, |v| v >= 0.0)?;
        }
        let springs = [("follow", &self.follow), ("morph", &self.morph), ("fade", &self.fade)];
        for (name, spring) in springs {
            spring.validate(name)?;
        }
        Ok(())
    }
}

pub(crate) fn check(
    field: &'static str,
    requirement: &'static str,
    value: f64,
    ok: impl Fn(f64) -> bool,
) -> Result<(), ConfigError> {
    if value.is_finite() && ok(value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, requirement, value })
    }
}
