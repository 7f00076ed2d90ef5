//! Damped spring channels.
//!
//! Each animated output (x, y, width, height, radius, opacity) is an
//! independent second-order filter chasing its target value. Steps use the
//! closed-form solution of the damped harmonic oscillator, so results do not
//! depend on frame rate and a channel with damping ratio >= 1 released from
//! rest never overshoots.

#[cfg(test)]
#[path = "spring_test.rs"]
mod spring_test;

use serde::{Deserialize, Serialize};

use crate::config::check;
use crate::error::ConfigError;
use crate::geom::Point;
use crate::mode::Shape;

/// Below this distance and speed a channel snaps to its target and rests.
const REST_EPSILON: f64 = 1e-3;

/// Tolerance around a damping ratio of exactly 1.
const CRITICAL_EPSILON: f64 = 1e-6;

/// Physical parameters of a spring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::MORPH
    }
}

impl SpringConfig {
    /// Soft, slightly underdamped trailing for position.
    pub const FOLLOW: Self = Self { stiffness: 170.0, damping: 22.0, mass: 1.0 };
    /// Critically damped snapping for size and radius.
    pub const MORPH: Self = Self { stiffness: 420.0, damping: 41.0, mass: 1.0 };
    /// Quick fade for opacity.
    pub const FADE: Self = Self { stiffness: 300.0, damping: 35.0, mass: 1.0 };

    /// ζ = c / (2·√(k·m)).
    #[must_use]
    pub fn damping_ratio(&self) -> f64 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }

    /// ω = √(k/m), radians per second.
    #[must_use]
    pub fn natural_frequency(&self) -> f64 {
        (self.stiffness / self.mass).sqrt()
    }

    pub(crate) fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        check(field, "a spring with positive stiffness", self.stiffness, |v| v > 0.0)?;
        check(field, "a spring with positive mass", self.mass, |v| v > 0.0)?;
        check(field, "a spring with non-negative damping", self.damping, |v| v >= 0.0)
    }
}

/// One animated value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringChannel {
    target: f64,
    current: f64,
    velocity: f64,
    config: SpringConfig,
}

impl SpringChannel {
    /// A channel resting at `value`.
    #[must_use]
    pub fn new(value: f64, config: SpringConfig) -> Self {
        Self { target: value, current: value, velocity: 0.0, config }
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.current
    }

    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.current == self.target && self.velocity == 0.0
    }

    /// Retarget the channel; motion continues from the current state.
    /// Returns whether the target changed.
    pub fn set_target(&mut self, target: f64) -> bool {
        if !target.is_finite() || target == self.target {
            return false;
        }
        self.target = target;
        true
    }

    /// Place the channel at rest on `value`.
    pub fn jump(&mut self, value: f64) {
        if value.is_finite() {
            self.target = value;
            self.current = value;
            self.velocity = 0.0;
        }
    }

    /// Advance by `dt` seconds.
    pub fn step(&mut self, dt: f64) {
        if !(dt > 0.0 && dt.is_finite()) {
            return;
        }
        let x0 = self.current - self.target;
        let v0 = self.velocity;
        let omega = self.config.natural_frequency();
        let zeta = self.config.damping_ratio();
        let at_rest = x0.abs() < REST_EPSILON && v0.abs() < REST_EPSILON;
        if at_rest || !(omega > 0.0 && omega.is_finite()) {
            self.current = self.target;
            self.velocity = 0.0;
            return;
        }

        let (x, v) = if zeta < 1.0 - CRITICAL_EPSILON {
            let omega_d = omega * (1.0 - zeta * zeta).sqrt();
            let decay = (-zeta * omega * dt).exp();
            let b = (v0 + zeta * omega * x0) / omega_d;
            let (sin, cos) = (omega_d * dt).sin_cos();
            let envelope = x0 * cos + b * sin;
            let x = decay * envelope;
            let v = decay * (-zeta * omega * envelope + omega_d * (b * cos - x0 * sin));
            (x, v)
        } else if zeta <= 1.0 + CRITICAL_EPSILON {
            let b = v0 + omega * x0;
            let decay = (-omega * dt).exp();
            let x = (x0 + b * dt) * decay;
            let v = (b - omega * (x0 + b * dt)) * decay;
            (x, v)
        } else {
            let root = (zeta * zeta - 1.0).sqrt();
            let r1 = -omega * (zeta - root);
            let r2 = -omega * (zeta + root);
            let c1 = (v0 - r2 * x0) / (r1 - r2);
            let c2 = x0 - c1;
            let (e1, e2) = ((r1 * dt).exp(), (r2 * dt).exp());
            (c1 * e1 + c2 * e2, c1 * r1 * e1 + c2 * r2 * e2)
        };

        self.current = self.target + x;
        self.velocity = v;
    }
}

/// The six output channels, each with its own tuning.
#[derive(Debug, Clone, Copy)]
pub struct SpringSet {
    pub x: SpringChannel,
    pub y: SpringChannel,
    pub width: SpringChannel,
    pub height: SpringChannel,
    pub radius: SpringChannel,
    pub opacity: SpringChannel,
}

impl SpringSet {
    /// Channels at rest on `shape`, fully transparent.
    #[must_use]
    pub fn new(
        shape: Shape,
        follow: SpringConfig,
        morph: SpringConfig,
        fade: SpringConfig,
    ) -> Self {
        Self {
            x: SpringChannel::new(shape.x, follow),
            y: SpringChannel::new(shape.y, follow),
            width: SpringChannel::new(shape.width, morph),
            height: SpringChannel::new(shape.height, morph),
            radius: SpringChannel::new(shape.radius, morph),
            opacity: SpringChannel::new(0.0, fade),
        }
    }

    /// Retarget position, size and radius. Returns whether anything changed.
    pub fn push_shape(&mut self, shape: Shape) -> bool {
        // Non-short-circuiting: every channel must be retargeted.
        self.x.set_target(shape.x)
            | self.y.set_target(shape.y)
            | self.width.set_target(shape.width)
            | self.height.set_target(shape.height)
            | self.radius.set_target(shape.radius)
    }

    pub fn set_opacity(&mut self, opacity: f64) -> bool {
        self.opacity.set_target(opacity.clamp(0.0, 1.0))
    }

    /// Put the position channels at rest on `pt`.
    pub fn jump_position(&mut self, pt: Point) {
        self.x.jump(pt.x);
        self.y.jump(pt.y);
    }

    pub fn step(&mut self, dt: f64) {
        for channel in [
            &mut self.x,
            &mut self.y,
            &mut self.width,
            &mut self.height,
            &mut self.radius,
            &mut self.opacity,
        ] {
            channel.step(dt);
        }
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        [self.x, self.y, self.width, self.height, self.radius, self.opacity]
            .iter()
            .all(SpringChannel::is_settled)
    }
}
