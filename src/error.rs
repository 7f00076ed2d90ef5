//! Error types shared by the core and the browser binding.
//!
//! Event and frame entry points never return these; host failures degrade to
//! the `default` mode instead. Errors only surface from configuration parsing
//! and, in the browser binding, from mounting.

/// Failure reported by a [`crate::host::Host`] query.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// Neither caret-at-point variant exists in this environment.
    #[error("caret-at-point probe is not available")]
    CaretUnavailable,
    /// The caret probe threw.
    #[error("caret-at-point probe failed: {0}")]
    CaretProbe(String),
}

/// Error returned by [`crate::config::CursorConfig::from_json`] and
/// [`crate::config::CursorConfig::validate`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The input was not valid JSON for the config shape.
    #[error("invalid cursor config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field holds a value outside its allowed range.
    #[error("{field} must be {requirement}, got {value}")]
    OutOfRange { field: &'static str, requirement: &'static str, value: f64 },
}
