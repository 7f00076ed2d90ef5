use serde::{Deserialize, Serialize};

use crate::mode::Mode;

/// Interpolated cursor state for one frame.
///
/// `x`/`y` are the center of the cursor shape in viewport pixels. Renderers
/// read only this; the raw spring targets are never exposed. `revision`
/// increases whenever any target changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorOutput {
    pub enabled: bool,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub radius: f64,
    pub opacity: f64,
    pub morphed: bool,
    pub inverted: bool,
    pub mode: Mode,
    pub revision: u64,
}
