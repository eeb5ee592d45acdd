use std::fmt;

use serde::{Deserialize, Serialize};

/// Distance bounds used to map a raw gesture distance to a volume percentage
///
/// Units are pixels, matching the sensing backend. Replaced wholesale on
/// every calibration commit; never partially mutated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationRange {
    pub min: f64,
    pub max: f64,
}

/// System-default bounds, applied when the backend supplies none
pub const DEFAULT_RANGE: CalibrationRange = CalibrationRange::new(20.0, 200.0);

impl CalibrationRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// A range is only usable for normalization when max exceeds min and
    /// both bounds are finite
    pub fn is_usable(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.max > self.min
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

impl fmt::Display for CalibrationRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "min={:.1}px, max={:.1}px", self.min, self.max)
    }
}

/// Map a raw distance into a volume percentage using the given range
///
/// Returns 0 for unusable ranges and non-finite distances; otherwise the
/// linear position of the distance within the range, clamped to 0-100 and
/// rounded to the nearest integer.
pub fn normalize(distance: f64, range: &CalibrationRange) -> u8 {
    if !range.is_usable() || !distance.is_finite() {
        return 0;
    }

    let percent = (distance - range.min) / range.span() * 100.0;
    percent.clamp(0.0, 100.0).round() as u8
}
