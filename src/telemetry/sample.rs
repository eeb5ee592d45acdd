use chrono::{DateTime, Utc};
use serde::Serialize;

/// One processed telemetry reading
///
/// Immutable once constructed; sequence numbers are assigned by the poll
/// loop and strictly increase in append order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TelemetrySample {
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
    pub distance: f64,
    pub volume_percent: u8,
}

impl TelemetrySample {
    /// Create a sample stamped with the current wall-clock time
    pub fn new(sequence: u64, distance: f64, volume_percent: u8) -> Self {
        Self::with_timestamp(sequence, Utc::now(), distance, volume_percent)
    }

    pub fn with_timestamp(
        sequence: u64,
        timestamp: DateTime<Utc>,
        distance: f64,
        volume_percent: u8,
    ) -> Self {
        Self {
            sequence,
            timestamp,
            distance,
            volume_percent,
        }
    }
}
