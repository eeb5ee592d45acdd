use std::sync::Arc;

use tokio::sync::RwLock;

use crate::telemetry::CalibrationRange;

/// Active calibration range shared between the controller and the poll loop
///
/// Written only by the calibration controller; every write replaces the
/// whole value, so readers never observe a half-updated range.
pub type SharedRange = Arc<RwLock<CalibrationRange>>;

/// Create the shared active range
pub fn create_shared_range(initial: CalibrationRange) -> SharedRange {
    Arc::new(RwLock::new(initial))
}
