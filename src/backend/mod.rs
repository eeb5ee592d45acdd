pub mod http;
#[cfg(test)]
pub mod mock;

use async_trait::async_trait;

use crate::error::ClientError;
use crate::telemetry::CalibrationRange;

pub use http::HttpBackend;

/// One reading from the sensing backend's /data endpoint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub distance: f64,
    /// Backend-side smoothed volume, kept for diagnostics only; the client
    /// normalizes against its own active range
    pub volume: u8,
    pub min: f64,
    pub max: f64,
    pub calibrating: bool,
}

impl Reading {
    pub fn bounds(&self) -> CalibrationRange {
        CalibrationRange::new(self.min, self.max)
    }
}

/// Trait abstracting the sensing backend the client polls and calibrates
/// against
#[async_trait]
pub trait Backend: Send + Sync {
    /// Fetch the current distance reading and active bounds
    async fn read_data(&self) -> Result<Reading, ClientError>;

    /// Ask the backend to begin collecting calibration samples; the response
    /// body is ignored
    async fn start_calibration(&self) -> Result<(), ClientError>;

    /// Finalize calibration and return the learned bounds
    async fn stop_calibration(&self) -> Result<CalibrationRange, ClientError>;

    /// Restore the backend's stored application-default bounds
    async fn reset_calibration(&self) -> Result<CalibrationRange, ClientError>;

    /// Restore hard-coded system-default bounds
    async fn restore_default(&self) -> Result<CalibrationRange, ClientError>;

    /// Name of this backend for logging
    fn name(&self) -> &str;
}
