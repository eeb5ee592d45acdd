use std::fmt;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{Duration, interval};

use crate::backend::Backend;
use crate::display::{StatusNote, TelemetryObserver};
use crate::error::ClientError;
use crate::service::SharedRange;
use crate::telemetry::CalibrationRange;

/// Operator-visible calibration workflow state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalibrationState {
    #[default]
    Idle,
    Calibrating,
    /// A finalize/restore request is in flight
    Committing,
}

impl fmt::Display for CalibrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalibrationState::Idle => write!(f, "idle"),
            CalibrationState::Calibrating => write!(f, "calibrating"),
            CalibrationState::Committing => write!(f, "committing"),
        }
    }
}

/// State machine driving the backend calibration workflow
///
/// Owns the active calibration range (shared with the poll loop) and the
/// recurring reminder task spawned while a session is running. The reminder
/// handle is replaced atomically; at most one timer is ever live.
pub struct CalibrationController {
    backend: Arc<dyn Backend>,
    range: SharedRange,
    observer: Arc<dyn TelemetryObserver>,
    state: CalibrationState,
    reminder_interval: Duration,
    reminder: Option<JoinHandle<()>>,
}

impl CalibrationController {
    pub fn new(
        backend: Arc<dyn Backend>,
        range: SharedRange,
        observer: Arc<dyn TelemetryObserver>,
        reminder_interval: Duration,
    ) -> Self {
        Self {
            backend,
            range,
            observer,
            state: CalibrationState::Idle,
            reminder_interval,
            reminder: None,
        }
    }

    pub fn state(&self) -> CalibrationState {
        self.state
    }

    pub async fn active_range(&self) -> CalibrationRange {
        *self.range.read().await
    }

    /// Begin a calibration session
    ///
    /// Valid only while idle. The backend request must dispatch before the
    /// state advances or the reminder starts; a failed dispatch leaves the
    /// controller idle.
    pub async fn start(&mut self) -> Result<(), ClientError> {
        if self.state != CalibrationState::Idle {
            return Err(self.reject("start"));
        }

        if let Err(e) = self.backend.start_calibration().await {
            self.observer
                .on_status(&StatusNote::error(format!("Failed to start calibration: {e}")));
            return Err(e);
        }

        self.state = CalibrationState::Calibrating;
        self.spawn_reminder();
        self.observer.on_status(&StatusNote::info(
            "Calibration started - move thumb & index slowly",
        ));
        tracing::info!("Calibration session started");

        Ok(())
    }

    /// Finalize the session, committing the learned bounds
    ///
    /// Valid only while calibrating. On failure the state still returns to
    /// idle but the active range is left unchanged.
    pub async fn stop(&mut self) -> Result<(), ClientError> {
        if self.state != CalibrationState::Calibrating {
            return Err(self.reject("stop"));
        }

        // Cancel first so no reminder fires once a stop is underway
        self.cancel_reminder();
        self.state = CalibrationState::Committing;

        match self.backend.stop_calibration().await {
            Ok(bounds) => {
                self.commit(bounds).await;
                self.observer
                    .on_status(&StatusNote::success(format!("Calibration saved ({bounds})")));
                Ok(())
            }
            Err(e) => {
                self.state = CalibrationState::Idle;
                self.observer
                    .on_status(&StatusNote::error(format!("Failed to save calibration: {e}")));
                Err(e)
            }
        }
    }

    /// Restore the backend's stored application defaults
    ///
    /// Valid from any state; also the escape hatch out of a stalled session.
    pub async fn reset(&mut self) -> Result<(), ClientError> {
        self.cancel_reminder();
        self.state = CalibrationState::Committing;

        match self.backend.reset_calibration().await {
            Ok(bounds) => {
                self.commit(bounds).await;
                self.observer
                    .on_status(&StatusNote::warning(format!("Reset to app defaults ({bounds})")));
                Ok(())
            }
            Err(e) => {
                self.state = CalibrationState::Idle;
                self.observer
                    .on_status(&StatusNote::error(format!("Failed to reset calibration: {e}")));
                Err(e)
            }
        }
    }

    /// Restore hard-coded system defaults; valid from any state
    pub async fn restore_default(&mut self) -> Result<(), ClientError> {
        self.cancel_reminder();
        self.state = CalibrationState::Committing;

        match self.backend.restore_default().await {
            Ok(bounds) => {
                self.commit(bounds).await;
                self.observer
                    .on_status(&StatusNote::success(format!("System default applied ({bounds})")));
                Ok(())
            }
            Err(e) => {
                self.state = CalibrationState::Idle;
                self.observer.on_status(&StatusNote::error(format!(
                    "Failed to restore system defaults: {e}"
                )));
                Err(e)
            }
        }
    }

    /// Replace the active range wholesale and return to idle
    async fn commit(&mut self, bounds: CalibrationRange) {
        *self.range.write().await = bounds;
        self.state = CalibrationState::Idle;
        tracing::info!("Active range replaced: {}", bounds);
    }

    fn reject(&self, operation: &'static str) -> ClientError {
        let err = ClientError::InvalidTransition {
            operation,
            state: self.state,
        };
        self.observer.on_status(&StatusNote::error(err.to_string()));
        err
    }

    fn spawn_reminder(&mut self) {
        self.cancel_reminder();

        let observer = self.observer.clone();
        let period = self.reminder_interval;

        self.reminder = Some(tokio::spawn(async move {
            let mut ticker = interval(period);
            // The first interval tick completes immediately; skip it so the
            // first reminder lands one full period after start
            ticker.tick().await;
            loop {
                ticker.tick().await;
                observer.on_status(&StatusNote::warning("Please STOP calibration when done"));
            }
        }));
    }

    fn cancel_reminder(&mut self) {
        if let Some(handle) = self.reminder.take() {
            handle.abort();
        }
    }

    #[cfg(test)]
    fn reminder_active(&self) -> bool {
        self.reminder.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for CalibrationController {
    fn drop(&mut self) {
        self.cancel_reminder();
    }
}
