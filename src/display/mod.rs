pub mod console;

pub use console::ConsoleDisplay;

use crate::telemetry::{CalibrationRange, TelemetrySample};

/// Severity of an operator-facing status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// A human-readable status message emitted on calibration transitions and
/// poll-loop failure edges
#[derive(Debug, Clone, PartialEq)]
pub struct StatusNote {
    pub severity: Severity,
    pub message: String,
}

impl StatusNote {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

/// Immutable snapshot handed to the observer on every successful poll tick
#[derive(Debug, Clone)]
pub struct TickUpdate {
    pub sample: TelemetrySample,
    /// Range the sample was normalized against
    pub range: CalibrationRange,
    /// Backend-reported calibration session flag
    pub calibrating: bool,
    /// Instantaneous poll rate, from the gap between successful ticks
    pub rate_hz: Option<f64>,
    /// Rolling window of recent samples, oldest first
    pub history: Vec<TelemetrySample>,
}

/// Sink for telemetry snapshots and status messages
///
/// Implementations must not block; they are invoked from the poll loop and
/// the calibration workflow.
pub trait TelemetryObserver: Send + Sync {
    fn on_sample(&self, update: &TickUpdate);
    fn on_status(&self, note: &StatusNote);
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Observer that records everything it receives
    #[derive(Default)]
    pub struct RecordingObserver {
        samples: Mutex<Vec<TickUpdate>>,
        notes: Mutex<Vec<StatusNote>>,
    }

    impl RecordingObserver {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn samples(&self) -> Vec<TickUpdate> {
            self.samples.lock().unwrap().clone()
        }

        pub fn notes(&self) -> Vec<StatusNote> {
            self.notes.lock().unwrap().clone()
        }

        pub fn note_count(&self, severity: Severity) -> usize {
            self.notes
                .lock()
                .unwrap()
                .iter()
                .filter(|n| n.severity == severity)
                .count()
        }
    }

    impl TelemetryObserver for RecordingObserver {
        fn on_sample(&self, update: &TickUpdate) {
            self.samples.lock().unwrap().push(update.clone());
        }

        fn on_status(&self, note: &StatusNote) {
            self.notes.lock().unwrap().push(note.clone());
        }
    }
}
