use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{Backend, Reading};
use crate::error::ClientError;
use crate::telemetry::{CalibrationRange, DEFAULT_RANGE};

/// Scripted backend for exercising the controller and poll loop in tests
///
/// Every call is recorded by method name. Responses are popped from
/// per-method queues; an empty queue falls back to a benign default
/// (readings are the exception and fail, so poll tests must script them).
#[derive(Default)]
pub struct MockBackend {
    calls: Mutex<Vec<&'static str>>,
    read_results: Mutex<VecDeque<Result<Reading, ClientError>>>,
    start_results: Mutex<VecDeque<Result<(), ClientError>>>,
    stop_results: Mutex<VecDeque<Result<CalibrationRange, ClientError>>>,
    reset_results: Mutex<VecDeque<Result<CalibrationRange, ClientError>>>,
    default_results: Mutex<VecDeque<Result<CalibrationRange, ClientError>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A plausible reading at the given distance with default bounds
    pub fn reading(distance: f64) -> Reading {
        Reading {
            distance,
            volume: 0,
            min: DEFAULT_RANGE.min,
            max: DEFAULT_RANGE.max,
            calibrating: false,
        }
    }

    pub fn script_read(&self, result: Result<Reading, ClientError>) {
        self.read_results.lock().unwrap().push_back(result);
    }

    pub fn script_start(&self, result: Result<(), ClientError>) {
        self.start_results.lock().unwrap().push_back(result);
    }

    pub fn script_stop(&self, result: Result<CalibrationRange, ClientError>) {
        self.stop_results.lock().unwrap().push_back(result);
    }

    pub fn script_reset(&self, result: Result<CalibrationRange, ClientError>) {
        self.reset_results.lock().unwrap().push_back(result);
    }

    pub fn script_default(&self, result: Result<CalibrationRange, ClientError>) {
        self.default_results.lock().unwrap().push_back(result);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|&c| *c == name).count()
    }

    fn record(&self, name: &'static str) {
        self.calls.lock().unwrap().push(name);
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn read_data(&self) -> Result<Reading, ClientError> {
        self.record("read_data");
        self.read_results.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(ClientError::BackendUnreachable(
                "mock: no scripted reading".to_string(),
            ))
        })
    }

    async fn start_calibration(&self) -> Result<(), ClientError> {
        self.record("start_calibration");
        self.start_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()))
    }

    async fn stop_calibration(&self) -> Result<CalibrationRange, ClientError> {
        self.record("stop_calibration");
        self.stop_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(DEFAULT_RANGE))
    }

    async fn reset_calibration(&self) -> Result<CalibrationRange, ClientError> {
        self.record("reset_calibration");
        self.reset_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(DEFAULT_RANGE))
    }

    async fn restore_default(&self) -> Result<CalibrationRange, ClientError> {
        self.record("restore_default");
        self.default_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(DEFAULT_RANGE))
    }

    fn name(&self) -> &str {
        "mock"
    }
}
