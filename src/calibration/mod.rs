pub mod controller;

pub use controller::{CalibrationController, CalibrationState};
