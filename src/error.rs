use thiserror::Error;

use crate::calibration::CalibrationState;

/// Main error type for the volume dial client
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("backend unreachable: {0}")]
    BackendUnreachable(String),

    #[error("malformed backend response: {0}")]
    MalformedResponse(String),

    #[error("cannot {operation} while {state}")]
    InvalidTransition {
        operation: &'static str,
        state: CalibrationState,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::MalformedResponse(err.to_string())
        } else {
            ClientError::BackendUnreachable(err.to_string())
        }
    }
}
