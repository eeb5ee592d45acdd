use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;

use super::{Backend, Reading};
use crate::error::ClientError;
use crate::telemetry::CalibrationRange;

/// HTTP client for the gesture sensing backend
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::Config(format!("invalid backend URL {base_url}: {e}")))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::Config(format!("invalid endpoint {path}: {e}")))
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response, ClientError> {
        let url = self.endpoint(path)?;
        let response = self.client.get(url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(ClientError::BackendUnreachable(format!(
                "{} returned HTTP {}",
                url,
                response.status()
            )));
        }

        Ok(response)
    }

    async fn get_json(&self, path: &str) -> Result<Value, ClientError> {
        let value = self.get(path).await?.json::<Value>().await?;
        tracing::trace!("GET {} -> {}", path, value);
        Ok(value)
    }

    async fn get_bounds(&self, path: &str) -> Result<CalibrationRange, ClientError> {
        let value = self.get_json(path).await?;
        bounds_from_value(&value)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn read_data(&self) -> Result<Reading, ClientError> {
        let value = self.get_json("/data").await?;
        reading_from_value(&value)
    }

    async fn start_calibration(&self) -> Result<(), ClientError> {
        // Only dispatch success matters here; the body is never read
        self.get("/calibration/custom/start").await?;
        Ok(())
    }

    async fn stop_calibration(&self) -> Result<CalibrationRange, ClientError> {
        self.get_bounds("/calibration/custom/stop").await
    }

    async fn reset_calibration(&self) -> Result<CalibrationRange, ClientError> {
        self.get_bounds("/calibration/custom/reset").await
    }

    async fn restore_default(&self) -> Result<CalibrationRange, ClientError> {
        self.get_bounds("/calibration/default").await
    }

    fn name(&self) -> &str {
        self.base_url.as_str()
    }
}

/// Extract a required finite number from a JSON object
fn require_number(value: &Value, field: &str) -> Result<f64, ClientError> {
    let number = value.get(field).and_then(Value::as_f64).ok_or_else(|| {
        ClientError::MalformedResponse(format!("missing or non-numeric field `{field}`"))
    })?;

    if !number.is_finite() {
        return Err(ClientError::MalformedResponse(format!(
            "non-finite value for `{field}`"
        )));
    }

    Ok(number)
}

/// Parse a /data payload into a Reading
pub(crate) fn reading_from_value(value: &Value) -> Result<Reading, ClientError> {
    let distance = require_number(value, "distance")?;
    let volume = require_number(value, "volume")?;
    let min = require_number(value, "min")?;
    let max = require_number(value, "max")?;
    let calibrating = value
        .get("calibrating")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    Ok(Reading {
        distance,
        volume: volume.clamp(0.0, 100.0).round() as u8,
        min,
        max,
        calibrating,
    })
}

/// Parse a {min, max} bounds payload
pub(crate) fn bounds_from_value(value: &Value) -> Result<CalibrationRange, ClientError> {
    let min = require_number(value, "min")?;
    let max = require_number(value, "max")?;

    Ok(CalibrationRange::new(min, max))
}
