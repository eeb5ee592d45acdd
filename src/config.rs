use std::time::Duration;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "volume-dial-client")]
#[command(about = "Telemetry client for the gesture-controlled volume dial")]
#[command(version)]
pub struct Cli {
    /// Base URL of the sensing backend
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    pub backend_url: String,

    /// Poll interval in milliseconds
    #[arg(long, default_value = "150")]
    pub poll_interval_ms: u64,

    /// Calibration reminder interval in milliseconds
    #[arg(long, default_value = "6000")]
    pub reminder_interval_ms: u64,

    /// Number of samples kept for the history chart
    #[arg(long, default_value = "120")]
    pub buffer_capacity: usize,

    /// HTTP request timeout in seconds
    #[arg(long, default_value = "5")]
    pub request_timeout_secs: u64,
}

/// Client configuration resolved from the command line
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub backend_url: String,
    pub poll_interval: Duration,
    pub reminder_interval: Duration,
    pub buffer_capacity: usize,
    pub request_timeout: Duration,
}

impl Cli {
    /// Convert CLI args to a ClientConfig, flooring degenerate values
    pub fn to_client_config(&self) -> ClientConfig {
        ClientConfig {
            backend_url: self.backend_url.clone(),
            poll_interval: Duration::from_millis(self.poll_interval_ms.max(10)),
            reminder_interval: Duration::from_millis(self.reminder_interval_ms.max(500)),
            buffer_capacity: self.buffer_capacity.max(1),
            request_timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
        }
    }
}
