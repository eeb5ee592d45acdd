use super::{Severity, StatusNote, TelemetryObserver, TickUpdate};

const BAR_WIDTH: usize = 20;

/// Terminal renderer for telemetry snapshots and status toasts
pub struct ConsoleDisplay;

impl ConsoleDisplay {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleDisplay {
    fn default() -> Self {
        Self::new()
    }
}

/// Volume band label shown next to the percentage
fn volume_band(percent: u8) -> &'static str {
    match percent {
        0 => "muted",
        1..=34 => "low",
        35..=69 => "medium",
        _ => "high",
    }
}

/// Fixed-width fill bar for the given percentage
fn fill_bar(percent: u8, width: usize) -> String {
    let filled = (usize::from(percent) * width + 50) / 100;

    (0..width).map(|i| if i < filled { '#' } else { '.' }).collect()
}

fn severity_tag(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "INFO",
        Severity::Success => " OK ",
        Severity::Warning => "WARN",
        Severity::Error => "FAIL",
    }
}

impl TelemetryObserver for ConsoleDisplay {
    fn on_sample(&self, update: &TickUpdate) {
        let sample = &update.sample;
        let rate = update
            .rate_hz
            .map(|hz| format!("{hz:.1} Hz"))
            .unwrap_or_else(|| "-".to_string());
        let badge = if update.calibrating {
            "  [calibrating]"
        } else {
            ""
        };

        println!(
            "#{:<6} {:>7.1}px {:>4}% {:<6} |{}| {:>8}  ({}){}",
            sample.sequence,
            sample.distance,
            sample.volume_percent,
            volume_band(sample.volume_percent),
            fill_bar(sample.volume_percent, BAR_WIDTH),
            rate,
            update.range,
            badge,
        );
    }

    fn on_status(&self, note: &StatusNote) {
        println!("[{}] {}", severity_tag(note.severity), note.message);
    }
}
