use std::sync::Arc;

use tokio::time::{Duration, Instant, MissedTickBehavior, interval};

use crate::backend::Backend;
use crate::display::{StatusNote, TelemetryObserver, TickUpdate};
use crate::error::ClientError;
use crate::service::SharedRange;
use crate::telemetry::{RollingBuffer, TelemetrySample, normalize};

/// Fixed-interval polling loop feeding the telemetry pipeline
///
/// Each tick fetches a reading, normalizes it against the active range,
/// appends the sample to the rolling window and notifies the observer. A
/// failed tick is skipped without advancing the sequence counter; the loop
/// itself never stops.
pub struct PollLoop {
    backend: Arc<dyn Backend>,
    range: SharedRange,
    observer: Arc<dyn TelemetryObserver>,
    buffer: RollingBuffer,
    period: Duration,
    sequence: u64,
    last_success: Option<Instant>,
    failure_streak: u32,
    range_warned: bool,
}

impl PollLoop {
    pub fn new(
        backend: Arc<dyn Backend>,
        range: SharedRange,
        observer: Arc<dyn TelemetryObserver>,
        period: Duration,
        buffer_capacity: usize,
    ) -> Self {
        Self {
            backend,
            range,
            observer,
            buffer: RollingBuffer::new(buffer_capacity),
            period,
            sequence: 0,
            last_success: None,
            failure_streak: 0,
            range_warned: false,
        }
    }

    /// Run until the owning task is aborted
    pub async fn run(mut self) {
        tracing::info!(
            "Poll loop started against {} ({} ms period)",
            self.backend.name(),
            self.period.as_millis()
        );

        let mut ticker = interval(self.period);
        // A stalled backend delays the next tick instead of stacking
        // catch-up requests behind it
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            self.tick().await;
        }
    }

    /// One poll cycle: fetch, normalize, buffer, notify
    async fn tick(&mut self) {
        let reading = match self.backend.read_data().await {
            Ok(reading) => reading,
            Err(e) => {
                self.note_failure(&e);
                return;
            }
        };

        self.note_recovery();

        let range = *self.range.read().await;
        if range.is_usable() {
            self.range_warned = false;
        } else if !self.range_warned {
            tracing::warn!("Active range ({}) is unusable, reporting 0%", range);
            self.range_warned = true;
        }

        let volume_percent = normalize(reading.distance, &range);
        let sample = TelemetrySample::new(self.sequence, reading.distance, volume_percent);
        self.sequence += 1;
        self.buffer.push(sample);

        let now = Instant::now();
        let rate_hz = self.last_success.and_then(|previous| {
            let gap = now.duration_since(previous).as_secs_f64();
            (gap > 0.0).then(|| 1.0 / gap)
        });
        self.last_success = Some(now);

        tracing::debug!(
            sequence = sample.sequence,
            distance = sample.distance,
            volume_percent = sample.volume_percent,
            backend_volume = reading.volume,
            buffered = self.buffer.len(),
            "tick"
        );

        self.observer.on_sample(&TickUpdate {
            sample,
            range,
            calibrating: reading.calibrating,
            rate_hz,
            history: self.buffer.snapshot(),
        });
    }

    fn note_failure(&mut self, error: &ClientError) {
        self.failure_streak += 1;
        tracing::warn!(
            "Poll tick skipped ({} in a row): {}",
            self.failure_streak,
            error
        );

        // Edge-triggered: one note per failure streak, not one per tick
        if self.failure_streak == 1 {
            self.observer
                .on_status(&StatusNote::error(format!("Backend readings paused: {error}")));
        }
    }

    fn note_recovery(&mut self) {
        if self.failure_streak > 0 {
            self.observer.on_status(&StatusNote::info(format!(
                "Backend readings resumed after {} failed polls",
                self.failure_streak
            )));
            self.failure_streak = 0;
        }
    }
}
