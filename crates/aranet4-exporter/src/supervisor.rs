//! The polling loop.
//!
//! One cycle = one read attempt reflected into [`ExportedMetrics`], then a
//! sleep. Every failure is non-fatal: the error is logged, the metrics are
//! reset to the unknown sentinel, and the next cycle re-attempts from
//! scratch (the link reconnects lazily). The fixed poll interval is the
//! only backoff; there is no retry counter or circuit breaker.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{error, info};

use aranet4_link::SensorSource;

use crate::metrics::ExportedMetrics;

/// Drives the sensor poll cycle forever.
pub struct PollingSupervisor<S> {
    source: S,
    metrics: Arc<ExportedMetrics>,
    interval: Duration,
}

impl<S: SensorSource> PollingSupervisor<S> {
    /// Create a supervisor polling `source` every `interval`.
    ///
    /// An interval of zero polls back-to-back: each iteration still runs a
    /// full read attempt, there is just no pause between them.
    pub fn new(source: S, metrics: Arc<ExportedMetrics>, interval: Duration) -> Self {
        Self {
            source,
            metrics,
            interval,
        }
    }

    /// Run until the stop signal flips.
    ///
    /// Under normal operation this never returns; the stop channel exists
    /// so the process can shut the loop down between cycles.
    pub async fn run(mut self, mut stop: watch::Receiver<bool>) {
        if self.interval.is_zero() {
            info!("Polling sensor continuously (no pause between cycles)");
        } else {
            info!("Polling sensor every {}s", self.interval.as_secs());
        }

        loop {
            self.poll_once().await;

            if *stop.borrow() {
                break;
            }

            if self.interval.is_zero() {
                // Busy-poll, but stay cooperative with the scheduler.
                tokio::task::yield_now().await;
                continue;
            }

            tokio::select! {
                _ = sleep(self.interval) => {}
                changed = stop.changed() => {
                    // A closed channel means the rest of the process is
                    // gone; treat it like a stop.
                    if changed.is_err() || *stop.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Polling supervisor stopped");
    }

    /// One self-contained cycle: read, reflect the outcome, done.
    ///
    /// Success writes all seven gauges verbatim and marks the sensor
    /// connected. Any error, including kinds the link does not explicitly
    /// enumerate, resets every gauge to NaN and marks it disconnected.
    /// Nothing propagates out of a cycle.
    async fn poll_once(&mut self) {
        match self.source.read_current().await {
            Ok(reading) => {
                info!("Readings: {}", reading);
                self.metrics.record_reading(&reading);
            }
            Err(e) => {
                error!("Failed to fetch readings from sensor: {}", e);
                self.metrics.record_failure();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aranet4_link::{MockSensor, Reading};

    fn sample() -> Reading {
        MockSensor::sample_reading()
    }

    fn supervisor(
        sensor: MockSensor,
        interval: Duration,
    ) -> (PollingSupervisor<MockSensor>, Arc<ExportedMetrics>) {
        let metrics = Arc::new(ExportedMetrics::new());
        let sup = PollingSupervisor::new(sensor, Arc::clone(&metrics), interval);
        (sup, metrics)
    }

    #[tokio::test]
    async fn test_successful_cycle_maps_fields_verbatim() {
        let sensor = MockSensor::new().push_ok(sample());
        let (mut sup, metrics) = supervisor(sensor, Duration::from_secs(5));

        sup.poll_once().await;

        let snap = metrics.snapshot();
        assert_eq!(snap.co2, 650.0);
        assert_eq!(snap.temperature, 21.5);
        assert_eq!(snap.pressure, 1013.0);
        assert_eq!(snap.humidity, 45.0);
        assert_eq!(snap.battery_level, 80.0);
        assert_eq!(snap.update_interval, 60.0);
        assert_eq!(snap.since_last_update, 3.0);
        assert!(snap.connected);
    }

    #[tokio::test]
    async fn test_failed_cycle_resets_every_gauge() {
        let sensor = MockSensor::new().push_ok(sample()).push_err_transport();
        let (mut sup, metrics) = supervisor(sensor, Duration::from_secs(5));

        sup.poll_once().await;
        sup.poll_once().await;

        let snap = metrics.snapshot();
        assert!(snap.gauges().iter().all(|v| v.is_nan()), "no partial resets");
        assert!(!snap.connected);
    }

    #[tokio::test]
    async fn test_connectivity_tracks_each_cycle_outcome() {
        let sensor = MockSensor::new()
            .push_err_connection()
            .push_ok(sample())
            .push_err_protocol()
            .push_err_timeout()
            .push_ok(sample());
        let (mut sup, metrics) = supervisor(sensor, Duration::from_secs(5));

        let expected = [false, true, false, false, true];
        for want in expected {
            sup.poll_once().await;
            assert_eq!(metrics.connected(), want);
        }
    }

    #[tokio::test]
    async fn test_identical_readings_leave_metrics_unchanged() {
        let sensor = MockSensor::new().push_ok(sample()).push_ok(sample());
        let (mut sup, metrics) = supervisor(sensor, Duration::from_secs(5));

        sup.poll_once().await;
        let first = metrics.snapshot();
        sup.poll_once().await;
        let second = metrics.snapshot();

        assert_eq!(first.gauges(), second.gauges());
        assert_eq!(first.connected, second.connected);
    }

    #[tokio::test]
    async fn test_every_failure_kind_is_contained() {
        // All four error classes plus the exhausted-script default: none
        // may escape poll_once.
        let sensor = MockSensor::new()
            .push_err_connection()
            .push_err_transport()
            .push_err_protocol()
            .push_err_timeout();
        let (mut sup, metrics) = supervisor(sensor, Duration::from_secs(5));

        for _ in 0..5 {
            sup.poll_once().await;
            assert!(!metrics.connected());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_stops_on_signal() {
        let sensor = MockSensor::new().then_repeat(sample());
        let (sup, metrics) = supervisor(sensor, Duration::from_secs(5));
        let (stop_tx, stop_rx) = watch::channel(false);

        let handle = tokio::spawn(sup.run(stop_rx));
        tokio::task::yield_now().await;
        assert!(metrics.connected());

        stop_tx.send(true).expect("supervisor listening");
        handle.await.expect("supervisor task panicked");
    }

    #[tokio::test]
    async fn test_zero_interval_polls_back_to_back() {
        let sensor = MockSensor::new().then_repeat(sample());
        let reads = sensor.read_count_handle();
        let (sup, _metrics) = supervisor(sensor, Duration::ZERO);
        let (stop_tx, stop_rx) = watch::channel(false);

        let handle = tokio::spawn(sup.run(stop_rx));
        // Give the busy loop a few turns of the scheduler.
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
        stop_tx.send(true).expect("supervisor listening");
        handle.await.expect("supervisor task panicked");

        // Several full read attempts with no timer involved.
        assert!(
            reads.load(std::sync::atomic::Ordering::Relaxed) >= 3,
            "busy-poll should complete multiple cycles"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_loop_keeps_going() {
        let sensor = MockSensor::new(); // script empty: every read fails
        let reads = sensor.read_count_handle();
        let (sup, metrics) = supervisor(sensor, Duration::from_secs(5));
        let (stop_tx, stop_rx) = watch::channel(false);

        let handle = tokio::spawn(sup.run(stop_rx));
        // Paused time auto-advances through the sleeps.
        tokio::time::sleep(Duration::from_secs(16)).await;

        assert!(!metrics.connected());
        assert!(reads.load(std::sync::atomic::Ordering::Relaxed) >= 3);

        stop_tx.send(true).expect("supervisor listening");
        handle.await.expect("supervisor task panicked");
    }
}
