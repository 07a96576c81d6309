//! Exported metric state.
//!
//! The polling loop is the sole writer; the HTTP scrape handler reads at
//! any time, including mid-update. Each gauge is an independent atomic, so
//! a scrape racing an update may see a mix of fields from two cycles.
//! That relaxation is deliberate: every individual value is always either
//! a real reading or the NaN sentinel, never torn.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use aranet4_link::Reading;

/// A single gauge value, stored as the bit pattern of an `f64`.
#[derive(Debug)]
struct Gauge(AtomicU64);

impl Gauge {
    /// Gauges start at NaN: "no reading obtained yet".
    fn new() -> Self {
        Self(AtomicU64::new(f64::NAN.to_bits()))
    }

    fn set(&self, value: f64) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }

    fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }
}

/// The externally visible gauge and enum values.
///
/// Overwritten wholesale on every poll cycle: either all seven gauges carry
/// the fields of one [`Reading`] and the sensor counts as connected, or all
/// seven are NaN and it does not. There are no partial updates.
#[derive(Debug)]
pub struct ExportedMetrics {
    co2: Gauge,
    temperature: Gauge,
    pressure: Gauge,
    humidity: Gauge,
    battery_level: Gauge,
    update_interval: Gauge,
    since_last_update: Gauge,
    connected: AtomicBool,
}

impl Default for ExportedMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ExportedMetrics {
    /// Create metrics in the initial state: all gauges NaN, disconnected.
    pub fn new() -> Self {
        Self {
            co2: Gauge::new(),
            temperature: Gauge::new(),
            pressure: Gauge::new(),
            humidity: Gauge::new(),
            battery_level: Gauge::new(),
            update_interval: Gauge::new(),
            since_last_update: Gauge::new(),
            connected: AtomicBool::new(false),
        }
    }

    /// Record a successful poll: all seven fields verbatim, connected.
    pub fn record_reading(&self, reading: &Reading) {
        self.co2.set(f64::from(reading.co2));
        self.temperature.set(f64::from(reading.temperature));
        self.pressure.set(f64::from(reading.pressure));
        self.humidity.set(f64::from(reading.humidity));
        self.battery_level.set(f64::from(reading.battery));
        self.update_interval.set(f64::from(reading.interval));
        self.since_last_update.set(f64::from(reading.age));
        self.connected.store(true, Ordering::Relaxed);
    }

    /// Record a failed poll: every gauge to the NaN sentinel, disconnected.
    pub fn record_failure(&self) {
        self.co2.set(f64::NAN);
        self.temperature.set(f64::NAN);
        self.pressure.set(f64::NAN);
        self.humidity.set(f64::NAN);
        self.battery_level.set(f64::NAN);
        self.update_interval.set(f64::NAN);
        self.since_last_update.set(f64::NAN);
        self.connected.store(false, Ordering::Relaxed);
    }

    /// Whether the last completed poll cycle succeeded.
    pub fn connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    /// Read all current values.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            co2: self.co2.get(),
            temperature: self.temperature.get(),
            pressure: self.pressure.get(),
            humidity: self.humidity.get(),
            battery_level: self.battery_level.get(),
            update_interval: self.update_interval.get(),
            since_last_update: self.since_last_update.get(),
            connected: self.connected(),
        }
    }
}

/// Plain-value copy of the exported state.
#[derive(Debug, Clone, Copy)]
pub struct MetricsSnapshot {
    /// CO2 concentration in ppm.
    pub co2: f64,
    /// Temperature in Celsius.
    pub temperature: f64,
    /// Pressure in hPa.
    pub pressure: f64,
    /// Relative humidity in percent.
    pub humidity: f64,
    /// Battery level in percent.
    pub battery_level: f64,
    /// Sensor measurement interval in seconds.
    pub update_interval: f64,
    /// Seconds since the sensor last measured.
    pub since_last_update: f64,
    /// Whether the last poll cycle succeeded.
    pub connected: bool,
}

impl MetricsSnapshot {
    /// The seven gauge values in exposition order.
    pub fn gauges(&self) -> [f64; 7] {
        [
            self.co2,
            self.temperature,
            self.pressure,
            self.humidity,
            self.battery_level,
            self.update_interval,
            self.since_last_update,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_reading() -> Reading {
        Reading {
            co2: 650,
            temperature: 21.5,
            pressure: 1013.0,
            humidity: 45,
            battery: 80,
            interval: 60,
            age: 3,
        }
    }

    #[test]
    fn test_initial_state_is_unknown() {
        let metrics = ExportedMetrics::new();
        let snap = metrics.snapshot();
        assert!(snap.gauges().iter().all(|v| v.is_nan()));
        assert!(!snap.connected);
    }

    #[test]
    fn test_record_reading_maps_fields_verbatim() {
        let metrics = ExportedMetrics::new();
        metrics.record_reading(&sample_reading());

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

    #[test]
    fn test_record_failure_resets_all_gauges() {
        let metrics = ExportedMetrics::new();
        metrics.record_reading(&sample_reading());
        metrics.record_failure();

        let snap = metrics.snapshot();
        assert!(snap.gauges().iter().all(|v| v.is_nan()));
        assert!(!snap.connected);
    }

    #[test]
    fn test_gauge_roundtrip() {
        let gauge = Gauge::new();
        assert!(gauge.get().is_nan());
        gauge.set(1013.25);
        assert_eq!(gauge.get(), 1013.25);
        gauge.set(f64::NAN);
        assert!(gauge.get().is_nan());
    }
}
