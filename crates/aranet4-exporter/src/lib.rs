//! Prometheus exporter for a single Aranet4 sensor.
//!
//! This crate provides a small service that:
//! - Polls one sensor over BLE on a fixed interval
//! - Treats every read failure as non-fatal and marks staleness explicitly
//! - Exposes the latest values at `GET /metrics` in Prometheus text format
//!
//! # Exported series
//!
//! Under the `aranet4` namespace:
//!
//! | Series | Meaning |
//! |--------|---------|
//! | `aranet4_co2` | CO2 concentration in ppm |
//! | `aranet4_temperature` | Temperature in Celsius |
//! | `aranet4_pressure` | Pressure in hPa |
//! | `aranet4_humidity` | Relative humidity in percent |
//! | `aranet4_battery_level` | Battery level in percent |
//! | `aranet4_update_interval` | Sensor measurement interval in seconds |
//! | `aranet4_since_last_update` | Seconds since the sensor last measured |
//! | `aranet4_connected_to_sensor` | Two-state enum: "true" / "false" |
//!
//! After a failed poll cycle all seven gauges read `NaN` and the enum
//! reads "false"; the loop keeps polling and recovers on its own.
//!
//! # Configuration
//!
//! Flags with environment fallbacks: `POLLING_INTERVAL_SECONDS` (default 5),
//! `EXPORTER_PORT` (default 80), `SENSOR_MAC_ADDRESS` (default:
//! auto-discover the first Aranet device in range).

pub mod config;
pub mod metrics;
pub mod render;
pub mod server;
pub mod supervisor;

pub use config::Config;
pub use metrics::{ExportedMetrics, MetricsSnapshot};
pub use supervisor::PollingSupervisor;
