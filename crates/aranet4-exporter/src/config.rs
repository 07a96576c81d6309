//! Exporter configuration.
//!
//! Flags with environment-variable fallbacks, so the same binary works
//! from a shell and from a container env file.

use std::time::Duration;

use clap::Parser;

/// Prometheus exporter for a single Aranet4 sensor.
#[derive(Parser, Debug, Clone)]
#[command(name = "aranet4-exporter")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Seconds to sleep between poll cycles. 0 polls back-to-back.
    #[arg(long, env = "POLLING_INTERVAL_SECONDS", default_value_t = 5)]
    pub polling_interval_seconds: u64,

    /// Port the metrics endpoint listens on.
    #[arg(long, env = "EXPORTER_PORT", default_value_t = 80)]
    pub exporter_port: u16,

    /// Sensor MAC address (or platform identifier). Omit to auto-discover
    /// the first Aranet device in range.
    #[arg(long, env = "SENSOR_MAC_ADDRESS")]
    pub sensor_mac_address: Option<String>,
}

impl Config {
    /// The poll interval as a `Duration`.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.polling_interval_seconds)
    }
}
