//! Current-reading snapshot and its GATT wire format.

use bytes::Buf;

use crate::error::{LinkError, Result};

/// Minimum payload size for the Aranet4 "current readings detail"
/// characteristic.
pub const MIN_READING_BYTES: usize = 13;

/// One snapshot of all sensor measurements taken at a single point in time.
///
/// Produced only by a successful read of the current-readings characteristic
/// and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// CO2 concentration in ppm.
    pub co2: u16,
    /// Temperature in degrees Celsius.
    pub temperature: f32,
    /// Atmospheric pressure in hPa.
    pub pressure: f32,
    /// Relative humidity percentage (0-100).
    pub humidity: u8,
    /// Battery level percentage (0-100).
    pub battery: u8,
    /// Measurement interval in seconds.
    pub interval: u16,
    /// Age of the reading in seconds since the last measurement.
    pub age: u16,
}

impl Reading {
    /// Parse a `Reading` from the raw characteristic payload.
    ///
    /// The byte format is:
    /// - bytes 0-1: CO2 (u16 LE)
    /// - bytes 2-3: Temperature (u16 LE, divide by 20 for Celsius)
    /// - bytes 4-5: Pressure (u16 LE, divide by 10 for hPa)
    /// - byte 6: Humidity (u8)
    /// - byte 7: Battery (u8)
    /// - byte 8: CO2 status indicator (not exported, skipped)
    /// - bytes 9-10: Interval (u16 LE)
    /// - bytes 11-12: Age (u16 LE)
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::InvalidReading`] if `data` contains fewer than
    /// [`MIN_READING_BYTES`] bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < MIN_READING_BYTES {
            return Err(LinkError::InvalidReading {
                expected: MIN_READING_BYTES,
                actual: data.len(),
            });
        }

        let mut buf = data;
        let co2 = buf.get_u16_le();
        let temp_raw = buf.get_u16_le();
        let pressure_raw = buf.get_u16_le();
        let humidity = buf.get_u8();
        let battery = buf.get_u8();
        buf.advance(1); // status byte
        let interval = buf.get_u16_le();
        let age = buf.get_u16_le();

        Ok(Reading {
            co2,
            temperature: f32::from(temp_raw) / 20.0,
            pressure: f32::from(pressure_raw) / 10.0,
            humidity,
            battery,
            interval,
            age,
        })
    }
}

impl std::fmt::Display for Reading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "co2={}ppm temp={:.1}C pressure={:.1}hPa humidity={}% battery={}% interval={}s age={}s",
            self.co2,
            self.temperature,
            self.pressure,
            self.humidity,
            self.battery,
            self.interval,
            self.age
        )
    }
}
