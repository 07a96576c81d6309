//! Bluetooth UUIDs for Aranet4 devices.
//!
//! Only the identifiers needed to find a sensor and read its current
//! values. The Aranet4 uses the Saf Tehnika vendor service.

use uuid::{Uuid, uuid};

/// Saf Tehnika custom service UUID for firmware v1.2.0 and newer.
pub const SAF_TEHNIKA_SERVICE_NEW: Uuid = uuid!("0000fce0-0000-1000-8000-00805f9b34fb");

/// Saf Tehnika custom service UUID for firmware versions before v1.2.0.
pub const SAF_TEHNIKA_SERVICE_OLD: Uuid = uuid!("f0cd1400-95da-4f4b-9ac8-aa55d312af0c");

/// Saf Tehnika manufacturer ID for BLE advertisements.
pub const MANUFACTURER_ID: u16 = 0x0702;

/// Current readings characteristic (detailed) - Aranet4.
///
/// A single read of this characteristic returns CO2, temperature, pressure,
/// humidity, battery, measurement interval, and reading age in one payload.
pub const CURRENT_READINGS_DETAIL: Uuid = uuid!("f0cd3001-95da-4f4b-9ac8-aa55d312af0c");
