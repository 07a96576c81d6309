//! Error types for the sensor link.
//!
//! Every failure mode of [`crate::SensorLink::read_current`] maps to one of
//! a closed set of kinds:
//!
//! | Variant | Class |
//! |---------|-------|
//! | [`LinkError::DeviceNotFound`], [`LinkError::ConnectionFailed`] | connection establishment |
//! | [`LinkError::Bluetooth`] | transport failure on an existing link |
//! | [`LinkError::CharacteristicNotFound`], [`LinkError::InvalidReading`], [`LinkError::InvalidData`] | protocol / malformed exchange |
//! | [`LinkError::Timeout`] | bounded-timeout expiry |
//! | [`LinkError::Unexpected`] | anything else |
//!
//! Callers are expected to treat all of them the same way: log, mark the
//! sensor disconnected, try again on the next poll cycle. None of them is
//! worth aborting a process over.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while connecting to or reading from the sensor.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LinkError {
    /// No usable sensor was found during discovery.
    #[error("Device not found: {0}")]
    DeviceNotFound(DeviceNotFoundReason),

    /// A peripheral was found but the connection could not be established.
    #[error("Connection failed: {reason}")]
    ConnectionFailed {
        /// The device identifier that failed to connect, if known.
        device_id: Option<String>,
        /// Human-readable reason for the failure.
        reason: String,
    },

    /// Bluetooth Low Energy error on an existing link.
    #[error("Bluetooth error: {0}")]
    Bluetooth(#[from] btleplug::Error),

    /// Required BLE characteristic not found on the device.
    #[error("Characteristic not found: {uuid} (searched {service_count} services)")]
    CharacteristicNotFound {
        /// The UUID that was not found.
        uuid: String,
        /// Number of services that were searched.
        service_count: usize,
    },

    /// Reading payload was the wrong size.
    #[error("Invalid reading format: expected {expected} bytes, got {actual}")]
    InvalidReading {
        /// Expected payload size.
        expected: usize,
        /// Actual payload size received.
        actual: usize,
    },

    /// The sensor responded but the data was malformed.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Operation timed out.
    #[error("Operation '{operation}' timed out after {duration:?}")]
    Timeout {
        /// The operation that timed out.
        operation: String,
        /// The timeout duration.
        duration: Duration,
    },

    /// Catch-all for failures the link does not otherwise classify.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Reason why a device was not found.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum DeviceNotFoundReason {
    /// The scan finished without seeing any Aranet device.
    NoDevicesInRange,
    /// A device with the specified address was not seen.
    NotFound {
        /// The address or identifier that was searched for.
        identifier: String,
    },
    /// No Bluetooth adapter available.
    NoAdapter,
}

impl std::fmt::Display for DeviceNotFoundReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoDevicesInRange => write!(f, "no Aranet devices in range"),
            Self::NotFound { identifier } => write!(f, "device '{}' not found", identifier),
            Self::NoAdapter => write!(f, "no Bluetooth adapter available"),
        }
    }
}

impl LinkError {
    /// Create a device not found error for a specific identifier.
    pub fn device_not_found(identifier: impl Into<String>) -> Self {
        Self::DeviceNotFound(DeviceNotFoundReason::NotFound {
            identifier: identifier.into(),
        })
    }

    /// Create a timeout error with operation context.
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a characteristic not found error.
    pub fn characteristic_not_found(uuid: impl Into<String>, service_count: usize) -> Self {
        Self::CharacteristicNotFound {
            uuid: uuid.into(),
            service_count,
        }
    }

    /// Create a connection failure with a human-readable reason.
    pub fn connection_failed(device_id: Option<String>, reason: impl Into<String>) -> Self {
        Self::ConnectionFailed {
            device_id,
            reason: reason.into(),
        }
    }
}

/// Result type alias using the link's error type.
pub type Result<T> = std::result::Result<T, LinkError>;
