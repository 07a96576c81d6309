//! Mock sensor for testing polling code without BLE hardware.
//!
//! [`MockSensor`] plays back a scripted sequence of outcomes, one per
//! `read_current()` call, so tests can drive success/failure in any order.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use crate::error::{LinkError, Result};
use crate::reading::Reading;
use crate::source::SensorSource;

/// A scripted sensor.
///
/// Each call to [`SensorSource::read_current`] pops the next outcome from
/// the script. When the script runs dry the sensor keeps returning the
/// repeat outcome set by [`MockSensor::then_repeat`] (a connection failure
/// by default).
///
/// # Example
///
/// ```
/// use aranet4_link::{MockSensor, Reading, SensorSource};
///
/// #[tokio::main]
/// async fn main() {
///     let mut sensor = MockSensor::new()
///         .push_ok(MockSensor::sample_reading())
///         .push_err_connection();
///
///     assert!(sensor.read_current().await.is_ok());
///     assert!(sensor.read_current().await.is_err());
/// }
/// ```
pub struct MockSensor {
    script: VecDeque<Outcome>,
    repeat: Outcome,
    reads: Arc<AtomicU32>,
}

#[derive(Debug, Clone)]
enum Outcome {
    Ok(Reading),
    ErrConnection,
    ErrTransport,
    ErrProtocol,
    ErrTimeout,
}

impl Outcome {
    fn into_result(self) -> Result<Reading> {
        match self {
            Outcome::Ok(reading) => Ok(reading),
            Outcome::ErrConnection => Err(LinkError::connection_failed(None, "mock: no sensor")),
            Outcome::ErrTransport => Err(LinkError::Bluetooth(btleplug::Error::NotConnected)),
            Outcome::ErrProtocol => Err(LinkError::InvalidReading {
                expected: 13,
                actual: 2,
            }),
            Outcome::ErrTimeout => Err(LinkError::timeout(
                "mock read",
                std::time::Duration::from_secs(5),
            )),
        }
    }
}

impl Default for MockSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSensor {
    /// Create a mock with an empty script.
    pub fn new() -> Self {
        Self {
            script: VecDeque::new(),
            repeat: Outcome::ErrConnection,
            reads: Arc::new(AtomicU32::new(0)),
        }
    }

    /// A plausible fixed reading for tests.
    pub fn sample_reading() -> Reading {
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

    /// Queue a successful read returning `reading`.
    pub fn push_ok(mut self, reading: Reading) -> Self {
        self.script.push_back(Outcome::Ok(reading));
        self
    }

    /// Queue a connection-establishment failure.
    pub fn push_err_connection(mut self) -> Self {
        self.script.push_back(Outcome::ErrConnection);
        self
    }

    /// Queue a transport failure on an established link.
    pub fn push_err_transport(mut self) -> Self {
        self.script.push_back(Outcome::ErrTransport);
        self
    }

    /// Queue a malformed-payload failure.
    pub fn push_err_protocol(mut self) -> Self {
        self.script.push_back(Outcome::ErrProtocol);
        self
    }

    /// Queue a read timeout.
    pub fn push_err_timeout(mut self) -> Self {
        self.script.push_back(Outcome::ErrTimeout);
        self
    }

    /// After the script is exhausted, keep returning `reading` forever.
    pub fn then_repeat(mut self, reading: Reading) -> Self {
        self.repeat = Outcome::Ok(reading);
        self
    }

    /// Number of reads performed so far.
    pub fn read_count(&self) -> u32 {
        self.reads.load(Ordering::Relaxed)
    }

    /// Shared handle to the read counter, for tests that hand the sensor
    /// off to another task.
    pub fn read_count_handle(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.reads)
    }
}

#[async_trait]
impl SensorSource for MockSensor {
    async fn read_current(&mut self) -> Result<Reading> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.script
            .pop_front()
            .unwrap_or_else(|| self.repeat.clone())
            .into_result()
    }
}
