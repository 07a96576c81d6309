//! Trait seam between the polling loop and the physical sensor.

use async_trait::async_trait;

use crate::error::Result;
use crate::reading::Reading;

/// Anything that can produce a current sensor reading on demand.
///
/// Implemented by [`crate::SensorLink`] for real hardware and by
/// [`crate::MockSensor`] for tests, so polling code can be exercised
/// without a Bluetooth adapter.
///
/// Takes `&mut self` because a read may establish or tear down the
/// underlying connection.
#[async_trait]
pub trait SensorSource: Send {
    /// Read the sensor's current values, connecting first if necessary.
    async fn read_current(&mut self) -> Result<Reading>;
}
