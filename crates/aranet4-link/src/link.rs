//! Sensor connection lifecycle and the current-values read.
//!
//! [`SensorLink`] owns at most one live BLE connection. [`SensorLink::read_current`]
//! lazily establishes it (by configured address, or by discovering the first
//! Aranet device in range) and tears it down on any failure, so the next call
//! always starts from a known state. No retry happens inside a call.

use std::time::Duration;

use async_trait::async_trait;
use btleplug::api::{Characteristic, Peripheral as _};
use btleplug::platform::{Adapter, Peripheral};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::ble::CURRENT_READINGS_DETAIL;
use crate::error::{LinkError, Result};
use crate::reading::Reading;
use crate::scan::{find_peripheral, get_adapter};
use crate::source::SensorSource;

/// Default timeout for the discovery scan.
const DEFAULT_SCAN_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for BLE connection establishment.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Default timeout for the characteristic read.
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout bounds for every transport-level operation of the link.
///
/// Every BLE call the link makes is wrapped in one of these, so a sensor
/// that wanders out of range mid-operation resolves to a
/// [`LinkError::Timeout`] instead of hanging the poll cycle.
#[derive(Debug, Clone)]
pub struct LinkTimeouts {
    /// Discovery scan duration.
    pub scan: Duration,
    /// Connection establishment and service discovery.
    pub connect: Duration,
    /// Characteristic read.
    pub read: Duration,
}

impl Default for LinkTimeouts {
    fn default() -> Self {
        Self {
            scan: DEFAULT_SCAN_TIMEOUT,
            connect: DEFAULT_CONNECT_TIMEOUT,
            read: DEFAULT_READ_TIMEOUT,
        }
    }
}

/// An established connection to the sensor.
///
/// Holding the adapter alive for the lifetime of the peripheral matters:
/// the peripheral may keep internal references to it.
struct Connection {
    #[allow(dead_code)]
    adapter: Adapter,
    peripheral: Peripheral,
    readings_char: Characteristic,
}

/// The logical link between this process and one physical Aranet4 sensor.
///
/// Holds an owned optional connection handle. `None` means disconnected;
/// the next [`read_current`](Self::read_current) call reconnects lazily.
pub struct SensorLink {
    /// Hardware address to connect to, or `None` to auto-discover.
    address: Option<String>,
    timeouts: LinkTimeouts,
    conn: Option<Connection>,
}

impl std::fmt::Debug for SensorLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SensorLink")
            .field("address", &self.address)
            .field("connected", &self.conn.is_some())
            .finish_non_exhaustive()
    }
}

impl SensorLink {
    /// Create a link to the sensor at `address`, or to the first Aranet
    /// device discovered in range when `address` is `None`.
    ///
    /// No connection is made until the first read.
    pub fn new(address: Option<String>) -> Self {
        Self::with_timeouts(address, LinkTimeouts::default())
    }

    /// Create a link with custom timeout bounds.
    pub fn with_timeouts(address: Option<String>, timeouts: LinkTimeouts) -> Self {
        match &address {
            Some(addr) => info!("Sensor address configured: {}", addr),
            None => info!("No sensor address configured, will auto-discover"),
        }
        Self {
            address,
            timeouts,
            conn: None,
        }
    }

    /// Whether the link currently holds a connection handle.
    ///
    /// This reflects the link's own state, not the BLE stack's; a handle
    /// can go stale when the sensor moves out of range, in which case the
    /// next read fails and drops it.
    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Read the sensor's current values.
    ///
    /// Establishes a connection first if none is held. On any failure of
    /// either phase the connection is dropped and its resources released;
    /// the error surfaces to the caller and the next call re-attempts a
    /// fresh connection.
    pub async fn read_current(&mut self) -> Result<Reading> {
        match self.try_read().await {
            Ok(reading) => Ok(reading),
            Err(e) => {
                self.drop_connection().await;
                Err(e)
            }
        }
    }

    async fn try_read(&mut self) -> Result<Reading> {
        if self.conn.is_none() {
            let conn = self.establish().await?;
            self.conn = Some(conn);
        }
        let Some(conn) = self.conn.as_ref() else {
            return Err(LinkError::Unexpected(
                "connection handle missing after establish".to_string(),
            ));
        };

        let data = timeout(
            self.timeouts.read,
            conn.peripheral.read(&conn.readings_char),
        )
        .await
        .map_err(|_| LinkError::timeout("read current values", self.timeouts.read))??;

        Reading::from_bytes(&data)
    }

    /// Establish a fresh connection: find the peripheral, connect, discover
    /// services, and locate the readings characteristic.
    async fn establish(&self) -> Result<Connection> {
        let adapter = get_adapter().await?;
        let peripheral =
            find_peripheral(&adapter, self.address.as_deref(), self.timeouts.scan).await?;

        debug!("Connecting to sensor...");
        timeout(self.timeouts.connect, peripheral.connect())
            .await
            .map_err(|_| LinkError::timeout("connect to sensor", self.timeouts.connect))?
            .map_err(|e| {
                LinkError::connection_failed(self.address.clone(), e.to_string())
            })?;

        timeout(self.timeouts.connect, peripheral.discover_services())
            .await
            .map_err(|_| LinkError::timeout("discover services", self.timeouts.connect))??;

        let services = peripheral.services();
        let readings_char = services
            .iter()
            .flat_map(|service| service.characteristics.iter())
            .find(|c| c.uuid == CURRENT_READINGS_DETAIL)
            .cloned()
            .ok_or_else(|| {
                LinkError::characteristic_not_found(
                    CURRENT_READINGS_DETAIL.to_string(),
                    services.len(),
                )
            })?;

        info!("Connected to sensor");
        Ok(Connection {
            adapter,
            peripheral,
            readings_char,
        })
    }

    /// Drop the held connection, releasing BLE resources best-effort.
    async fn drop_connection(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err(e) = conn.peripheral.disconnect().await {
                debug!(
                    "Best-effort disconnect failed (sensor may already be gone): {}",
                    e
                );
            }
            warn!("Sensor connection dropped, will reconnect on next poll");
        }
    }
}

#[async_trait]
impl SensorSource for SensorLink {
    async fn read_current(&mut self) -> Result<Reading> {
        SensorLink::read_current(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_link_starts_disconnected() {
        let link = SensorLink::new(Some("AA:BB:CC:DD:EE:FF".to_string()));
        assert!(!link.is_connected());
    }

    #[test]
    fn test_default_timeouts() {
        let timeouts = LinkTimeouts::default();
        assert_eq!(timeouts.scan, Duration::from_secs(10));
        assert_eq!(timeouts.connect, Duration::from_secs(15));
        assert_eq!(timeouts.read, Duration::from_secs(5));
    }

    #[test]
    fn test_debug_omits_ble_internals() {
        let link = SensorLink::new(None);
        let s = format!("{:?}", link);
        assert!(s.contains("connected: false"));
    }
}
