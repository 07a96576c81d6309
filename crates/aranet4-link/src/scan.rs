//! Device discovery.
//!
//! One bounded scan per call. Retry across failed scans is the caller's
//! business (the polling loop re-attempts on its next cycle), so there is
//! no retry or backoff here.

use std::time::Duration;

use btleplug::api::{Central, Manager as _, Peripheral as _, PeripheralProperties, ScanFilter};
use btleplug::platform::{Adapter, Manager, Peripheral};
use tokio::time::sleep;
use tracing::{debug, info};

use crate::ble::{MANUFACTURER_ID, SAF_TEHNIKA_SERVICE_NEW, SAF_TEHNIKA_SERVICE_OLD};
use crate::error::{DeviceNotFoundReason, LinkError, Result};

/// Get the first available Bluetooth adapter.
pub async fn get_adapter() -> Result<Adapter> {
    let manager = Manager::new().await?;
    let adapters = manager.adapters().await?;

    adapters
        .into_iter()
        .next()
        .ok_or(LinkError::DeviceNotFound(DeviceNotFoundReason::NoAdapter))
}

/// Find the sensor peripheral on the given adapter.
///
/// With `address = Some(..)` the peripheral must match that address (or
/// platform identifier, or name); with `None` the first device that looks
/// like an Aranet sensor wins.
///
/// Peripherals already known to the adapter from a previous scan are checked
/// first, so a reconnect after a brief link drop usually needs no scan at
/// all. Otherwise a single scan of `scan_duration` runs before giving up
/// with [`LinkError::DeviceNotFound`].
pub async fn find_peripheral(
    adapter: &Adapter,
    address: Option<&str>,
    scan_duration: Duration,
) -> Result<Peripheral> {
    // Check already-known peripherals first (cached from previous scans)
    if let Some(peripheral) = select_peripheral(adapter, address).await? {
        debug!("Found sensor in adapter cache, no scan needed");
        return Ok(peripheral);
    }

    info!(
        "Scanning for sensor for {} seconds...",
        scan_duration.as_secs()
    );
    adapter.start_scan(ScanFilter::default()).await?;
    sleep(scan_duration).await;
    adapter.stop_scan().await?;

    match select_peripheral(adapter, address).await? {
        Some(peripheral) => Ok(peripheral),
        None => match address {
            Some(addr) => Err(LinkError::device_not_found(addr)),
            None => Err(LinkError::DeviceNotFound(
                DeviceNotFoundReason::NoDevicesInRange,
            )),
        },
    }
}

/// Search the adapter's known peripherals for a match.
async fn select_peripheral(
    adapter: &Adapter,
    address: Option<&str>,
) -> Result<Option<Peripheral>> {
    let peripherals = adapter.peripherals().await?;

    for peripheral in peripherals {
        let props = match peripheral.properties().await {
            Ok(Some(props)) => props,
            Ok(None) => continue,
            Err(e) => {
                debug!("Error reading peripheral properties: {}", e);
                continue;
            }
        };

        let matched = match address {
            Some(addr) => {
                matches_identifier(&format_peripheral_id(&peripheral.id()), &props, addr)
            }
            None => is_aranet_device(&props),
        };

        if matched {
            debug!(
                "Matched peripheral {:?} ({})",
                props.local_name, props.address
            );
            return Ok(Some(peripheral));
        }
    }

    Ok(None)
}

/// Check whether a peripheral matches a user-supplied identifier.
///
/// Accepts a MAC address with or without colons (Linux/Windows), a
/// peripheral ID (macOS exposes UUIDs instead of addresses), or a device
/// name substring.
fn matches_identifier(
    peripheral_id: &str,
    props: &PeripheralProperties,
    identifier: &str,
) -> bool {
    let identifier_lower = identifier.to_lowercase();
    let address = props.address.to_string().to_lowercase();
    let peripheral_id = peripheral_id.to_lowercase();

    if peripheral_id.contains(&identifier_lower) {
        return true;
    }

    if address != "00:00:00:00:00:00"
        && (address == identifier_lower
            || address.replace(':', "") == identifier_lower.replace(':', ""))
    {
        return true;
    }

    if let Some(name) = &props.local_name
        && name.to_lowercase().contains(&identifier_lower)
    {
        return true;
    }

    false
}

/// Format a peripheral ID as a plain string.
///
/// On macOS peripheral IDs are UUIDs; on other platforms they wrap the MAC
/// address. `PeripheralId` only exposes Debug formatting, so strip the
/// wrapper from that.
pub(crate) fn format_peripheral_id(id: &btleplug::platform::PeripheralId) -> String {
    format!("{:?}", id)
        .trim_start_matches("PeripheralId(")
        .trim_end_matches(')')
        .to_string()
}

/// Check if a peripheral is an Aranet device based on its advertisement.
fn is_aranet_device(props: &PeripheralProperties) -> bool {
    if props.manufacturer_data.contains_key(&MANUFACTURER_ID) {
        return true;
    }

    for service_uuid in props.service_data.keys() {
        if *service_uuid == SAF_TEHNIKA_SERVICE_NEW || *service_uuid == SAF_TEHNIKA_SERVICE_OLD {
            return true;
        }
    }

    for service_uuid in &props.services {
        if *service_uuid == SAF_TEHNIKA_SERVICE_NEW || *service_uuid == SAF_TEHNIKA_SERVICE_OLD {
            return true;
        }
    }

    if let Some(name) = &props.local_name {
        return name.to_lowercase().contains("aranet");
    }

    false
}
