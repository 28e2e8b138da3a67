//! Resolving strips by their advertised name.
//!
//! Scanning itself belongs to the Bluetooth stack; implement [`Scanner`] on
//! top of it and use [`resolve_address_by_name`] to pick a strip out of the
//! scan results.

use std::future::Future;
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::ControllerConfig;
use crate::controller::Controller;
use crate::errors::Error;
use crate::link::Link;
use crate::types::DeviceAddress;

type Result<T> = std::result::Result<T, Error>;

/// A device seen during a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredDevice {
    /// Advertised local name, e.g. `ihoment_H6110_DBA2`
    pub name: Option<String>,
    /// Radio address of the device
    pub address: DeviceAddress,
}

impl DiscoveredDevice {
    /// Connect to this device.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let devices = scanner.scan(Duration::from_secs(5)).await?;
    /// for device in devices {
    ///     let controller = device.connect(link.clone(), ControllerConfig::default()).await?;
    /// }
    /// ```
    pub async fn connect<L: Link>(self, link: L, config: ControllerConfig) -> Result<Controller> {
        Controller::connect(link, self.address, config).await
    }
}

/// Lists nearby devices.
pub trait Scanner: Send + Sync {
    /// Scan for `timeout` and return every device seen.
    fn scan(&self, timeout: Duration) -> impl Future<Output = Result<Vec<DiscoveredDevice>>> + Send;
}

/// Scan and return the address of the first device advertising exactly `name`.
///
/// # Examples
///
/// ```ignore
/// use std::time::Duration;
/// use govee_ble_rs::resolve_address_by_name;
///
/// let address = resolve_address_by_name(&scanner, "ihoment_H6110_DBA2", Duration::from_secs(5)).await?;
/// println!("found strip at {address}");
/// ```
pub async fn resolve_address_by_name<S: Scanner>(
    scanner: &S,
    name: &str,
    timeout: Duration,
) -> Result<DeviceAddress> {
    let devices = scanner.scan(timeout).await?;
    debug!("scan found {} device(s)", devices.len());
    find_by_name(&devices, name).ok_or_else(|| Error::DeviceNotFound(name.to_string()))
}

fn find_by_name(devices: &[DiscoveredDevice], name: &str) -> Option<DeviceAddress> {
    devices
        .iter()
        .find(|device| device.name.as_deref() == Some(name))
        .map(|device| device.address)
}
